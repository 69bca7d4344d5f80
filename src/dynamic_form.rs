//! Forms inferred from the shape of a JSON object.
//!
//! Scalars and bilingual objects become fields, other objects become groups of their
//! own scalar members, and everything else is carried through untouched. Reading a
//! section back overlays the field values onto the original object, so key order and
//! unrendered data are preserved exactly.

use crate::{
    ContentMap, ContentValue,
    bilingual::{Bilingual, is_bilingual},
    statics,
    value::ContentNumber,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Text { value: String, multiline: bool },
    /// Numbers are edited as text; see [`read_number`].
    Number(String),
    Checkbox(bool),
    Bilingual {
        value: Bilingual,
        /// `tr` was present on load, so it is written back even when empty.
        keep_tr: bool,
        multiline: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub widget: Widget,
}

impl FormField {
    /// The field's value, written over what `original` held for it.
    pub fn read(&self, original: Option<&ContentValue>) -> ContentValue {
        match &self.widget {
            Widget::Text { value, .. } => ContentValue::string(value),
            Widget::Number(raw) => match original {
                // Unedited numbers keep their stored form.
                Some(ContentValue::Number(n)) if n.to_string() == *raw => {
                    ContentValue::Number(n.clone())
                }
                _ => read_number(raw),
            },
            Widget::Checkbox(b) => ContentValue::Bool(*b),
            Widget::Bilingual { value, keep_tr, .. } => {
                value.clone().normalized(*keep_tr).write_onto(original)
            }
        }
    }
}

/// A nested object shown as its own section.
#[derive(Debug, Clone, PartialEq)]
pub struct FormGroup {
    pub key: String,
    pub label: String,
    pub fields: Vec<FormField>,
    original: ContentMap,
}

impl FormGroup {
    /// Members that are not rendered and go back unchanged.
    pub fn remainder(&self) -> ContentMap {
        self.original
            .iter()
            .filter(|(k, _)| !self.fields.iter().any(|f| &f.key == *k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn read(&self) -> ContentMap {
        overlay(&self.original, &self.fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSection {
    pub fields: Vec<FormField>,
    pub groups: Vec<FormGroup>,
    original: ContentMap,
}

impl FormSection {
    /// Build a section for `object`, leaving `excluded` keys to other editors.
    pub fn build(object: &ContentMap, excluded: &[&str]) -> Self {
        let mut fields = Vec::new();
        let mut groups = Vec::new();

        for key in preferred_order(object.keys()) {
            if excluded.contains(&key) {
                continue;
            }
            let Some(value) = object.get(key) else {
                continue;
            };
            if let Some(field) = classify(key, value) {
                fields.push(field);
            } else if let Some(map) = value.as_object() {
                groups.push(build_group(key, map));
            }
        }

        Self {
            fields,
            groups,
            original: object.clone(),
        }
    }

    /// Keys present in the object but shown nowhere.
    pub fn passthrough(&self) -> Vec<&str> {
        self.original
            .keys()
            .map(String::as_str)
            .filter(|k| {
                !self.fields.iter().any(|f| f.key == *k) && !self.groups.iter().any(|g| g.key == *k)
            })
            .collect()
    }

    /// Reconstruct the object in its original key order.
    pub fn read(&self) -> ContentMap {
        let mut out = overlay(&self.original, &self.fields);
        for group in &self.groups {
            out.insert(group.key.clone(), ContentValue::Object(group.read()));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.groups.is_empty()
    }
}

fn build_group(key: &str, map: &ContentMap) -> FormGroup {
    let fields = preferred_order(map.keys())
        .into_iter()
        .filter_map(|k| classify(k, map.get(k)?))
        .collect();
    FormGroup {
        key: key.to_string(),
        label: titleize(key),
        fields,
        original: map.clone(),
    }
}

/// Field for a scalar or bilingual value; `None` for groups and passthrough shapes.
pub fn classify(key: &str, value: &ContentValue) -> Option<FormField> {
    let long_key = statics::MULTILINE_KEYS.contains(&key);
    let widget = match value {
        ContentValue::Null => Widget::Text {
            value: String::new(),
            multiline: long_key,
        },
        ContentValue::String(s) => Widget::Text {
            value: s.clone(),
            multiline: long_key || s.contains('\n'),
        },
        ContentValue::Number(n) => Widget::Number(n.to_string()),
        ContentValue::Bool(b) => Widget::Checkbox(*b),
        ContentValue::Object(_) if is_bilingual(value) => {
            let bilingual = Bilingual::from_value(Some(value));
            Widget::Bilingual {
                keep_tr: bilingual.tr.is_some(),
                multiline: long_key || bilingual.is_multiline(),
                value: bilingual,
            }
        }
        ContentValue::Object(_) | ContentValue::Array(_) => return None,
    };
    Some(FormField {
        key: key.to_string(),
        label: titleize(key),
        widget,
    })
}

/// Preferred keys first in their fixed priority, then the rest in encounter order.
pub fn preferred_order<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let keys: Vec<&str> = keys.map(String::as_str).collect();
    let mut ordered: Vec<&str> = statics::PREFERRED_ORDER
        .iter()
        .filter_map(|p| keys.iter().copied().find(|k| k == p))
        .collect();
    ordered.extend(
        keys.iter()
            .copied()
            .filter(|k| !statics::PREFERRED_ORDER.contains(k)),
    );
    ordered
}

/// Numeric read-back. Blank input stays an empty *string* because the site already
/// expects that shape; integers stay integers, text with a `.` or an exponent becomes
/// a finite float, and anything else is kept as typed.
pub fn read_number(raw: &str) -> ContentValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return ContentValue::string("");
    }
    let parsed = if raw.contains(['.', 'e', 'E']) {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(ContentNumber::F64)
    } else {
        raw.parse::<i64>()
            .map(ContentNumber::I64)
            .or_else(|_| raw.parse::<u64>().map(ContentNumber::U64))
            .ok()
    };
    parsed
        .map(ContentValue::Number)
        .unwrap_or_else(|| ContentValue::string(raw))
}

/// `graduation_year` -> `Graduation Year`.
pub fn titleize(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn overlay(original: &ContentMap, fields: &[FormField]) -> ContentMap {
    let mut out = original.clone();
    for field in fields {
        // IndexMap keeps the slot of an existing key.
        let value = field.read(original.get(&field.key));
        out.insert(field.key.clone(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{FormSection, Widget, classify, read_number, titleize};
    use crate::{ContentMap, ContentValue, value::ContentNumber};
    use pretty_assertions::assert_eq;

    fn obj(text: &str) -> ContentMap {
        ContentValue::parse(text).unwrap().as_object().unwrap().clone()
    }

    #[test]
    fn classifies_value_shapes() {
        let w = |key: &str, json: &str| {
            classify(key, &ContentValue::parse(json).unwrap()).map(|f| f.widget)
        };
        assert_eq!(
            w("bio", r#""""#),
            Some(Widget::Text {
                value: String::new(),
                multiline: true
            })
        );
        assert_eq!(w("year", "2024"), Some(Widget::Number("2024".to_string())));
        assert_eq!(w("open", "true"), Some(Widget::Checkbox(true)));
        assert!(matches!(
            w("title", r#"{"en": "a\nb"}"#),
            Some(Widget::Bilingual { multiline: true, keep_tr: false, .. })
        ));
        assert_eq!(w("links", r#"{"github": "x"}"#), None);
        assert_eq!(w("tags", r#"["a"]"#), None);
    }

    #[test]
    fn numeric_readback() {
        assert_eq!(read_number(""), ContentValue::string(""));
        assert_eq!(read_number(" 42 "), ContentValue::int(42));
        assert_eq!(read_number("3.5").to_compact_json(), "3.5");
        assert_eq!(read_number("12abc"), ContentValue::string("12abc"));
        assert_eq!(read_number("1e-7"), ContentValue::Number(ContentNumber::F64(1e-7)));
        assert_eq!(read_number("1e400"), ContentValue::string("1e400"));
    }

    #[test]
    fn titleizes_keys() {
        assert_eq!(titleize("graduation_year"), "Graduation Year");
        assert_eq!(titleize("GPA"), "Gpa");
        assert_eq!(titleize("_x_"), "X");
    }

    #[test]
    fn untouched_section_reads_back_identically() {
        let data = obj(
            r#"{"email": "a@b.c", "full_name": "Ada", "tags": ["x"], "gpa": 3.9,
                "social": {"github": "g", "extra": [1]}, "title": {"en": "Eng", "tr": ""}}"#,
        );
        let section = FormSection::build(&data, &[]);
        let keys: Vec<&str> = section.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["full_name", "title", "email", "gpa"]);
        assert_eq!(section.passthrough(), vec!["tags"]);
        assert_eq!(section.groups[0].remainder(), obj(r#"{"extra": [1]}"#));
        assert_eq!(section.read(), data);
    }
}
