use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Ordered JSON object, as stored on disk.
pub type ContentMap = IndexMap<String, ContentValue>;

/// Represents a number that keeps the distinction between I64, U64, and F64 so integers
/// written by the site tooling come back out as integers.
#[derive(Debug, Clone)]
pub enum ContentNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl ContentNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ContentNumber::I64(v) => Some(*v),
            ContentNumber::U64(v) => i64::try_from(*v).ok(),
            ContentNumber::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            ContentNumber::I64(v) => *v as f64,
            ContentNumber::U64(v) => *v as f64,
            ContentNumber::F64(v) => *v,
        }
    }

    fn write_json(&self, out: &mut String) {
        match self {
            ContentNumber::I64(v) => out.push_str(&v.to_string()),
            ContentNumber::U64(v) => out.push_str(&v.to_string()),
            ContentNumber::F64(v) => {
                // JSON has no spelling for NaN/Infinity.
                if !v.is_finite() {
                    out.push_str("null");
                    return;
                }
                let mut buf = ryu::Buffer::new();
                out.push_str(buf.format(*v));
            }
        }
    }
}

// Integers compare by value whichever variant the parser picked for them.
impl PartialEq for ContentNumber {
    fn eq(&self, other: &Self) -> bool {
        use ContentNumber::{F64, I64, U64};
        match (self, other) {
            (I64(a), I64(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (I64(a), U64(b)) | (U64(b), I64(a)) => u64::try_from(*a).is_ok_and(|a| a == *b),
            (F64(a), F64(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for ContentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.write_json(&mut out);
        f.write_str(&out)
    }
}

impl Serialize for ContentNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContentNumber::I64(v) => serializer.serialize_i64(*v),
            ContentNumber::U64(v) => serializer.serialize_u64(*v),
            ContentNumber::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

/// A value from one of the content JSON files.
/// Objects keep their key order so a load/save cycle produces minimal diffs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContentValue {
    #[default]
    Null,
    Bool(bool),
    Number(ContentNumber),
    String(String),
    Array(Vec<ContentValue>),
    Object(ContentMap),
}

impl ContentValue {
    pub fn empty_object() -> Self {
        ContentValue::Object(ContentMap::new())
    }

    pub fn empty_array() -> Self {
        ContentValue::Array(Vec::new())
    }

    pub fn string(s: impl Into<String>) -> Self {
        ContentValue::String(s.into())
    }

    pub fn int(v: i64) -> Self {
        ContentValue::Number(ContentNumber::I64(v))
    }

    pub fn as_object(&self) -> Option<&ContentMap> {
        match self {
            ContentValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ContentMap> {
        match self {
            ContentValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ContentValue]> {
        match self {
            ContentValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<ContentValue>> {
        match self {
            ContentValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContentValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ContentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ContentValue::Null)
    }

    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ContentValue> {
        self.as_object_mut().and_then(|m| m.get_mut(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ContentValue::Null => "null",
            ContentValue::Bool(_) => "bool",
            ContentValue::Number(_) => "number",
            ContentValue::String(_) => "string",
            ContentValue::Array(_) => "array",
            ContentValue::Object(_) => "object",
        }
    }

    /// Lossy text used in tables and single-line inputs. Containers render as empty.
    pub fn display_text(&self) -> String {
        match self {
            ContentValue::Null => String::new(),
            ContentValue::Bool(b) => b.to_string(),
            ContentValue::Number(n) => n.to_string(),
            ContentValue::String(s) => s.clone(),
            ContentValue::Array(_) | ContentValue::Object(_) => String::new(),
        }
    }

    pub fn parse(text: &str) -> anyhow::Result<ContentValue> {
        Ok(json5::from_str::<ContentValue>(text)?)
    }

    /// Serialize as 2-space indented JSON. Non-ASCII text is written as-is.
    pub fn to_pretty_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, true);
        out.push('\n');
        out
    }

    pub fn to_compact_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, false);
        out
    }

    fn write_json(&self, out: &mut String, indent: usize, pretty: bool) {
        match self {
            ContentValue::Null => out.push_str("null"),
            ContentValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            ContentValue::Number(n) => n.write_json(out),
            ContentValue::String(s) => write_escaped_string(out, s),
            ContentValue::Array(values) => {
                out.push('[');
                if pretty && !values.is_empty() {
                    out.push('\n');
                }
                for (i, v) in values.iter().enumerate() {
                    if pretty {
                        out.push_str(&" ".repeat(indent + 2));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                    }
                }
                if pretty && !values.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            ContentValue::Object(map) => {
                out.push('{');
                if pretty && !map.is_empty() {
                    out.push('\n');
                }
                for (i, (k, v)) in map.iter().enumerate() {
                    if pretty {
                        out.push_str(&" ".repeat(indent + 2));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    write_escaped_string(out, k);
                    out.push(':');
                    if pretty {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                    }
                }
                if pretty && !map.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::String(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::String(s)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Bool(b)
    }
}

impl<T: Into<ContentValue>> From<Option<T>> for ContentValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ContentValue::Null)
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Serialize for ContentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContentValue::Null => serializer.serialize_unit(),
            ContentValue::Bool(v) => serializer.serialize_bool(*v),
            ContentValue::Number(n) => n.serialize(serializer),
            ContentValue::String(s) => serializer.serialize_str(s),
            ContentValue::Array(values) => values.serialize(serializer),
            ContentValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ContentValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = ContentValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ContentValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ContentValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ContentValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ContentValue::Number(ContentNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ContentValue::Number(ContentNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ContentValue::Number(ContentNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ContentValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ContentValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<ContentValue>()? {
                    values.push(value);
                }
                Ok(ContentValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, ContentValue>()? {
                    values.insert(key, value);
                }
                Ok(ContentValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentNumber, ContentValue};

    #[test]
    fn parse_keeps_key_order_and_integer_kinds() {
        let v = ContentValue::parse(r#"{"z": 1, "a": 2.5, "m": -3}"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(v.get("z"), Some(&ContentValue::Number(ContentNumber::I64(1))));
        assert_eq!(v.get("a"), Some(&ContentValue::Number(ContentNumber::F64(2.5))));
    }

    #[test]
    fn parse_accepts_trailing_commas() {
        let v = ContentValue::parse("[1, 2,]").unwrap();
        assert_eq!(v.as_array().map(<[ContentValue]>::len), Some(2));
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let v = ContentValue::parse(r#"{"a": [1, {"b": null}], "c": {}}"#).unwrap();
        assert_eq!(
            v.to_pretty_json(),
            "{\n  \"a\": [\n    1,\n    {\n      \"b\": null\n    }\n  ],\n  \"c\": {}\n}\n"
        );
    }

    #[test]
    fn pretty_json_keeps_non_ascii_literal() {
        let v = ContentValue::string("Giray Özçelik ✓");
        assert_eq!(v.to_compact_json(), "\"Giray Özçelik ✓\"");
    }

    #[test]
    fn control_characters_are_escaped() {
        let v = ContentValue::string("a\nb\u{0001}\"");
        assert_eq!(v.to_compact_json(), "\"a\\nb\\u0001\\\"\"");
    }

    #[test]
    fn non_finite_floats_serialize_as_null() {
        let v = ContentValue::Number(ContentNumber::F64(f64::INFINITY));
        assert_eq!(v.to_compact_json(), "null");
    }

    #[test]
    fn display_text_is_empty_for_containers() {
        assert_eq!(ContentValue::empty_array().display_text(), "");
        assert_eq!(ContentValue::Null.display_text(), "");
        assert_eq!(ContentValue::int(42).display_text(), "42");
    }
}
