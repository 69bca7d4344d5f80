//! `{ "en": ..., "tr": ... }` text fields.

use crate::{ContentMap, ContentValue, statics};

/// Bilingual text. `en` is the primary language; `tr` is optional and only written
/// back when it was present on load or has been filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bilingual {
    pub en: String,
    pub tr: Option<String>,
}

impl Bilingual {
    pub fn new(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            tr: None,
        }
    }

    /// Lenient read: a plain string becomes the English text, anything unexpected is empty.
    pub fn from_value(value: Option<&ContentValue>) -> Self {
        match value {
            Some(ContentValue::String(s)) => Self::new(s.clone()),
            Some(ContentValue::Object(map)) => Self {
                en: text_of(lang_entry(map, statics::KEY_EN).map(|(_, v)| v)),
                tr: lang_entry(map, statics::KEY_TR)
                    .map(|(_, v)| v)
                    .filter(|v| !v.is_null())
                    .map(|v| v.display_text()),
            },
            _ => Self::default(),
        }
    }

    pub fn to_value(&self) -> ContentValue {
        let mut map = ContentMap::new();
        map.insert(statics::KEY_EN.to_string(), ContentValue::string(&self.en));
        if let Some(tr) = self.tr.as_ref() {
            map.insert(statics::KEY_TR.to_string(), ContentValue::string(tr));
        }
        ContentValue::Object(map)
    }

    /// Write `en`/`tr` over `original`. Other keys, the stored key spelling and a
    /// null language that is still empty are kept as they were.
    pub fn write_onto(&self, original: Option<&ContentValue>) -> ContentValue {
        let Some(map) = original.and_then(ContentValue::as_object) else {
            return self.to_value();
        };
        let mut out = map.clone();
        let langs = [
            (statics::KEY_EN, Some(self.en.as_str())),
            (statics::KEY_TR, self.tr.as_deref()),
        ];
        for (lang, text) in langs {
            let (key, stored) = match lang_entry(map, lang) {
                Some((key, stored)) => (key.clone(), Some(stored)),
                None => (lang.to_string(), None),
            };
            match (text, stored) {
                (Some(""), Some(ContentValue::Null)) | (None, _) => {}
                (Some(text), _) => {
                    out.insert(key, ContentValue::string(text));
                }
            }
        }
        ContentValue::Object(out)
    }

    /// Text to show in tables: English first, then Turkish, never null.
    pub fn display(&self) -> &str {
        if !self.en.is_empty() {
            return &self.en;
        }
        self.tr.as_deref().unwrap_or(statics::EN_EMPTY)
    }

    /// Mutable access to the Turkish text for an input widget.
    /// An empty buffer is dropped again by [`Bilingual::normalized`].
    pub fn tr_mut(&mut self) -> &mut String {
        self.tr.get_or_insert_with(String::new)
    }

    pub fn normalized(mut self, keep_empty_tr: bool) -> Self {
        if !keep_empty_tr && self.tr.as_deref() == Some("") {
            self.tr = None;
        }
        self
    }

    pub fn is_multiline(&self) -> bool {
        self.en.contains('\n') || self.tr.as_deref().is_some_and(|t| t.contains('\n'))
    }
}

/// Whether `value` looks like a bilingual scalar: an object with `en` and/or `tr`
/// whose values are all strings or null.
pub fn is_bilingual(value: &ContentValue) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    let has_lang = lang_entry(map, statics::KEY_EN).is_some()
        || lang_entry(map, statics::KEY_TR).is_some();
    has_lang
        && map
            .values()
            .all(|v| matches!(v, ContentValue::Null | ContentValue::String(_)))
}

/// Highlights-style list, one entry per line in each language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BilingualList {
    pub en: Vec<String>,
    pub tr: Vec<String>,
}

impl BilingualList {
    pub fn from_value(value: Option<&ContentValue>) -> Self {
        let Some(map) = value.and_then(ContentValue::as_object) else {
            return Self::default();
        };
        Self {
            en: to_lines(map.get(statics::KEY_EN)),
            tr: to_lines(map.get(statics::KEY_TR)),
        }
    }

    pub fn from_text(en: &str, tr: &str) -> Self {
        Self {
            en: split_lines(en),
            tr: split_lines(tr),
        }
    }

    pub fn en_text(&self) -> String {
        self.en.join("\n")
    }

    pub fn tr_text(&self) -> String {
        self.tr.join("\n")
    }

    pub fn to_value(&self) -> ContentValue {
        let list = |items: &[String]| {
            ContentValue::Array(items.iter().map(ContentValue::string).collect())
        };
        let mut map = ContentMap::new();
        map.insert(statics::KEY_EN.to_string(), list(&self.en));
        map.insert(statics::KEY_TR.to_string(), list(&self.tr));
        ContentValue::Object(map)
    }
}

/// The entry for `lang`, matching the key in any letter case. An exact match wins.
fn lang_entry<'a>(map: &'a ContentMap, lang: &str) -> Option<(&'a String, &'a ContentValue)> {
    map.get_key_value(lang)
        .or_else(|| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(lang)))
}

fn text_of(value: Option<&ContentValue>) -> String {
    value.map(ContentValue::display_text).unwrap_or_default()
}

fn to_lines(value: Option<&ContentValue>) -> Vec<String> {
    match value {
        Some(ContentValue::Array(items)) => items
            .iter()
            .map(|v| v.display_text().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(ContentValue::String(s)) => split_lines(s),
        _ => Vec::new(),
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
