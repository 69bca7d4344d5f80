//! Per-entity field tables for the list tabs.
//!
//! Every list tab is one [`EntityConfig`]: which fields the form shows, how each maps to
//! record keys, and what the table row shows. The controller is the same for all of them.

use crate::{
    ContentMap, ContentValue,
    assets::{AssetError, AssetResolver, CopyPolicy, UrlPolicy, sanitize_stem, slugify},
    bilingual::{Bilingual, BilingualList},
    dates::{self, DateRange},
    gallery::{Gallery, is_url},
    repository::Entity,
    statics,
};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("{key}: {value:?} is not one of the allowed values")]
    InvalidChoice { key: &'static str, value: String },
    #[error("form does not match the {0} field table")]
    Shape(&'static str),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// How an image field names the file it copies into the asset tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `sanitize_stem(<field value>)`, e.g. `LinkedIn.png`.
    Sanitized {
        from: &'static str,
        fallback: &'static str,
    },
    /// `slugify(<field value>)`, e.g. `rust-lang.svg`.
    Slug { from: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultilineText,
    Bilingual,
    BilingualText,
    BilingualList,
    /// Comma separated list; also written to (and read from) `aliases`.
    CommaList { aliases: &'static [&'static str] },
    /// Flattened `start`/`end`/`present`, optionally with `_iso`/`_unix` siblings.
    DateRange { derived: bool },
    /// `<key>`, `<key>_iso`, `<key>_unix`; hydrates from `fallbacks` when `<key>` is absent.
    Date { fallbacks: &'static [&'static str] },
    Choice {
        options: &'static [(&'static str, &'static str)],
    },
    /// `images` + `icon` with a cover.
    Gallery {
        name_from: &'static str,
        fallback: &'static str,
    },
    /// A single image: local file copied into the tree, or an URL stored verbatim.
    Image {
        naming: Naming,
        copy: CopyPolicy,
        allow_url: bool,
        nullable: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Record key; `a.b` addresses a key inside a nested object.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Only written when another field holds the given value; removed otherwise.
    pub visible_when: Option<(&'static str, &'static str)>,
    /// Substituted when a text field is left blank.
    pub blank_default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            visible_when: None,
            blank_default: None,
        }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub const fn bilingual(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Bilingual)
    }

    pub const fn bilingual_text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::BilingualText)
    }

    pub const fn highlights() -> Self {
        Self::new("highlights", "Highlights", FieldKind::BilingualList)
    }

    pub const fn stack(aliases: &'static [&'static str]) -> Self {
        Self::new("stack", "Stack", FieldKind::CommaList { aliases })
    }

    pub const fn date_range(derived: bool) -> Self {
        Self::new(
            statics::KEY_START,
            "Date Range",
            FieldKind::DateRange { derived },
        )
    }

    pub const fn gallery(name_from: &'static str, fallback: &'static str) -> Self {
        Self::new(
            statics::KEY_IMAGES,
            "Images & Cover",
            FieldKind::Gallery {
                name_from,
                fallback,
            },
        )
    }

    pub const fn visible_when(mut self, key: &'static str, value: &'static str) -> Self {
        self.visible_when = Some((key, value));
        self
    }

    pub const fn blank_default(mut self, value: &'static str) -> Self {
        self.blank_default = Some(value);
        self
    }
}

/// What a table column shows for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Text(&'static str),
    Bilingual(&'static str),
    /// First `n` entries of a string list, comma joined.
    ListHead(&'static str, usize),
    Label {
        key: &'static str,
        labels: &'static [(&'static str, &'static str)],
        fallback: &'static str,
    },
}

#[derive(Debug)]
pub struct EntityConfig {
    pub entity: Entity,
    pub headers: &'static [&'static str],
    pub columns: &'static [Column],
    pub fields: &'static [FieldSpec],
}

const COURSE_TYPES: &[(&str, &str)] = &[("mandatory", "Mandatory"), ("elective", "Elective")];
const ELECTIVE_TYPES: &[(&str, &str)] = &[
    ("Area Elective", "Area Elective"),
    ("Non-area Elective", "Non-area Elective"),
    ("Universitive Elective", "Universitive Elective"),
];

pub static SOCIALS: EntityConfig = EntityConfig {
    entity: Entity::Socials,
    headers: &["platform", "username", "url", "icon"],
    columns: &[
        Column::Text("platform"),
        Column::Text("username"),
        Column::Text("url"),
        Column::Text(statics::KEY_ICON),
    ],
    fields: &[
        FieldSpec::text("platform", "Platform"),
        FieldSpec::text("username", "Username"),
        FieldSpec::text("url", "URL"),
        FieldSpec::new(
            statics::KEY_ICON,
            "Icon",
            FieldKind::Image {
                naming: Naming::Sanitized {
                    from: "platform",
                    fallback: "icon",
                },
                copy: CopyPolicy::ConvertPng,
                allow_url: true,
                nullable: true,
            },
        ),
    ],
};

pub static EXPERIENCE: EntityConfig = EntityConfig {
    entity: Entity::Experience,
    headers: &["title", "organization", "start"],
    columns: &[
        Column::Bilingual("title"),
        Column::Text("organization"),
        Column::Text(statics::KEY_START),
    ],
    fields: &[
        FieldSpec::bilingual("title", "Title"),
        FieldSpec::text("organization", "Organization"),
        FieldSpec::text("location", "Location"),
        FieldSpec::date_range(true),
        FieldSpec::bilingual_text("details", "Details"),
        FieldSpec::highlights(),
        FieldSpec::stack(&["tech"]),
        FieldSpec::gallery("title", "experience"),
    ],
};

pub static COMPETITIONS: EntityConfig = EntityConfig {
    entity: Entity::Competitions,
    headers: &["name", "team", "start"],
    columns: &[
        Column::Bilingual("name"),
        Column::Text("team"),
        Column::Text(statics::KEY_START),
    ],
    fields: &[
        FieldSpec::bilingual("name", "Competition Name"),
        FieldSpec::text("team", "Team Name"),
        FieldSpec::bilingual("role", "Role (optional)"),
        FieldSpec::text("organization", "Organization"),
        FieldSpec::date_range(true),
        FieldSpec::text("result", "Result"),
        FieldSpec::bilingual_text("details", "Details"),
        FieldSpec::highlights(),
        FieldSpec::stack(&[]),
        FieldSpec::gallery("name", "competition"),
    ],
};

pub static PROJECTS: EntityConfig = EntityConfig {
    entity: Entity::Projects,
    headers: &["title", "start", "stack"],
    columns: &[
        Column::Bilingual("title"),
        Column::Text(statics::KEY_START),
        Column::ListHead("stack", 3),
    ],
    fields: &[
        FieldSpec::bilingual("title", "Title"),
        FieldSpec::bilingual_text("summary", "Summary"),
        FieldSpec::date_range(false),
        FieldSpec::stack(&[]),
        FieldSpec::text("links.github", "GitHub URL"),
        FieldSpec::text("links.demo", "Demo URL"),
        FieldSpec::highlights(),
        FieldSpec::gallery("title", "project"),
    ],
};

pub static CERTIFICATES: EntityConfig = EntityConfig {
    entity: Entity::Certificates,
    headers: &["name", "issuer", "issued_at"],
    columns: &[
        Column::Bilingual("name"),
        Column::Text("issuer"),
        Column::Text("issued_at"),
    ],
    fields: &[
        FieldSpec::bilingual("name", "Name"),
        FieldSpec::text("issuer", "Issuer"),
        FieldSpec::new(
            "issued_at",
            "Issued at",
            FieldKind::Date {
                fallbacks: &[statics::KEY_END, statics::KEY_START],
            },
        ),
        FieldSpec::text("credential_id", "Credential ID"),
        FieldSpec::text("credential_url", "Credential URL"),
        FieldSpec::bilingual_text("details", "Details"),
        FieldSpec::stack(&[]),
        FieldSpec::gallery("name", "certificate"),
    ],
};

pub static STACK: EntityConfig = EntityConfig {
    entity: Entity::Stack,
    headers: &["name", "category", "link"],
    columns: &[
        Column::Text("name"),
        Column::Text("category"),
        Column::Text("link"),
    ],
    fields: &[
        FieldSpec::text("name", "Name"),
        FieldSpec::text("category", "Category"),
        FieldSpec::text("link", "Link"),
        FieldSpec::text("logo_url", "Logo URL (SVG/PNG)"),
        FieldSpec::new(
            "logo_path",
            "Logo File",
            FieldKind::Image {
                naming: Naming::Slug { from: "name" },
                copy: CopyPolicy::KeepExtension,
                allow_url: false,
                nullable: false,
            },
        ),
    ],
};

pub static COURSES: EntityConfig = EntityConfig {
    entity: Entity::Courses,
    headers: &["name", "semester", "type"],
    columns: &[
        Column::Text("name"),
        Column::Text("semester"),
        Column::Label {
            key: "type",
            labels: &[("elective", "Elective")],
            fallback: "Mandatory",
        },
    ],
    fields: &[
        FieldSpec::text("name", "Name").blank_default("Course"),
        FieldSpec::text("semester", "Semester (e.g., 5th semester)"),
        FieldSpec::new(
            "type",
            "Type",
            FieldKind::Choice {
                options: COURSE_TYPES,
            },
        ),
        FieldSpec::new(
            "elective_type",
            "Elective Type",
            FieldKind::Choice {
                options: ELECTIVE_TYPES,
            },
        )
        .visible_when("type", "elective"),
    ],
};

pub static LIST_ENTITIES: [&EntityConfig; 7] = [
    &SOCIALS,
    &EXPERIENCE,
    &COMPETITIONS,
    &PROJECTS,
    &CERTIFICATES,
    &STACK,
    &COURSES,
];

pub fn config_for(entity: Entity) -> Option<&'static EntityConfig> {
    LIST_ENTITIES.iter().copied().find(|c| c.entity == entity)
}

/// Editor state of one image field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageSlot {
    /// Value currently stored in the record.
    pub saved: String,
    /// Local file picked since the last save.
    pub picked: Option<String>,
    pub url: String,
    pub use_url: bool,
}

impl ImageSlot {
    pub fn from_stored(stored: &str, allow_url: bool) -> Self {
        let use_url = allow_url && is_url(stored);
        Self {
            saved: stored.to_string(),
            picked: None,
            url: if use_url { stored.to_string() } else { String::new() },
            use_url,
        }
    }

    pub fn pick(&mut self, path: impl Into<String>) {
        self.picked = Some(path.into());
        self.use_url = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Editor state of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bilingual { value: Bilingual, keep_tr: bool },
    BilingualList { en: String, tr: String },
    DateRange(DateRange),
    Choice(String),
    Gallery(Gallery),
    Image(ImageSlot),
}

/// The form behind a list tab: the record being edited plus one value per field.
/// Keys not covered by a field stay in `base` and are written back untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub base: ContentMap,
    pub values: Vec<FieldValue>,
}

impl EntityConfig {
    /// Empty form for a new record.
    pub fn empty_form(&self) -> FormState {
        self.hydrate(&ContentMap::new())
    }

    pub fn hydrate(&self, record: &ContentMap) -> FormState {
        let values = self
            .fields
            .iter()
            .map(|field| hydrate_field(field, record))
            .collect();
        FormState {
            base: record.clone(),
            values,
        }
    }

    /// Extract the record the form describes. Copies newly picked images into the asset
    /// tree; nothing else has side effects.
    pub fn record_from_form(
        &self,
        form: &FormState,
        resolver: &AssetResolver,
    ) -> Result<ContentMap, FormError> {
        if form.values.len() != self.fields.len() {
            return Err(FormError::Shape(self.entity.name()));
        }

        let mut record = form.base.clone();
        for (field, value) in self.fields.iter().zip(&form.values) {
            if let Some((key, expected)) = field.visible_when
                && self.choice_of(form, key) != Some(expected)
            {
                remove_path(&mut record, field.key);
                continue;
            }
            self.write_field(field, value, form, resolver, &mut record)?;
        }
        Ok(record)
    }

    /// Table row for a record. Never fails; missing keys show as empty.
    pub fn summary(&self, record: &ContentValue) -> Vec<String> {
        let Some(map) = record.as_object() else {
            return vec![String::new(); self.columns.len()];
        };
        self.columns.iter().map(|c| column_text(c, map)).collect()
    }

    pub fn field_index(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Current text of a field, for naming assets after it.
    pub fn text_of(&self, form: &FormState, key: &str) -> String {
        let Some(value) = self.field_index(key).and_then(|i| form.values.get(i)) else {
            return String::new();
        };
        match value {
            FieldValue::Text(s) | FieldValue::Choice(s) => s.trim().to_string(),
            FieldValue::Bilingual { value, .. } => value.display().trim().to_string(),
            _ => String::new(),
        }
    }

    fn choice_of<'a>(&self, form: &'a FormState, key: &str) -> Option<&'a str> {
        match self.field_index(key).and_then(|i| form.values.get(i))? {
            FieldValue::Choice(s) | FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn write_field(
        &self,
        field: &FieldSpec,
        value: &FieldValue,
        form: &FormState,
        resolver: &AssetResolver,
        record: &mut ContentMap,
    ) -> Result<(), FormError> {
        let tab_key = self.entity.tab_key();
        match (field.kind, value) {
            (FieldKind::Text | FieldKind::MultilineText, FieldValue::Text(s)) => {
                let s = s.trim();
                let s = match field.blank_default {
                    Some(default) if s.is_empty() => default,
                    _ => s,
                };
                set_path(record, field.key, ContentValue::string(s));
            }
            (
                FieldKind::Bilingual | FieldKind::BilingualText,
                FieldValue::Bilingual { value, keep_tr },
            ) => {
                let value = value
                    .clone()
                    .normalized(*keep_tr)
                    .write_onto(get_path(record, field.key));
                set_path(record, field.key, value);
            }
            (FieldKind::BilingualList, FieldValue::BilingualList { en, tr }) => {
                set_path(record, field.key, BilingualList::from_text(en, tr).to_value());
            }
            (FieldKind::CommaList { aliases }, FieldValue::Text(s)) => {
                let list = ContentValue::Array(
                    split_comma_list(s).into_iter().map(ContentValue::from).collect(),
                );
                for alias in aliases {
                    set_path(record, alias, list.clone());
                }
                set_path(record, field.key, list);
            }
            (FieldKind::DateRange { derived }, FieldValue::DateRange(range)) => {
                if derived {
                    range.write_to(record);
                } else {
                    let end = if range.present { "" } else { range.end.trim() };
                    record.insert(
                        statics::KEY_START.to_string(),
                        ContentValue::string(range.start.trim()),
                    );
                    record.insert(statics::KEY_END.to_string(), ContentValue::string(end));
                    record.insert(
                        statics::KEY_PRESENT.to_string(),
                        ContentValue::Bool(range.present),
                    );
                }
            }
            (FieldKind::Date { .. }, FieldValue::Text(s)) => {
                dates::write_date(record, field.key, &dates::normalize(s));
            }
            (FieldKind::Choice { options }, FieldValue::Choice(s)) => {
                if !options.iter().any(|(v, _)| v == s) {
                    return Err(FormError::InvalidChoice {
                        key: field.key,
                        value: s.clone(),
                    });
                }
                set_path(record, field.key, ContentValue::string(s));
            }
            (
                FieldKind::Gallery {
                    name_from,
                    fallback,
                },
                FieldValue::Gallery(gallery),
            ) => {
                let name = self.text_of(form, name_from);
                let name = if name.is_empty() { fallback } else { name.as_str() };
                let resolved = resolver.resolve_gallery(gallery, &tab_key, name)?;
                record.insert(
                    statics::KEY_IMAGES.to_string(),
                    ContentValue::Array(
                        resolved
                            .images
                            .into_iter()
                            .map(ContentValue::from)
                            .collect(),
                    ),
                );
                record.insert(statics::KEY_ICON.to_string(), resolved.icon.into());
            }
            (
                FieldKind::Image {
                    naming,
                    copy,
                    allow_url,
                    nullable,
                },
                FieldValue::Image(slot),
            ) => {
                let stored = if allow_url && slot.use_url {
                    slot.url.trim().to_string()
                } else if let Some(picked) = slot.picked.as_deref() {
                    let stem = match naming {
                        Naming::Sanitized { from, fallback } => {
                            sanitize_stem(&self.text_of(form, from), fallback)
                        }
                        Naming::Slug { from } => slugify(&self.text_of(form, from)),
                    };
                    resolver.resolve(picked, &tab_key, &stem, copy, UrlPolicy::Verbatim)?
                } else {
                    slot.saved.clone()
                };
                let value = if stored.is_empty() && nullable {
                    ContentValue::Null
                } else {
                    ContentValue::string(stored)
                };
                set_path(record, field.key, value);
            }
            _ => return Err(FormError::Shape(self.entity.name())),
        }
        Ok(())
    }
}

fn hydrate_field(field: &FieldSpec, record: &ContentMap) -> FieldValue {
    let stored = get_path(record, field.key);
    match field.kind {
        FieldKind::Text | FieldKind::MultilineText => {
            FieldValue::Text(stored.map(ContentValue::display_text).unwrap_or_default())
        }
        FieldKind::Bilingual | FieldKind::BilingualText => {
            let value = Bilingual::from_value(stored);
            FieldValue::Bilingual {
                keep_tr: value.tr.is_some(),
                value,
            }
        }
        FieldKind::BilingualList => {
            let list = BilingualList::from_value(stored);
            FieldValue::BilingualList {
                en: list.en_text(),
                tr: list.tr_text(),
            }
        }
        FieldKind::CommaList { aliases } => {
            let list = std::iter::once(field.key)
                .chain(aliases.iter().copied())
                .find_map(|k| get_path(record, k).and_then(ContentValue::as_array))
                .unwrap_or_default();
            let items: Vec<String> = list.iter().map(ContentValue::display_text).collect();
            FieldValue::Text(items.join(", "))
        }
        FieldKind::DateRange { .. } => FieldValue::DateRange(DateRange::from_record(record)),
        FieldKind::Date { fallbacks } => {
            let text = std::iter::once(field.key)
                .chain(fallbacks.iter().copied())
                .map(|k| record.get(k).map(ContentValue::display_text).unwrap_or_default())
                .find(|s| !s.is_empty())
                .unwrap_or_default();
            FieldValue::Text(text)
        }
        FieldKind::Choice { options } => {
            let current = stored.and_then(ContentValue::as_str).unwrap_or_default();
            let value = options
                .iter()
                .find(|(v, _)| *v == current)
                .or(options.first())
                .map(|(v, _)| v.to_string())
                .unwrap_or_default();
            FieldValue::Choice(value)
        }
        FieldKind::Gallery { .. } => FieldValue::Gallery(Gallery::from_record(record)),
        FieldKind::Image { allow_url, .. } => FieldValue::Image(ImageSlot::from_stored(
            stored.and_then(ContentValue::as_str).unwrap_or_default(),
            allow_url,
        )),
    }
}

fn column_text(column: &Column, record: &ContentMap) -> String {
    match column {
        Column::Text(key) => get_path(record, key)
            .map(ContentValue::display_text)
            .unwrap_or_default(),
        Column::Bilingual(key) => Bilingual::from_value(get_path(record, key))
            .display()
            .to_string(),
        Column::ListHead(key, n) => get_path(record, key)
            .and_then(ContentValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .take(*n)
                    .map(ContentValue::display_text)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default(),
        Column::Label {
            key,
            labels,
            fallback,
        } => {
            let current = get_path(record, key).and_then(ContentValue::as_str);
            labels
                .iter()
                .find(|(v, _)| Some(*v) == current)
                .map(|(_, label)| *label)
                .unwrap_or(*fallback)
                .to_string()
        }
    }
}

pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Look up `a.b.c` through nested objects.
pub fn get_path<'a>(record: &'a ContentMap, path: &str) -> Option<&'a ContentValue> {
    let mut parts = path.split('.');
    let first = record.get(parts.next()?)?;
    parts.try_fold(first, |v, part| v.get(part))
}

/// Set `a.b.c`, creating (or replacing non-object) intermediate objects while keeping
/// sibling keys of existing ones.
pub fn set_path(record: &mut ContentMap, path: &str, value: ContentValue) {
    match path.split_once('.') {
        None => {
            record.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = record
                .entry(head.to_string())
                .or_insert_with(ContentValue::empty_object);
            if entry.as_object().is_none() {
                *entry = ContentValue::empty_object();
            }
            if let Some(map) = entry.as_object_mut() {
                set_path(map, rest, value);
            }
        }
    }
}

pub fn remove_path(record: &mut ContentMap, path: &str) {
    match path.split_once('.') {
        None => {
            record.shift_remove(path);
        }
        Some((head, rest)) => {
            if let Some(map) = record.get_mut(head).and_then(ContentValue::as_object_mut) {
                remove_path(map, rest);
            }
        }
    }
}
