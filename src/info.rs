//! Editor for the singleton `info` record.

use crate::{
    ContentMap, ContentValue,
    assets::{AssetError, AssetResolver, CopyPolicy, UrlPolicy},
    dynamic_form::FormSection,
    gallery::is_url,
    repository::{Entity, EntityStore, RepositoryError},
    statics,
};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// `{ "path": ..., "url": ... }` image slot. At most one of the two is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfoSlot {
    pub key: &'static str,
    pub path: Option<String>,
    pub url: Option<String>,
    /// Local file picked since the last save; copied into the asset tree on save.
    pub picked: Option<String>,
    /// Text of the URL input.
    pub url_input: String,
}

impl InfoSlot {
    fn empty(key: &'static str) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    fn from_record(key: &'static str, record: &ContentMap) -> Self {
        let text = |k: &str| {
            record
                .get(key)
                .and_then(|slot| slot.get(k))
                .and_then(ContentValue::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let url = text(statics::KEY_SLOT_URL);
        Self {
            key,
            path: text(statics::KEY_SLOT_PATH),
            url_input: url.clone().unwrap_or_default(),
            url,
            picked: None,
        }
    }

    pub fn pick(&mut self, path: impl Into<String>) {
        self.picked = Some(path.into());
        self.url = None;
        self.url_input.clear();
    }

    /// Use the URL input. Returns false when it is not an http(s) URL.
    pub fn apply_url(&mut self) -> bool {
        let url = self.url_input.trim();
        if !is_url(url) {
            return false;
        }
        self.url = Some(url.to_string());
        self.path = None;
        self.picked = None;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::empty(self.key);
    }

    /// What a preview should show: the picked file, the stored path or the URL.
    pub fn source(&self) -> Option<&str> {
        self.picked
            .as_deref()
            .or(self.path.as_deref())
            .or(self.url.as_deref())
    }

    fn resolve(
        &self,
        resolver: &AssetResolver,
    ) -> Result<(Option<String>, Option<String>), AssetError> {
        if let Some(picked) = self.picked.as_deref() {
            let tab_key = Entity::Info.tab_key();
            let stored = resolver.resolve(
                picked,
                &tab_key,
                self.key,
                CopyPolicy::ConvertPng,
                UrlPolicy::Verbatim,
            )?;
            return Ok((Some(stored), None));
        }
        Ok((self.path.clone(), self.url.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct InfoEditor {
    pub section: FormSection,
    pub profile_photo: InfoSlot,
    pub university_logo: InfoSlot,
}

impl Default for InfoEditor {
    fn default() -> Self {
        Self {
            section: FormSection::build(&ContentMap::new(), &[]),
            profile_photo: InfoSlot::empty(statics::KEY_PROFILE_PHOTO),
            university_logo: InfoSlot::empty(statics::KEY_UNIVERSITY_LOGO),
        }
    }
}

const SLOT_KEYS: &[&str] = &[statics::KEY_PROFILE_PHOTO, statics::KEY_UNIVERSITY_LOGO];

impl InfoEditor {
    pub fn load(&mut self, store: &dyn EntityStore) {
        self.load_from(store.load(Entity::Info));
    }

    /// Anything but an object loads as an empty record.
    pub fn load_from(&mut self, value: ContentValue) {
        let record = match value {
            ContentValue::Object(map) => map,
            _ => ContentMap::new(),
        };
        self.section = FormSection::build(&record, SLOT_KEYS);
        self.profile_photo = InfoSlot::from_record(statics::KEY_PROFILE_PHOTO, &record);
        self.university_logo = InfoSlot::from_record(statics::KEY_UNIVERSITY_LOGO, &record);
    }

    pub fn slots_mut(&mut self) -> [&mut InfoSlot; 2] {
        [&mut self.profile_photo, &mut self.university_logo]
    }

    /// The record the editor currently describes. Copies picked slot images.
    pub fn export(&self, resolver: &AssetResolver) -> Result<ContentValue, AssetError> {
        let mut record = self.section.read();
        for slot in [&self.profile_photo, &self.university_logo] {
            let (path, url) = slot.resolve(resolver)?;
            let mut value = record
                .get(slot.key)
                .and_then(ContentValue::as_object)
                .cloned()
                .unwrap_or_default();
            value.insert(statics::KEY_SLOT_PATH.to_string(), path.into());
            value.insert(statics::KEY_SLOT_URL.to_string(), url.into());
            record.insert(slot.key.to_string(), ContentValue::Object(value));
        }
        Ok(ContentValue::Object(record))
    }

    pub fn save(
        &mut self,
        store: &dyn EntityStore,
        resolver: &AssetResolver,
    ) -> Result<PathBuf, InfoError> {
        let value = self.export(resolver)?;
        let path = store.save(Entity::Info, &value)?;
        // Picked files are now stored values.
        self.load_from(value);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::InfoEditor;
    use crate::{ContentValue, assets::AssetResolver};
    use pretty_assertions::assert_eq;

    #[test]
    fn slots_are_not_rendered_and_survive_export() {
        let data = ContentValue::parse(
            r#"{"full_name": "Ada", "profile_photo": {"path": null, "url": "https://x/p.png"},
                "projects_count": 3}"#,
        )
        .unwrap();
        let mut editor = InfoEditor::default();
        editor.load_from(data.clone());
        assert!(editor.section.fields.iter().all(|f| f.key != "profile_photo"));
        assert_eq!(editor.profile_photo.url.as_deref(), Some("https://x/p.png"));

        let out = editor.export(&AssetResolver::new("/nonexistent")).unwrap();
        assert_eq!(out.get("full_name"), data.get("full_name"));
        assert_eq!(out.get("profile_photo"), data.get("profile_photo"));
        assert_eq!(
            out.get("university_logo").unwrap().to_compact_json(),
            r#"{"path": null, "url": null}"#
        );
    }

    #[test]
    fn url_and_file_are_exclusive() {
        let mut editor = InfoEditor::default();
        editor.profile_photo.pick("/tmp/me.jpg");
        editor.profile_photo.url_input = "not a url".to_string();
        assert!(!editor.profile_photo.apply_url());
        assert_eq!(editor.profile_photo.source(), Some("/tmp/me.jpg"));

        editor.profile_photo.url_input = "https://x/me.png".to_string();
        assert!(editor.profile_photo.apply_url());
        assert_eq!(editor.profile_photo.picked, None);
        assert_eq!(editor.profile_photo.source(), Some("https://x/me.png"));
    }
}
