//! Ordered image list with one designated cover.

use crate::{ContentValue, statics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryItem {
    /// Already stored in the record (usually `images/...` or a URL).
    Existing(String),
    /// Picked from disk; copied into the asset tree when the record is saved.
    Local(String),
    /// External http(s) image, stored verbatim.
    Url(String),
}

impl GalleryItem {
    pub fn value(&self) -> &str {
        match self {
            GalleryItem::Existing(v) | GalleryItem::Local(v) | GalleryItem::Url(v) => v,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            GalleryItem::Existing(_) => "[=]",
            GalleryItem::Local(_) => "[+]",
            GalleryItem::Url(_) => "[U]",
        }
    }

    /// Short label: file name for paths, the full string for URLs.
    pub fn label(&self) -> String {
        let v = self.value();
        if is_url(v) {
            return v.to_string();
        }
        std::path::Path::new(v)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    /// Index into the gallery's items.
    Item(usize),
    /// External image that is not part of the list.
    External(String),
}

/// The cover can never point past the end of `items`: removing the cover item clears it,
/// removing an earlier item shifts it down, and moves carry it along.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    cover: Option<Cover>,
}

impl Gallery {
    /// Hydrate from stored `images` and `icon` values.
    pub fn from_stored(images: &[String], icon: Option<&str>) -> Self {
        let items: Vec<GalleryItem> = images
            .iter()
            .map(|v| GalleryItem::Existing(v.clone()))
            .collect();
        let cover = icon.filter(|s| !s.is_empty()).and_then(|icon| {
            match items.iter().position(|it| it.value() == icon) {
                Some(idx) => Some(Cover::Item(idx)),
                None if is_url(icon) => Some(Cover::External(icon.to_string())),
                // A dangling local reference is dropped on load.
                None => None,
            }
        });
        Self { items, cover }
    }

    pub fn from_record(record: &crate::ContentMap) -> Self {
        let images: Vec<String> = record
            .get(statics::KEY_IMAGES)
            .and_then(ContentValue::as_array)
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        let icon = record.get(statics::KEY_ICON).and_then(ContentValue::as_str);
        Self::from_stored(&images, icon)
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn cover(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    pub fn cover_index(&self) -> Option<usize> {
        match self.cover {
            Some(Cover::Item(idx)) => Some(idx),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Append an item. A gallery without a cover gets its first item as the cover.
    pub fn push(&mut self, item: GalleryItem) {
        self.items.push(item);
        if self.cover.is_none() {
            self.cover = Some(Cover::Item(0));
        }
    }

    pub fn add_local(&mut self, path: impl Into<String>) {
        self.push(GalleryItem::Local(path.into()));
    }

    /// Add an http(s) URL; returns false (and changes nothing) for anything else.
    pub fn add_url(&mut self, url: &str) -> bool {
        let url = url.trim();
        if !is_url(url) {
            return false;
        }
        self.push(GalleryItem::Url(url.to_string()));
        true
    }

    pub fn set_cover(&mut self, idx: usize) {
        if idx < self.items.len() {
            self.cover = Some(Cover::Item(idx));
        }
    }

    pub fn clear_cover(&mut self) {
        self.cover = None;
    }

    pub fn remove(&mut self, idx: usize) -> Option<GalleryItem> {
        if idx >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(idx);
        if let Some(Cover::Item(cover)) = self.cover {
            if cover == idx {
                self.cover = None;
            } else if idx < cover {
                self.cover = Some(Cover::Item(cover - 1));
            }
        }
        Some(removed)
    }

    /// Remove the first item whose stored value equals `value`.
    pub fn remove_value(&mut self, value: &str) -> Option<GalleryItem> {
        let idx = self.items.iter().position(|it| it.value() == value)?;
        self.remove(idx)
    }

    /// Swap `idx` with `idx + delta`. Returns the new index of the moved item.
    pub fn move_by(&mut self, idx: usize, delta: isize) -> Option<usize> {
        let target = idx.checked_add_signed(delta)?;
        if idx >= self.items.len() || target >= self.items.len() {
            return None;
        }
        self.items.swap(idx, target);
        if let Some(Cover::Item(cover)) = self.cover {
            if cover == idx {
                self.cover = Some(Cover::Item(target));
            } else if cover == target {
                self.cover = Some(Cover::Item(idx));
            }
        }
        Some(target)
    }

    /// The stored `icon` value for items whose final value is already known.
    pub fn cover_value(&self) -> Option<String> {
        match self.cover.as_ref()? {
            Cover::Item(idx) => self.items.get(*idx).map(|it| it.value().replace('\\', "/")),
            Cover::External(url) => Some(url.clone()),
        }
    }
}

pub fn is_url(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://")
}
