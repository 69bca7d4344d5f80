//! Copies picked images into the site's public asset tree under deterministic names.

use crate::{
    gallery::{Cover, Gallery, GalleryItem, is_url},
    statics,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("{action} {path:?}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding image {0}")]
    Decode(String, #[source] image::ImageError),
    #[error("writing PNG {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// How a new local file lands in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Decode and re-encode as RGBA PNG (`<stem>.png`).
    ConvertPng,
    /// Copy the bytes, keeping the lower-cased extension (SVG logos).
    KeepExtension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPolicy {
    /// Store the URL itself.
    Verbatim,
    /// Download, then store the local PNG copy.
    Download,
}

/// Final `images` / `icon` values of a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedGallery {
    pub images: Vec<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssetResolver {
    public_root: PathBuf,
}

impl AssetResolver {
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    pub fn slot_dir(&self, tab_key: &str) -> PathBuf {
        self.public_root.join(statics::DIR_IMAGES).join(tab_key)
    }

    /// Absolute path for a stored `images/...` value (for previews).
    pub fn absolute(&self, stored: &str) -> PathBuf {
        self.public_root.join(stored.trim_start_matches('/'))
    }

    /// `Some("images/...")` when `source` already lives in the asset tree, either as a
    /// stored relative value or as an absolute path under `<public>/images`.
    pub fn in_tree(&self, source: &str) -> Option<String> {
        let source = source.trim();
        let prefix = format!("{}/", statics::DIR_IMAGES);

        let images_root = self.public_root.join(statics::DIR_IMAGES);
        if let Ok(rest) = Path::new(source).strip_prefix(&images_root) {
            let rest = rest.to_string_lossy().replace('\\', "/");
            return Some(format!("{prefix}{rest}"));
        }
        if Path::new(source).is_absolute() {
            return None;
        }

        let normalized = source.replace('\\', "/");
        let relative = normalized.trim_start_matches("./");
        relative.starts_with(&prefix).then(|| relative.to_string())
    }

    /// Resolve one picked source to the value stored in the record.
    ///
    /// Paths already inside `images/` are normalised without copying, so saving the same
    /// record twice never duplicates assets. New files overwrite `<stem>.<ext>` in the slot.
    pub fn resolve(
        &self,
        source: &str,
        tab_key: &str,
        stem: &str,
        copy: CopyPolicy,
        url: UrlPolicy,
    ) -> Result<String, AssetError> {
        let source = source.trim();
        if is_url(source) {
            return match url {
                UrlPolicy::Verbatim => Ok(source.to_string()),
                UrlPolicy::Download => self.download_png(source, tab_key, stem),
            };
        }
        if let Some(rel) = self.in_tree(source) {
            return Ok(rel);
        }
        self.copy_local(Path::new(source), tab_key, stem, copy)
    }

    /// Resolve every gallery item in order. New local files are numbered
    /// `<base>_<n>.png`; the cover maps to the resolved value of its item.
    pub fn resolve_gallery(
        &self,
        gallery: &Gallery,
        tab_key: &str,
        base_name: &str,
    ) -> Result<ResolvedGallery, AssetError> {
        let base = sanitize_stem(base_name, "image");
        let mut images = Vec::with_capacity(gallery.len());
        let mut local_counter = 0;

        for item in gallery.items() {
            let value = match item {
                GalleryItem::Existing(v) => {
                    self.in_tree(v).unwrap_or_else(|| v.replace('\\', "/"))
                }
                GalleryItem::Url(v) => v.clone(),
                GalleryItem::Local(path) => {
                    local_counter += 1;
                    let stem = format!("{base}_{local_counter}");
                    self.copy_local(Path::new(path), tab_key, &stem, CopyPolicy::ConvertPng)?
                }
            };
            images.push(value);
        }

        let icon = match gallery.cover() {
            Some(Cover::Item(idx)) => images.get(*idx).cloned(),
            Some(Cover::External(url)) => Some(url.clone()),
            None => None,
        };
        Ok(ResolvedGallery { images, icon })
    }

    fn copy_local(
        &self,
        src: &Path,
        tab_key: &str,
        stem: &str,
        policy: CopyPolicy,
    ) -> Result<String, AssetError> {
        if !src.is_file() {
            return Err(AssetError::NotFound(src.to_path_buf()));
        }
        let dir = self.ensure_slot_dir(tab_key)?;

        let file_name = match policy {
            CopyPolicy::ConvertPng => match image::open(src) {
                Ok(img) => {
                    let name = format!("{stem}.png");
                    let dst = dir.join(&name);
                    img.into_rgba8()
                        .save_with_format(&dst, image::ImageFormat::Png)
                        .map_err(|source| AssetError::Encode {
                            path: dst.clone(),
                            source,
                        })?;
                    name
                }
                Err(e) => {
                    log::warn!("{src:?} is not a decodable image ({e}); copying as-is");
                    copy_bytes(src, &dir, stem)?
                }
            },
            CopyPolicy::KeepExtension => copy_bytes(src, &dir, stem)?,
        };

        log::info!("copied {src:?} to {tab_key}/{file_name}");
        Ok(format!("{}/{tab_key}/{file_name}", statics::DIR_IMAGES))
    }

    fn download_png(&self, url: &str, tab_key: &str, stem: &str) -> Result<String, AssetError> {
        let fetch_err = |source| AssetError::Fetch {
            url: url.to_string(),
            source,
        };
        let bytes = reqwest::blocking::get(url)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(fetch_err)?;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::Decode(url.to_string(), e))?;

        let dir = self.ensure_slot_dir(tab_key)?;
        let name = format!("{stem}.png");
        let dst = dir.join(&name);
        img.into_rgba8()
            .save_with_format(&dst, image::ImageFormat::Png)
            .map_err(|source| AssetError::Encode {
                path: dst.clone(),
                source,
            })?;
        log::info!("downloaded {url} to {tab_key}/{name}");
        Ok(format!("{}/{tab_key}/{name}", statics::DIR_IMAGES))
    }

    fn ensure_slot_dir(&self, tab_key: &str) -> Result<PathBuf, AssetError> {
        let dir = self.slot_dir(tab_key);
        fs::create_dir_all(&dir).map_err(|source| AssetError::Io {
            action: "creating",
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

fn copy_bytes(src: &Path, dir: &Path, stem: &str) -> Result<String, AssetError> {
    let ext = src
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "png".to_string());
    let name = format!("{stem}.{ext}");
    let dst = dir.join(&name);
    fs::copy(src, &dst).map_err(|source| AssetError::Io {
        action: "copying to",
        path: dst,
        source,
    })?;
    Ok(name)
}

/// File stem from a display name: spaces become `_`, anything but letters, digits,
/// `_` and `-` is dropped.
pub fn sanitize_stem(name: &str, fallback: &str) -> String {
    let stem: String = name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem
    }
}

/// Lower-case, dash-separated slug. Empty input gives `item`.
pub fn slugify(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let safe: String = lower
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    let slug = safe.split_whitespace().collect::<Vec<_>>().join("-");
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize_stem, slugify};

    #[test]
    fn sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_stem("İstanbul Teknik Üniv.", "x"), "İstanbul_Teknik_Üniv");
        assert_eq!(sanitize_stem("  ", "icon"), "icon");
        assert_eq!(sanitize_stem("Linked/In", "icon"), "LinkedIn");
    }

    #[test]
    fn slugify_joins_words() {
        assert_eq!(slugify("  Rust Lang!  "), "rust-lang");
        assert_eq!(slugify("C++"), "c");
        assert_eq!(slugify("???"), "item");
    }
}
