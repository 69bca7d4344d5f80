use crate::{
    ContentValue, statics,
    store::{self, StoreError, WriteOptions},
};
use std::path::{Path, PathBuf};

/// The content files the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Info,
    Socials,
    Experience,
    Competitions,
    Projects,
    Certificates,
    Stack,
    Courses,
}

impl Entity {
    pub const ALL: [Entity; 8] = [
        Entity::Info,
        Entity::Socials,
        Entity::Experience,
        Entity::Competitions,
        Entity::Projects,
        Entity::Certificates,
        Entity::Stack,
        Entity::Courses,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Entity::Info => "info",
            Entity::Socials => "socials",
            Entity::Experience => "experience",
            Entity::Competitions => "competitions",
            Entity::Projects => "projects",
            Entity::Certificates => "certificates",
            Entity::Stack => "stack",
            Entity::Courses => "courses",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Entity::Info => "Info",
            Entity::Socials => "Socials",
            Entity::Experience => "Experience",
            Entity::Competitions => "Competitions",
            Entity::Projects => "Projects",
            Entity::Certificates => "Certificates",
            Entity::Stack => "Stack",
            Entity::Courses => "Technical Courses",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, RepositoryError> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| RepositoryError::UnknownEntity(name.to_string()))
    }

    pub fn is_singleton(self) -> bool {
        matches!(self, Entity::Info)
    }

    /// Value used when the file is missing or unreadable.
    pub fn default_value(self) -> ContentValue {
        if self.is_singleton() {
            ContentValue::empty_object()
        } else {
            ContentValue::empty_array()
        }
    }

    /// Asset sub-directory under `images/` for this entity.
    pub fn tab_key(self) -> String {
        format!("{}_tab", self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("unknown entity {0:?}")]
    UnknownEntity(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persistence seam used by the list controller.
pub trait EntityStore {
    fn path_for(&self, entity: Entity) -> PathBuf;
    fn load(&self, entity: Entity) -> ContentValue;
    fn save(&self, entity: Entity, value: &ContentValue) -> Result<PathBuf, RepositoryError>;
}

/// Maps entity names to JSON files under a content root.
#[derive(Debug, Clone)]
pub struct Repository {
    project_root: PathBuf,
    content_root: PathBuf,
    write_options: WriteOptions,
}

impl Repository {
    pub fn new(project_root: impl Into<PathBuf>, content_root: impl AsRef<Path>) -> Self {
        let mut repo = Self {
            project_root: project_root.into(),
            content_root: PathBuf::new(),
            write_options: WriteOptions::default(),
        };
        repo.set_content_root(content_root);
        repo
    }

    /// Repository rooted at the auto-detected content directory of `project_root`.
    pub fn autodetect(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let root = autodetect_content_root(&project_root, None);
        Self::new(project_root, root)
    }

    pub fn with_backups(mut self, backup: bool) -> Self {
        self.write_options.backup = backup;
        self
    }

    pub fn set_backups(&mut self, backup: bool) {
        self.write_options.backup = backup;
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Pure state update; no I/O happens until the next load/save.
    pub fn set_content_root(&mut self, root: impl AsRef<Path>) {
        self.content_root = resolve_root(&self.project_root, root.as_ref());
    }

    pub fn path_for_name(&self, name: &str) -> Result<PathBuf, RepositoryError> {
        Ok(self.path_for(Entity::from_name(name)?))
    }

    pub fn load_name(&self, name: &str) -> Result<ContentValue, RepositoryError> {
        Ok(self.load(Entity::from_name(name)?))
    }

    pub fn save_name(&self, name: &str, value: &ContentValue) -> Result<PathBuf, RepositoryError> {
        self.save(Entity::from_name(name)?, value)
    }

    /// `.../frontend/public` for a content root of `.../frontend/public/content`.
    pub fn public_dir(&self) -> PathBuf {
        content_to_public_dir(&self.content_root)
    }

    pub fn images_dir(&self, tab_key: &str) -> PathBuf {
        self.public_dir().join(statics::DIR_IMAGES).join(tab_key)
    }
}

impl EntityStore for Repository {
    fn path_for(&self, entity: Entity) -> PathBuf {
        self.content_root
            .join(format!("{}.{}", entity.name(), statics::FILE_EXT_JSON))
    }

    fn load(&self, entity: Entity) -> ContentValue {
        store::read(&self.path_for(entity), entity.default_value())
    }

    fn save(&self, entity: Entity, value: &ContentValue) -> Result<PathBuf, RepositoryError> {
        let path = self.path_for(entity);
        store::write_with(&path, value, self.write_options)?;
        log::info!("saved {} to {path:?}", entity.name());
        Ok(path)
    }
}

fn resolve_root(project_root: &Path, root: &Path) -> PathBuf {
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        project_root.join(root)
    }
}

fn default_content_subpath() -> PathBuf {
    Path::new(statics::DIR_FRONTEND)
        .join(statics::DIR_PUBLIC)
        .join(statics::DIR_CONTENT)
}

/// Pick the content directory: the first candidate that holds `info.json` or exists,
/// otherwise the first candidate. Never fails.
pub fn autodetect_content_root(project_root: &Path, app_dir: Option<&Path>) -> PathBuf {
    let mut candidates = vec![project_root.join(default_content_subpath())];
    if let Some(app_dir) = app_dir {
        candidates.push(app_dir.join(default_content_subpath()));
    }

    candidates
        .iter()
        .find(|c| c.join(statics::MARKER_FILE).exists() || c.exists())
        .unwrap_or(&candidates[0])
        .clone()
}

pub fn content_to_public_dir(content_root: &Path) -> PathBuf {
    if content_root.file_name().and_then(|n| n.to_str()) == Some(statics::DIR_PUBLIC) {
        return content_root.to_path_buf();
    }
    content_root
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| content_root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{Entity, RepositoryError, content_to_public_dir, resolve_root};
    use std::path::Path;

    #[test]
    fn entity_names_roundtrip() {
        for entity in Entity::ALL {
            assert_eq!(Entity::from_name(entity.name()).unwrap(), entity);
        }
        assert!(matches!(
            Entity::from_name("blog"),
            Err(RepositoryError::UnknownEntity(name)) if name == "blog"
        ));
    }

    #[test]
    fn only_info_is_singleton() {
        let singletons: Vec<_> = Entity::ALL.into_iter().filter(|e| e.is_singleton()).collect();
        assert_eq!(singletons, vec![Entity::Info]);
        assert_eq!(Entity::Projects.tab_key(), "projects_tab");
    }

    #[cfg(unix)]
    #[test]
    fn relative_roots_resolve_against_project_root() {
        let project = Path::new("/work/site");
        assert_eq!(
            resolve_root(project, Path::new("frontend/public/content")),
            Path::new("/work/site/frontend/public/content")
        );
        assert_eq!(
            resolve_root(project, Path::new("/elsewhere")),
            Path::new("/elsewhere")
        );
    }

    #[cfg(unix)]
    #[test]
    fn public_dir_is_parent_of_content_root() {
        assert_eq!(
            content_to_public_dir(Path::new("/a/frontend/public/content")),
            Path::new("/a/frontend/public")
        );
        assert_eq!(
            content_to_public_dir(Path::new("/a/frontend/public")),
            Path::new("/a/frontend/public")
        );
    }
}
