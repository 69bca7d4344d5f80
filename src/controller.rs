//! Generic list editor behind every list tab.
//!
//! Persistence is write-through: each mutation saves the whole list before returning,
//! and a failed save rolls the in-memory change back.

use crate::{
    ContentValue,
    assets::AssetResolver,
    entities::{EntityConfig, FormError, FormState},
    repository::{EntityStore, RepositoryError},
    statics,
};
use std::{collections::BTreeSet, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, Clone)]
pub struct ListController {
    config: &'static EntityConfig,
    records: Vec<ContentValue>,
    selected: Option<usize>,
    /// Editor state; the GUI edits it in place.
    pub form: FormState,
}

impl ListController {
    pub fn new(config: &'static EntityConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            selected: None,
            form: config.empty_form(),
        }
    }

    pub fn config(&self) -> &'static EntityConfig {
        self.config
    }

    pub fn records(&self) -> &[ContentValue] {
        &self.records
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn load(&mut self, store: &dyn EntityStore) {
        let value = store.load(self.config.entity);
        self.load_from(value);
    }

    /// Replace the list with `value`. Anything but an array loads as empty; elements that
    /// are not objects are kept as they are.
    pub fn load_from(&mut self, value: ContentValue) {
        self.records = match value {
            ContentValue::Array(items) => items,
            other => {
                if !other.is_null() {
                    log::warn!(
                        "{} is a {}, not a list; starting empty",
                        self.config.entity.name(),
                        other.type_name()
                    );
                }
                Vec::new()
            }
        };
        reindex(&mut self.records);
        self.reset_form();
        log::debug!(
            "loaded {} {} records",
            self.records.len(),
            self.config.entity.name()
        );
    }

    /// Clear the selection and start a fresh record.
    pub fn reset_form(&mut self) {
        self.selected = None;
        self.form = self.config.empty_form();
    }

    /// Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        let Some(record) = self.records.get(index) else {
            return;
        };
        let empty = crate::ContentMap::new();
        self.form = self.config.hydrate(record.as_object().unwrap_or(&empty));
        self.selected = Some(index);
    }

    /// Write the form into the list: replace the selected record, or append and select.
    pub fn upsert(&mut self, store: &dyn EntityStore, resolver: &AssetResolver) -> Result<usize> {
        let record = ContentValue::Object(self.config.record_from_form(&self.form, resolver)?);

        let before = (self.records.clone(), self.selected);
        let index = match self.selected.filter(|&i| i < self.records.len()) {
            Some(i) => {
                self.records[i] = record;
                i
            }
            None => {
                self.records.push(record);
                self.records.len() - 1
            }
        };
        self.selected = Some(index);
        reindex(&mut self.records);

        if let Err(e) = self.persist(store) {
            (self.records, self.selected) = before;
            return Err(e);
        }
        // Re-hydrate so newly copied assets show up as stored values.
        self.select(index);
        log::info!("upserted {} record {index}", self.config.entity.name());
        Ok(index)
    }

    /// Remove the given rows. Returns false when none of them exist.
    pub fn delete(&mut self, store: &dyn EntityStore, indices: &[usize]) -> Result<bool> {
        let unique: BTreeSet<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.records.len())
            .collect();
        if unique.is_empty() {
            return Ok(false);
        }

        let before = self.records.clone();
        for &i in unique.iter().rev() {
            self.records.remove(i);
        }
        reindex(&mut self.records);

        if let Err(e) = self.persist(store) {
            self.records = before;
            return Err(e);
        }
        self.reset_form();
        log::info!(
            "deleted {} {} records",
            unique.len(),
            self.config.entity.name()
        );
        Ok(true)
    }

    /// Swap `index` with its neighbour in `direction`. The moved record ends up selected;
    /// form edits are kept when it already was. Returns false when the move would leave
    /// the list.
    pub fn move_by(
        &mut self,
        store: &dyn EntityStore,
        index: usize,
        direction: isize,
    ) -> Result<bool> {
        let Some(target) = index.checked_add_signed(direction) else {
            return Ok(false);
        };
        if index >= self.records.len() || target >= self.records.len() {
            return Ok(false);
        }

        let before = self.records.clone();
        self.records.swap(index, target);
        reindex(&mut self.records);

        if let Err(e) = self.persist(store) {
            self.records = before;
            return Err(e);
        }
        if self.selected == Some(index) {
            self.selected = Some(target);
        } else {
            self.select(target);
        }
        Ok(true)
    }

    pub fn move_selected(&mut self, store: &dyn EntityStore, direction: isize) -> Result<bool> {
        match self.selected {
            Some(index) => self.move_by(store, index, direction),
            None => Ok(false),
        }
    }

    /// Explicit save: renumber and write the current list.
    pub fn save(&mut self, store: &dyn EntityStore) -> Result<PathBuf> {
        reindex(&mut self.records);
        self.persist(store)
    }

    pub fn summary(&self, record: &ContentValue) -> Vec<String> {
        self.config.summary(record)
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(|r| self.summary(r)).collect()
    }

    pub fn target_path(&self, store: &dyn EntityStore) -> Option<PathBuf> {
        Some(store.path_for(self.config.entity))
    }

    pub fn to_value(&self) -> ContentValue {
        ContentValue::Array(self.records.clone())
    }

    fn persist(&self, store: &dyn EntityStore) -> Result<PathBuf> {
        Ok(store.save(self.config.entity, &self.to_value())?)
    }
}

/// Set `order_index` to the list position on every object record.
pub fn reindex(records: &mut [ContentValue]) {
    for (i, record) in records.iter_mut().enumerate() {
        if let Some(map) = record.as_object_mut() {
            let index = i64::try_from(i).unwrap_or(i64::MAX);
            map.insert(
                statics::KEY_ORDER_INDEX.to_string(),
                ContentValue::int(index),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::reindex;
    use crate::ContentValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn reindex_skips_non_objects() {
        let mut records = match ContentValue::parse(r#"[{"a": 1}, "loose", {"order_index": 9}]"#)
            .unwrap()
        {
            ContentValue::Array(items) => items,
            _ => unreachable!(),
        };
        reindex(&mut records);
        assert_eq!(records[0].get("order_index"), Some(&ContentValue::int(0)));
        assert_eq!(records[1], ContentValue::string("loose"));
        assert_eq!(records[2].get("order_index"), Some(&ContentValue::int(2)));
    }
}
