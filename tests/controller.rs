use portfolio_editor::{
    ContentValue, Entity, EntityStore, Repository,
    assets::AssetResolver,
    bilingual::Bilingual,
    controller::{ControllerError, ListController},
    entities::{self, FieldValue},
    repository::RepositoryError,
    store::StoreError,
};
use pretty_assertions::assert_eq;
use std::{cell::Cell, path::PathBuf};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Repository whose saves can be switched to fail.
struct FlakyStore {
    inner: Repository,
    fail: Cell<bool>,
}

impl EntityStore for FlakyStore {
    fn path_for(&self, entity: Entity) -> PathBuf {
        self.inner.path_for(entity)
    }

    fn load(&self, entity: Entity) -> ContentValue {
        self.inner.load(entity)
    }

    fn save(
        &self,
        entity: Entity,
        value: &ContentValue,
    ) -> std::result::Result<PathBuf, RepositoryError> {
        if self.fail.get() {
            return Err(RepositoryError::Store(StoreError::Persist {
                path: self.path_for(entity),
                source: std::io::Error::other("disk unplugged"),
            }));
        }
        self.inner.save(entity, value)
    }
}

fn setup() -> Result<(tempfile::TempDir, Repository, AssetResolver)> {
    let dir = tempfile::tempdir()?;
    let repo = Repository::new(dir.path(), "frontend/public/content");
    let resolver = AssetResolver::new(repo.public_dir());
    Ok((dir, repo, resolver))
}

fn set_title(ctrl: &mut ListController, title: &str) {
    let idx = ctrl.config().field_index("title").expect("title field");
    ctrl.form.values[idx] = FieldValue::Bilingual {
        value: Bilingual::new(title),
        keep_tr: false,
    };
}

fn titles(ctrl: &ListController) -> Vec<String> {
    ctrl.rows().into_iter().map(|row| row[0].clone()).collect()
}

fn order_indices(value: &ContentValue) -> Vec<i64> {
    value
        .as_array()
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.get("order_index"))
        .filter_map(|v| match v {
            ContentValue::Number(n) => n.as_i64(),
            _ => None,
        })
        .collect()
}

fn seeded(repo: &Repository, resolver: &AssetResolver, n: usize) -> Result<ListController> {
    let mut ctrl = ListController::new(&entities::EXPERIENCE);
    ctrl.load(repo);
    for i in 0..n {
        ctrl.reset_form();
        set_title(&mut ctrl, &format!("job {i}"));
        ctrl.upsert(repo, resolver)?;
    }
    Ok(ctrl)
}

#[test]
fn experience_scenario() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let mut ctrl = ListController::new(&entities::EXPERIENCE);
    ctrl.load(&repo);
    assert!(ctrl.records().is_empty());

    ctrl.reset_form();
    set_title(&mut ctrl, "Engineer");
    let org = ctrl.config().field_index("organization").ok_or("organization")?;
    ctrl.form.values[org] = FieldValue::Text("  ACME ".to_string());
    assert_eq!(ctrl.upsert(&repo, &resolver)?, 0);
    assert_eq!(ctrl.selected(), Some(0));

    let on_disk = repo.load(Entity::Experience);
    let record = on_disk.as_array().and_then(|a| a.first()).ok_or("one record")?;
    assert_eq!(record.get("order_index"), Some(&ContentValue::int(0)));
    assert_eq!(record.get("organization"), Some(&ContentValue::string("ACME")));
    assert_eq!(
        record.get("title").map(ContentValue::to_compact_json).as_deref(),
        Some(r#"{"en": "Engineer"}"#)
    );
    assert_eq!(ctrl.rows(), vec![vec!["Engineer", "ACME", ""]]);

    assert!(!ctrl.move_by(&repo, 0, -1)?);
    assert!(ctrl.delete(&repo, &[0])?);
    assert_eq!(repo.load(Entity::Experience), ContentValue::empty_array());
    assert_eq!(ctrl.selected(), None);
    Ok(())
}

#[test]
fn update_replaces_selected_record() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let mut ctrl = seeded(&repo, &resolver, 3)?;

    ctrl.select(1);
    set_title(&mut ctrl, "renamed");
    assert_eq!(ctrl.upsert(&repo, &resolver)?, 1);
    assert_eq!(titles(&ctrl), vec!["job 0", "renamed", "job 2"]);

    // Out-of-range selection is ignored.
    ctrl.select(99);
    assert_eq!(ctrl.selected(), Some(1));
    Ok(())
}

#[test]
fn moving_down_then_up_restores_order() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let mut ctrl = seeded(&repo, &resolver, 3)?;

    ctrl.select(0);
    assert!(ctrl.move_by(&repo, 0, 1)?);
    assert_eq!(titles(&ctrl), vec!["job 1", "job 0", "job 2"]);
    assert_eq!(ctrl.selected(), Some(1));
    assert_eq!(order_indices(&repo.load(Entity::Experience)), vec![0, 1, 2]);

    assert!(ctrl.move_selected(&repo, -1)?);
    assert_eq!(titles(&ctrl), vec!["job 0", "job 1", "job 2"]);
    assert_eq!(ctrl.selected(), Some(0));

    assert!(!ctrl.move_by(&repo, 2, 1)?);
    Ok(())
}

#[test]
fn moving_an_unselected_row_selects_it() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let mut ctrl = seeded(&repo, &resolver, 3)?;
    ctrl.reset_form();

    assert!(ctrl.move_by(&repo, 2, -1)?);
    assert_eq!(titles(&ctrl), vec!["job 0", "job 2", "job 1"]);
    assert_eq!(ctrl.selected(), Some(1));
    assert_eq!(ctrl.config().text_of(&ctrl.form, "title"), "job 2");
    Ok(())
}

#[test]
fn delete_renumbers_and_ignores_bad_indices() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let mut ctrl = seeded(&repo, &resolver, 5)?;

    assert!(!ctrl.delete(&repo, &[7, 9])?);
    assert!(ctrl.delete(&repo, &[2])?);
    assert_eq!(titles(&ctrl), vec!["job 0", "job 1", "job 3", "job 4"]);
    assert_eq!(order_indices(&repo.load(Entity::Experience)), vec![0, 1, 2, 3]);

    assert!(ctrl.delete(&repo, &[3, 0, 3, 42])?);
    assert_eq!(titles(&ctrl), vec!["job 1", "job 3"]);
    Ok(())
}

#[test]
fn passthrough_keys_survive_an_update() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    repo.save(
        Entity::Experience,
        &ContentValue::parse(
            r#"[{"title": {"en": "A", "tr": "B"}, "custom_flag": true, "order_index": 7}]"#,
        )?,
    )?;

    let mut ctrl = ListController::new(&entities::EXPERIENCE);
    ctrl.load(&repo);
    ctrl.select(0);
    ctrl.upsert(&repo, &resolver)?;

    let saved = repo.load(Entity::Experience);
    let record = saved.as_array().and_then(|a| a.first()).ok_or("record")?;
    assert_eq!(record.get("custom_flag"), Some(&ContentValue::Bool(true)));
    assert_eq!(record.get("order_index"), Some(&ContentValue::int(0)));
    assert_eq!(
        record.get("title").map(ContentValue::to_compact_json).as_deref(),
        Some(r#"{"en": "A", "tr": "B"}"#)
    );
    Ok(())
}

#[test]
fn bilingual_fields_keep_extra_languages_on_update() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    repo.save(
        Entity::Experience,
        &ContentValue::parse(r#"[{"title": {"EN": "A", "de": "B", "tr": null}}]"#)?,
    )?;

    let mut ctrl = ListController::new(&entities::EXPERIENCE);
    ctrl.load(&repo);
    ctrl.select(0);
    ctrl.upsert(&repo, &resolver)?;

    let saved = repo.load(Entity::Experience);
    let record = saved.as_array().and_then(|a| a.first()).ok_or("record")?;
    assert_eq!(
        record.get("title").map(ContentValue::to_compact_json).as_deref(),
        Some(r#"{"EN": "A", "de": "B", "tr": null}"#)
    );
    Ok(())
}

#[test]
fn non_list_file_loads_empty_and_loose_elements_are_kept() -> Result<()> {
    let mut ctrl = ListController::new(&entities::SOCIALS);
    ctrl.load_from(ContentValue::parse(r#"{"oops": 1}"#)?);
    assert!(ctrl.records().is_empty());

    ctrl.load_from(ContentValue::parse(r#"[{"platform": "GitHub"}, "stray", 3]"#)?);
    assert_eq!(ctrl.records()[1], ContentValue::string("stray"));
    assert_eq!(ctrl.rows()[1], vec!["", "", "", ""]);
    Ok(())
}

#[test]
fn failed_save_rolls_back() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let store = FlakyStore {
        inner: repo,
        fail: Cell::new(false),
    };
    let mut ctrl = ListController::new(&entities::EXPERIENCE);
    ctrl.load(&store);
    set_title(&mut ctrl, "kept");
    ctrl.upsert(&store, &resolver)?;
    ctrl.reset_form();
    set_title(&mut ctrl, "second");
    ctrl.upsert(&store, &resolver)?;

    store.fail.set(true);
    let before = ctrl.records().to_vec();

    ctrl.reset_form();
    set_title(&mut ctrl, "lost");
    assert!(matches!(
        ctrl.upsert(&store, &resolver),
        Err(ControllerError::Repository(_))
    ));
    assert_eq!(ctrl.records(), before.as_slice());
    assert_eq!(ctrl.selected(), None);

    assert!(ctrl.delete(&store, &[0]).is_err());
    assert_eq!(ctrl.records(), before.as_slice());

    ctrl.select(0);
    assert!(ctrl.move_by(&store, 0, 1).is_err());
    assert_eq!(ctrl.records(), before.as_slice());
    assert_eq!(ctrl.selected(), Some(0));
    Ok(())
}

#[test]
fn form_errors_do_not_touch_records() -> Result<()> {
    let (_dir, repo, resolver) = setup()?;
    let mut ctrl = ListController::new(&entities::COURSES);
    ctrl.load(&repo);

    let type_idx = ctrl.config().field_index("type").ok_or("type")?;
    ctrl.form.values[type_idx] = FieldValue::Choice("optional".to_string());
    assert!(matches!(
        ctrl.upsert(&repo, &resolver),
        Err(ControllerError::Form(_))
    ));
    assert!(ctrl.records().is_empty());
    assert!(!ctrl.target_path(&repo).ok_or("path")?.exists());
    Ok(())
}

#[test]
fn missing_gallery_file_is_a_form_error() -> Result<()> {
    let (dir, repo, resolver) = setup()?;
    let mut ctrl = ListController::new(&entities::PROJECTS);
    set_title(&mut ctrl, "Site");
    let idx = ctrl.config().field_index("images").ok_or("images")?;
    if let FieldValue::Gallery(gallery) = &mut ctrl.form.values[idx] {
        gallery.add_local(dir.path().join("nope.png").display().to_string());
    }
    assert!(matches!(
        ctrl.upsert(&repo, &resolver),
        Err(ControllerError::Form(_))
    ));
    assert!(ctrl.records().is_empty());
    Ok(())
}
