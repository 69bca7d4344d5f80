use portfolio_editor::{
    ContentValue,
    store::{self, WriteOptions},
};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn entries(dir: &std::path::Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn dropped_stage_leaves_target_intact_and_no_temp_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("projects.json");
    store::write(&path, &ContentValue::parse(r#"[{"title": "old"}]"#)?)?;
    let before = std::fs::read(&path)?;

    let staged = store::stage(
        &path,
        &ContentValue::parse(r#"[{"title": "new"}]"#)?,
        WriteOptions::default(),
    )?;
    let temp = staged.temp_path().to_path_buf();
    assert!(temp.exists());
    assert_eq!(temp.parent(), path.parent());
    drop(staged);

    assert!(!temp.exists());
    assert_eq!(std::fs::read(&path)?, before);
    assert_eq!(entries(dir.path())?, vec!["projects.json"]);
    Ok(())
}

#[test]
fn commit_replaces_target_with_pretty_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("info.json");
    let value = ContentValue::parse(r#"{"full_name": "Ayşe", "year": 2024}"#)?;

    store::stage(&path, &value, WriteOptions::default())?.commit()?;

    assert_eq!(
        std::fs::read_to_string(&path)?,
        "{\n  \"full_name\": \"Ayşe\",\n  \"year\": 2024\n}\n"
    );
    assert_eq!(entries(path.parent().ok_or("no parent")?)?, vec!["info.json"]);
    Ok(())
}

#[test]
fn backup_keeps_previous_version() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stack.json");
    let options = WriteOptions { backup: true };

    // First write has nothing to back up.
    store::write_with(&path, &ContentValue::parse("[1]")?, options)?;
    assert!(!store::backup_path(&path).exists());

    store::write_with(&path, &ContentValue::parse("[2]")?, options)?;
    store::write_with(&path, &ContentValue::parse("[3]")?, options)?;

    let bak = store::read(&store::backup_path(&path), ContentValue::Null);
    assert_eq!(bak, ContentValue::parse("[2]")?);
    assert_eq!(store::read(&path, ContentValue::Null), ContentValue::parse("[3]")?);
    Ok(())
}

#[test]
fn read_falls_back_to_default() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing.json");
    assert_eq!(
        store::read(&missing, ContentValue::empty_array()),
        ContentValue::empty_array()
    );

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json")?;
    assert_eq!(
        store::read(&broken, ContentValue::empty_object()),
        ContentValue::empty_object()
    );
    Ok(())
}

#[test]
fn write_then_read_roundtrips_order_and_numbers() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("courses.json");
    let value = ContentValue::parse(
        r#"[{"z": 1, "a": -2, "f": 0.25, "s": "ç\n", "n": null, "b": false, "o": {}}]"#,
    )?;
    store::write(&path, &value)?;
    assert_eq!(store::read(&path, ContentValue::Null), value);
    Ok(())
}

#[cfg(unix)]
#[test]
fn write_keeps_target_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("info.json");
    std::fs::write(&path, "{}")?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640))?;

    store::write(&path, &ContentValue::parse(r#"{"full_name": "Ada"}"#)?)?;
    assert_eq!(std::fs::metadata(&path)?.permissions().mode() & 0o777, 0o640);

    let fresh = dir.path().join("socials.json");
    store::write(&fresh, &ContentValue::parse("[]")?)?;
    assert_eq!(std::fs::metadata(&fresh)?.permissions().mode() & 0o777, 0o644);
    Ok(())
}
