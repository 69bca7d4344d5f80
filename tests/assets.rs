use portfolio_editor::{
    assets::{AssetError, AssetResolver, CopyPolicy, UrlPolicy},
    gallery::{Gallery, GalleryItem},
};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn write_png(path: &std::path::Path) -> Result<()> {
    image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255])).save(path)?;
    Ok(())
}

#[test]
fn in_tree_values_are_never_copied() -> Result<()> {
    let public = tempfile::tempdir()?;
    let resolver = AssetResolver::new(public.path());

    for _ in 0..2 {
        let stored = resolver.resolve(
            "./images/projects_tab/site_1.png",
            "projects_tab",
            "ignored",
            CopyPolicy::ConvertPng,
            UrlPolicy::Verbatim,
        )?;
        assert_eq!(stored, "images/projects_tab/site_1.png");
    }
    let absolute = public.path().join("images").join("stack_tab").join("rust.svg");
    assert_eq!(
        resolver.in_tree(&absolute.display().to_string()).as_deref(),
        Some("images/stack_tab/rust.svg")
    );
    assert!(!public.path().join("images").exists());
    Ok(())
}

#[test]
fn local_images_are_converted_to_png() -> Result<()> {
    let public = tempfile::tempdir()?;
    let src_dir = tempfile::tempdir()?;
    let src = src_dir.path().join("photo.png");
    write_png(&src)?;

    let resolver = AssetResolver::new(public.path());
    let stored = resolver.resolve(
        &src.display().to_string(),
        "socials_tab",
        "GitHub",
        CopyPolicy::ConvertPng,
        UrlPolicy::Verbatim,
    )?;
    assert_eq!(stored, "images/socials_tab/GitHub.png");
    assert!(resolver.absolute(&stored).is_file());
    Ok(())
}

#[test]
fn logos_keep_their_extension() -> Result<()> {
    let public = tempfile::tempdir()?;
    let src_dir = tempfile::tempdir()?;
    let src = src_dir.path().join("Logo.SVG");
    std::fs::write(&src, "<svg/>")?;

    let resolver = AssetResolver::new(public.path());
    let stored = resolver.resolve(
        &src.display().to_string(),
        "stack_tab",
        "rust-lang",
        CopyPolicy::KeepExtension,
        UrlPolicy::Verbatim,
    )?;
    assert_eq!(stored, "images/stack_tab/rust-lang.svg");
    assert_eq!(std::fs::read_to_string(resolver.absolute(&stored))?, "<svg/>");
    Ok(())
}

#[test]
fn gallery_numbers_new_files_and_tracks_cover() -> Result<()> {
    let public = tempfile::tempdir()?;
    let src_dir = tempfile::tempdir()?;
    let a = src_dir.path().join("a.png");
    let b = src_dir.path().join("b.png");
    write_png(&a)?;
    write_png(&b)?;

    let mut gallery = Gallery::from_stored(&["images/projects_tab/old.png".to_string()], None);
    gallery.add_local(a.display().to_string());
    gallery.add_url("https://cdn.example/shot.png");
    gallery.add_local(b.display().to_string());
    gallery.set_cover(3);

    let resolver = AssetResolver::new(public.path());
    let resolved = resolver.resolve_gallery(&gallery, "projects_tab", "My Site")?;
    assert_eq!(
        resolved.images,
        vec![
            "images/projects_tab/old.png",
            "images/projects_tab/My_Site_1.png",
            "https://cdn.example/shot.png",
            "images/projects_tab/My_Site_2.png",
        ]
    );
    assert_eq!(resolved.icon.as_deref(), Some("images/projects_tab/My_Site_2.png"));
    assert_eq!(
        gallery.items()[0],
        GalleryItem::Existing("images/projects_tab/old.png".to_string())
    );
    Ok(())
}

#[test]
fn missing_source_is_not_found() -> Result<()> {
    let public = tempfile::tempdir()?;
    let resolver = AssetResolver::new(public.path());
    let result = resolver.resolve(
        "/definitely/not/here.png",
        "socials_tab",
        "x",
        CopyPolicy::ConvertPng,
        UrlPolicy::Verbatim,
    );
    assert!(matches!(result, Err(AssetError::NotFound(_))));
    Ok(())
}
