use crate::{
    assets::{AssetResolver, CopyPolicy, UrlPolicy, sanitize_stem},
    controller::ListController,
    dynamic_form::{FormField, Widget},
    entities::{self, EntityConfig, FieldKind, FieldSpec, FieldValue, ImageSlot},
    gallery::GalleryItem,
    info::{InfoEditor, InfoSlot},
    repository::{Entity, Repository, autodetect_content_root},
    settings::{self, Settings},
    statics,
};
use anyhow::Context as _;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{collections::BTreeSet, path::PathBuf};

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            let app = PortfolioApp::startup();
            cc.egui_ctx.set_visuals(if app.settings.dark_theme {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(app))
        }),
    )
}

/// Application state: the repository, one editor per tab and the shell's UI state.
struct PortfolioApp {
    repo: Repository,
    settings: Settings,
    settings_path: Option<PathBuf>,
    root_input: String,
    active: Entity,
    info: InfoEditor,
    lists: Vec<ListController>,
    /// Rows ticked for deletion, per list tab.
    marked: Vec<BTreeSet<usize>>,
    gallery_selected: Option<usize>,
    gallery_url_input: String,
    dialog_dir: Option<PathBuf>,
    status: String,
    last_error: Option<String>,
}

/// What a list tab asked for this frame. Applied after rendering so the controller is
/// not borrowed by the UI closures.
enum ListOp {
    New,
    Select(usize),
    Upsert,
    Delete,
    Move(isize),
}

impl PortfolioApp {
    fn startup() -> Self {
        let settings_path = Settings::default_path();
        let settings = settings_path
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();

        let project_root = settings::project_root_from_env();
        let content_root = settings::content_root_from_env()
            .or_else(|| settings.content_root.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| {
                let app_dir = std::env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(PathBuf::from));
                autodetect_content_root(&project_root, app_dir.as_deref())
            });
        let repo = Repository::new(project_root, content_root).with_backups(settings.backups);
        log::info!("content root: {:?}", repo.content_root());

        let lists: Vec<ListController> = entities::LIST_ENTITIES
            .iter()
            .map(|config| ListController::new(*config))
            .collect();

        let mut app = Self {
            root_input: repo.content_root().display().to_string(),
            repo,
            settings,
            settings_path,
            active: Entity::Info,
            info: InfoEditor::default(),
            marked: vec![BTreeSet::new(); lists.len()],
            lists,
            gallery_selected: None,
            gallery_url_input: String::new(),
            dialog_dir: None,
            status: String::new(),
            last_error: None,
        };
        app.load_all();
        app
    }

    fn resolver(&self) -> AssetResolver {
        AssetResolver::new(self.repo.public_dir())
    }

    fn persist_settings(&mut self) {
        let Some(path) = self.settings_path.as_deref() else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            log::warn!("saving settings: {e:#}");
        }
    }

    fn load_all(&mut self) {
        self.info.load(&self.repo);
        for ctrl in &mut self.lists {
            ctrl.load(&self.repo);
        }
        for marked in &mut self.marked {
            marked.clear();
        }
        self.gallery_selected = None;
        self.status = statics::EN_STATUS_LOADED_ALL.to_string();
        self.last_error = None;
    }

    fn apply_content_root(&mut self, root: String) {
        self.repo.set_content_root(root.trim());
        self.root_input = self.repo.content_root().display().to_string();
        self.settings.content_root = Some(self.root_input.clone());
        self.persist_settings();
        self.load_all();
    }

    fn browse_content_root(&mut self) {
        let mut dlg = rfd::FileDialog::new();
        if self.repo.content_root().is_dir() {
            dlg = dlg.set_directory(self.repo.content_root());
        }
        if let Some(dir) = dlg.pick_folder() {
            self.apply_content_root(dir.display().to_string());
        }
    }

    fn save_entity(&mut self, entity: Entity) -> anyhow::Result<PathBuf> {
        let resolver = self.resolver();
        if entity.is_singleton() {
            return self
                .info
                .save(&self.repo, &resolver)
                .with_context(|| format!("{} {}", statics::EN_ERR_SAVE, entity.name()));
        }
        let ctrl = self
            .lists
            .iter_mut()
            .find(|c| c.config().entity == entity)
            .with_context(|| format!("no editor for {}", entity.name()))?;
        ctrl.save(&self.repo)
            .with_context(|| format!("{} {}", statics::EN_ERR_SAVE, entity.name()))
    }

    fn save_current(&mut self) {
        match self.save_entity(self.active) {
            Ok(path) => {
                self.status = format!("{} {}", statics::EN_STATUS_SAVED, path.display());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(format!("{e:#}")),
        }
    }

    fn save_all(&mut self) {
        let results: Vec<_> = Entity::ALL
            .into_iter()
            .map(|entity| self.save_entity(entity))
            .collect();
        let (saved, first_error) = summarize_save_all(results);
        self.status = format!("{} ({saved}/{})", statics::EN_STATUS_SAVED_ALL, Entity::ALL.len());
        self.last_error = first_error;
    }

    fn file_dialog(&self, filter: &str, extensions: &[&str]) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new().add_filter(filter, extensions);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn pick_image(&mut self, filter: &str, extensions: &[&str]) -> Option<String> {
        let path = self.file_dialog(filter, extensions).pick_file()?;
        self.dialog_dir = path.parent().map(PathBuf::from);
        Some(path.display().to_string())
    }

    fn pick_images(&mut self) -> Vec<String> {
        let paths = self
            .file_dialog(statics::EN_FILTER_IMAGES, statics::IMAGE_EXTENSIONS)
            .pick_files()
            .unwrap_or_default();
        if let Some(dir) = paths.first().and_then(|p| p.parent()) {
            self.dialog_dir = Some(dir.to_path_buf());
        }
        paths.iter().map(|p| p.display().to_string()).collect()
    }

    fn apply_list_op(&mut self, idx: usize, op: ListOp) {
        let resolver = self.resolver();
        let Some(ctrl) = self.lists.get_mut(idx) else {
            return;
        };
        let name = ctrl.config().entity.name();
        let result = match op {
            ListOp::New => {
                ctrl.reset_form();
                Ok(())
            }
            ListOp::Select(row) => {
                ctrl.select(row);
                Ok(())
            }
            ListOp::Upsert => ctrl
                .upsert(&self.repo, &resolver)
                .map(|row| self.status = format!("{name}: {} {row}", statics::EN_STATUS_SAVED))
                .with_context(|| format!("{} ({name})", statics::EN_ERR_UPDATE)),
            ListOp::Delete => {
                let mut rows: Vec<usize> = self.marked[idx].iter().copied().collect();
                if rows.is_empty() {
                    rows.extend(ctrl.selected());
                }
                let deleted = ctrl
                    .delete(&self.repo, &rows)
                    .with_context(|| format!("{} ({name})", statics::EN_ERR_DELETE));
                if matches!(deleted, Ok(true)) {
                    self.marked[idx].clear();
                }
                deleted.map(|_| ())
            }
            ListOp::Move(direction) => ctrl
                .move_selected(&self.repo, direction)
                .map(|_| ())
                .with_context(|| format!("{} ({name})", statics::EN_ERR_MOVE)),
        };
        self.gallery_selected = None;
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => self.last_error = Some(format!("{e:#}")),
        }
    }

    fn render_list_tab(&mut self, ui: &mut egui::Ui, idx: usize) {
        let Some(ctrl) = self.lists.get(idx) else {
            return;
        };
        let config = ctrl.config();
        let rows = ctrl.rows();
        let selected = ctrl.selected();
        let mut op: Option<ListOp> = None;

        ui.horizontal(|ui| {
            for (label, action) in [
                (statics::EN_BTN_NEW, ListOp::New),
                (statics::EN_BTN_ADD_UPDATE, ListOp::Upsert),
                (statics::EN_BTN_DELETE, ListOp::Delete),
                (statics::EN_BTN_UP, ListOp::Move(-1)),
                (statics::EN_BTN_DOWN, ListOp::Move(1)),
            ] {
                if ui.button(label).clicked() {
                    op = Some(action);
                }
            }
        });
        ui.separator();

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        let marked = &mut self.marked[idx];
        ui.push_id(("records_table", idx), |ui| {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .sense(egui::Sense::click())
                .max_scroll_height(260.0)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(28.0).resizable(false))
                .column(Column::initial(40.0).resizable(false));
            for _ in config.headers {
                table = table.column(Column::remainder().resizable(true).clip(true));
            }
            table
                .header(row_h, |mut header| {
                    header.col(|_| {});
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for title in config.headers {
                        header.col(|ui| {
                            ui.strong(*title);
                        });
                    }
                })
                .body(|mut body| {
                    for (row_idx, cells) in rows.iter().enumerate() {
                        body.row(row_h, |mut row| {
                            row.set_selected(selected == Some(row_idx));
                            row.col(|ui| {
                                let mut ticked = marked.contains(&row_idx);
                                if ui.checkbox(&mut ticked, "").changed() {
                                    if ticked {
                                        marked.insert(row_idx);
                                    } else {
                                        marked.remove(&row_idx);
                                    }
                                }
                            });
                            row.col(|ui| {
                                ui.monospace(row_idx.to_string());
                            });
                            for cell in cells {
                                row.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                            if row.response().clicked() {
                                op = Some(ListOp::Select(row_idx));
                            }
                        });
                    }
                });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt(("form_scroll", idx))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.render_form(ui, idx);
            });

        if let Some(op) = op {
            self.apply_list_op(idx, op);
        }
    }

    fn render_form(&mut self, ui: &mut egui::Ui, idx: usize) {
        let config: &'static EntityConfig = self.lists[idx].config();
        let visible: Vec<bool> = config
            .fields
            .iter()
            .map(|f| match f.visible_when {
                Some((key, value)) => config.text_of(&self.lists[idx].form, key) == value,
                None => true,
            })
            .collect();

        for (field_idx, field) in config.fields.iter().enumerate() {
            if !visible[field_idx] {
                continue;
            }
            ui.label(egui::RichText::new(field.label).strong());
            match field.kind {
                FieldKind::Gallery { name_from, fallback } => {
                    let name = config.text_of(&self.lists[idx].form, name_from);
                    let base = if name.is_empty() { fallback } else { name.as_str() };
                    let base = sanitize_stem(base, fallback);
                    self.render_gallery(ui, idx, field_idx, &base);
                }
                FieldKind::Image { copy, allow_url, .. } => {
                    self.render_image_field(ui, idx, field_idx, copy, allow_url);
                }
                _ => {
                    if let Some(value) = self.lists[idx].form.values.get_mut(field_idx) {
                        render_simple_field(ui, field, value);
                    }
                }
            }
            ui.add_space(6.0);
        }
    }

    fn render_image_field(
        &mut self,
        ui: &mut egui::Ui,
        idx: usize,
        field_idx: usize,
        copy: CopyPolicy,
        allow_url: bool,
    ) {
        let mut browse = false;
        if let Some(FieldValue::Image(slot)) = self.lists[idx].form.values.get_mut(field_idx) {
            ui.horizontal(|ui| {
                ui.label(statics::EN_LABEL_SAVED_VALUE);
                ui.monospace(image_slot_label(slot));
            });
            ui.horizontal(|ui| {
                if ui.button(statics::EN_BTN_BROWSE).clicked() {
                    browse = true;
                }
                if ui.button(statics::EN_BTN_CLEAR).clicked() {
                    slot.clear();
                }
                if allow_url {
                    ui.checkbox(&mut slot.use_url, statics::EN_LABEL_URL);
                    ui.add_enabled(
                        slot.use_url,
                        egui::TextEdit::singleline(&mut slot.url).hint_text(statics::EN_HINT_URL),
                    );
                }
            });
        }

        if browse {
            let (filter, extensions) = match copy {
                CopyPolicy::ConvertPng => (statics::EN_FILTER_IMAGES, statics::IMAGE_EXTENSIONS),
                CopyPolicy::KeepExtension => (statics::EN_FILTER_LOGOS, statics::LOGO_EXTENSIONS),
            };
            if let Some(path) = self.pick_image(filter, extensions)
                && let Some(FieldValue::Image(slot)) =
                    self.lists[idx].form.values.get_mut(field_idx)
            {
                slot.pick(path);
            }
        }
    }

    fn render_gallery(&mut self, ui: &mut egui::Ui, idx: usize, field_idx: usize, base: &str) {
        enum GalleryOp {
            AddFiles,
            AddUrl,
            Fetch,
            Cover,
            Remove,
            Move(isize),
            ClearCover,
        }
        let mut op: Option<GalleryOp> = None;
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;

        let Some(FieldValue::Gallery(gallery)) = self.lists[idx].form.values.get(field_idx) else {
            return;
        };
        let cover_label = match gallery.cover_value() {
            Some(cover) => format!("{} {cover}", statics::EN_LABEL_COVER),
            None => statics::EN_LABEL_NO_COVER.to_string(),
        };
        ui.label(cover_label);

        egui::ScrollArea::vertical()
            .id_salt(("gallery", idx))
            .max_height(140.0)
            .show(ui, |ui| {
                for (item_idx, item) in gallery.items().iter().enumerate() {
                    let star = if gallery.cover_index() == Some(item_idx) { "*" } else { " " };
                    let text = format!("{star} {} {}", item.tag(), item.label());
                    let selected = self.gallery_selected == Some(item_idx);
                    if selectable_row_left(ui, selected, &text, row_h).clicked() {
                        self.gallery_selected = Some(item_idx);
                    }
                }
            });

        ui.horizontal(|ui| {
            if ui.button(statics::EN_BTN_ADD_FILES).clicked() {
                op = Some(GalleryOp::AddFiles);
            }
            ui.add(
                egui::TextEdit::singleline(&mut self.gallery_url_input)
                    .hint_text(statics::EN_HINT_URL)
                    .desired_width(260.0),
            );
            if ui.button(statics::EN_BTN_ADD_URL).clicked() {
                op = Some(GalleryOp::AddUrl);
            }
            if ui.button(statics::EN_BTN_FETCH).clicked() {
                op = Some(GalleryOp::Fetch);
            }
        });
        ui.horizontal(|ui| {
            let has_sel = self.gallery_selected.is_some();
            for (label, action) in [
                (statics::EN_BTN_SET_COVER, GalleryOp::Cover),
                (statics::EN_BTN_REMOVE, GalleryOp::Remove),
                (statics::EN_BTN_UP, GalleryOp::Move(-1)),
                (statics::EN_BTN_DOWN, GalleryOp::Move(1)),
            ] {
                if ui.add_enabled(has_sel, egui::Button::new(label)).clicked() {
                    op = Some(action);
                }
            }
            if ui.button(statics::EN_BTN_CLEAR).clicked() {
                op = Some(GalleryOp::ClearCover);
            }
        });

        let Some(op) = op else {
            return;
        };
        let picked = match op {
            GalleryOp::AddFiles => self.pick_images(),
            _ => Vec::new(),
        };
        let fetched = match op {
            GalleryOp::Fetch => Some(self.fetch_gallery_url(idx, field_idx, base)),
            _ => None,
        };
        let Some(FieldValue::Gallery(gallery)) = self.lists[idx].form.values.get_mut(field_idx)
        else {
            return;
        };
        let sel = self.gallery_selected;
        match op {
            GalleryOp::AddFiles => picked.into_iter().for_each(|p| gallery.add_local(p)),
            GalleryOp::AddUrl => {
                if gallery.add_url(&self.gallery_url_input) {
                    self.gallery_url_input.clear();
                } else {
                    self.last_error =
                        Some(format!("{}: {}", statics::EN_ERR_IMAGE, statics::EN_HINT_URL));
                }
            }
            GalleryOp::Fetch => match fetched {
                Some(Ok(stored)) => {
                    gallery.push(GalleryItem::Existing(stored));
                    self.gallery_url_input.clear();
                }
                Some(Err(e)) => self.last_error = Some(format!("{}: {e:#}", statics::EN_ERR_IMAGE)),
                None => {}
            },
            GalleryOp::Cover => {
                if let Some(i) = sel {
                    gallery.set_cover(i);
                }
            }
            GalleryOp::Remove => {
                if let Some(i) = sel {
                    gallery.remove(i);
                    self.gallery_selected = None;
                }
            }
            GalleryOp::Move(delta) => {
                if let Some(i) = sel {
                    self.gallery_selected = gallery.move_by(i, delta).or(sel);
                }
            }
            GalleryOp::ClearCover => gallery.clear_cover(),
        }
    }

    /// Download the URL input now and keep the local PNG copy.
    fn fetch_gallery_url(
        &self,
        idx: usize,
        field_idx: usize,
        base: &str,
    ) -> anyhow::Result<String> {
        let entity = self.lists[idx].config().entity;
        let count = match self.lists[idx].form.values.get(field_idx) {
            Some(FieldValue::Gallery(g)) => g.len(),
            _ => 0,
        };
        let stem = format!("{base}_web_{}", count + 1);
        self.resolver()
            .resolve(
                &self.gallery_url_input,
                &entity.tab_key(),
                &stem,
                CopyPolicy::ConvertPng,
                UrlPolicy::Download,
            )
            .with_context(|| format!("fetching {}", self.gallery_url_input.trim()))
    }

    fn render_info_tab(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("info_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let mut pick: Option<usize> = None;
                for (slot_idx, slot) in self.info.slots_mut().into_iter().enumerate() {
                    let title = match slot_idx {
                        0 => statics::EN_LABEL_PROFILE_PHOTO,
                        _ => statics::EN_LABEL_UNIVERSITY_LOGO,
                    };
                    ui.group(|ui| {
                        ui.strong(title);
                        if render_info_slot(ui, slot) {
                            pick = Some(slot_idx);
                        }
                    });
                }
                if let Some(slot_idx) = pick
                    && let Some(path) =
                        self.pick_image(statics::EN_FILTER_IMAGES, statics::IMAGE_EXTENSIONS)
                    && let Some(slot) = self.info.slots_mut().into_iter().nth(slot_idx)
                {
                    slot.pick(path);
                }

                ui.add_space(8.0);
                egui::CollapsingHeader::new(statics::EN_LABEL_GENERAL)
                    .default_open(true)
                    .show(ui, |ui| {
                        egui::Grid::new("info_general")
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                for field in &mut self.info.section.fields {
                                    render_dynamic_field(ui, field);
                                    ui.end_row();
                                }
                            });
                    });

                for group in &mut self.info.section.groups {
                    egui::CollapsingHeader::new(group.label.clone())
                        .default_open(true)
                        .show(ui, |ui| {
                            egui::Grid::new(("info_group", group.key.clone()))
                                .num_columns(2)
                                .striped(true)
                                .show(ui, |ui| {
                                    for field in &mut group.fields {
                                        render_dynamic_field(ui, field);
                                        ui.end_row();
                                    }
                                });
                        });
                }
            });
    }
}

/// Saved-entity count and the first error, for Save All.
fn summarize_save_all(results: Vec<anyhow::Result<PathBuf>>) -> (usize, Option<String>) {
    let mut saved = 0;
    let mut first_error = None;
    for result in results {
        match result {
            Ok(_) => saved += 1,
            Err(e) => {
                log::error!("{e:#}");
                first_error.get_or_insert_with(|| format!("{e:#}"));
            }
        }
    }
    (saved, first_error)
}

fn image_slot_label(slot: &ImageSlot) -> String {
    match (&slot.picked, slot.use_url) {
        (_, true) => slot.url.clone(),
        (Some(picked), false) => format!("[+] {picked}"),
        (None, false) if slot.saved.is_empty() => "-".to_string(),
        (None, false) => slot.saved.clone(),
    }
}

/// Returns true when the user asked to browse for a file.
fn render_info_slot(ui: &mut egui::Ui, slot: &mut InfoSlot) -> bool {
    let mut browse = false;
    ui.horizontal(|ui| {
        ui.label(statics::EN_LABEL_SAVED_VALUE);
        ui.monospace(slot.source().unwrap_or("-"));
    });
    ui.horizontal(|ui| {
        if ui.button(statics::EN_BTN_BROWSE).clicked() {
            browse = true;
        }
        ui.add(
            egui::TextEdit::singleline(&mut slot.url_input)
                .hint_text(statics::EN_HINT_URL)
                .desired_width(320.0),
        );
        if ui.button(statics::EN_BTN_APPLY_ROOT).clicked() {
            slot.apply_url();
        }
        if ui.button(statics::EN_BTN_CLEAR).clicked() {
            slot.clear();
        }
    });
    browse
}

fn render_bilingual(ui: &mut egui::Ui, value: &mut crate::bilingual::Bilingual, multiline: bool) {
    let edit = |ui: &mut egui::Ui, text: &mut String| {
        if multiline {
            ui.add(egui::TextEdit::multiline(text).desired_rows(4).desired_width(f32::INFINITY))
        } else {
            ui.add(egui::TextEdit::singleline(text).desired_width(f32::INFINITY))
        }
    };
    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.label(statics::EN_LANG_EN);
            edit(ui, &mut value.en);
        });
        ui.horizontal(|ui| {
            ui.label(statics::EN_LANG_TR);
            edit(ui, value.tr_mut());
        });
    });
}

fn render_simple_field(ui: &mut egui::Ui, field: &FieldSpec, value: &mut FieldValue) {
    match (field.kind, value) {
        (FieldKind::Text, FieldValue::Text(s)) => {
            ui.add(egui::TextEdit::singleline(s).desired_width(f32::INFINITY));
        }
        (FieldKind::MultilineText, FieldValue::Text(s)) => {
            ui.add(egui::TextEdit::multiline(s).desired_width(f32::INFINITY));
        }
        (FieldKind::CommaList { .. }, FieldValue::Text(s)) => {
            ui.add(
                egui::TextEdit::singleline(s)
                    .hint_text(statics::EN_HINT_COMMA_LIST)
                    .desired_width(f32::INFINITY),
            );
        }
        (FieldKind::Date { .. }, FieldValue::Text(s)) => {
            ui.add(egui::TextEdit::singleline(s).hint_text(statics::EN_HINT_DATE));
        }
        (FieldKind::Bilingual, FieldValue::Bilingual { value, .. }) => {
            render_bilingual(ui, value, false);
        }
        (FieldKind::BilingualText, FieldValue::Bilingual { value, .. }) => {
            render_bilingual(ui, value, true);
        }
        (FieldKind::BilingualList, FieldValue::BilingualList { en, tr }) => {
            ui.horizontal(|ui| {
                for (lang, text) in [(statics::EN_LANG_EN, en), (statics::EN_LANG_TR, tr)] {
                    ui.vertical(|ui| {
                        ui.label(lang);
                        ui.add(
                            egui::TextEdit::multiline(text)
                                .hint_text(statics::EN_HINT_ONE_PER_LINE)
                                .desired_rows(4),
                        );
                    });
                }
            });
        }
        (FieldKind::DateRange { .. }, FieldValue::DateRange(range)) => {
            ui.horizontal(|ui| {
                ui.label(statics::EN_LABEL_START);
                ui.add(
                    egui::TextEdit::singleline(&mut range.start).hint_text(statics::EN_HINT_DATE),
                );
                ui.label(statics::EN_LABEL_END);
                ui.add_enabled(
                    !range.present,
                    egui::TextEdit::singleline(&mut range.end).hint_text(statics::EN_HINT_DATE),
                );
                ui.checkbox(&mut range.present, statics::EN_LABEL_PRESENT);
            });
        }
        (FieldKind::Choice { options }, FieldValue::Choice(current)) => {
            let selected_text = options
                .iter()
                .find(|(v, _)| *v == current.as_str())
                .map(|(_, label)| *label)
                .unwrap_or(current.as_str())
                .to_string();
            egui::ComboBox::from_id_salt(field.key)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (v, label) in options.iter() {
                        ui.selectable_value(current, v.to_string(), *label);
                    }
                });
        }
        _ => {
            ui.weak(statics::EN_UNKNOWN_PATH);
        }
    }
}

fn render_dynamic_field(ui: &mut egui::Ui, field: &mut FormField) {
    ui.label(format!("{}:", field.label));
    match &mut field.widget {
        Widget::Text { value, multiline } => {
            if *multiline {
                ui.add(egui::TextEdit::multiline(value).desired_rows(5).desired_width(480.0));
            } else {
                ui.add(egui::TextEdit::singleline(value).desired_width(480.0));
            }
        }
        Widget::Number(raw) => {
            ui.add(egui::TextEdit::singleline(raw).desired_width(160.0));
        }
        Widget::Checkbox(b) => {
            ui.checkbox(b, "");
        }
        Widget::Bilingual {
            value, multiline, ..
        } => {
            render_bilingual(ui, value, *multiline);
        }
    }
}

fn selectable_row_left(
    ui: &mut egui::Ui,
    selected: bool,
    text: &str,
    row_h: f32,
) -> egui::Response {
    let w = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(egui::vec2(w, row_h), egui::Sense::click());
    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

    let visuals = ui.style().interact_selectable(&response, selected);
    if ui.is_rect_visible(rect) {
        ui.painter()
            .rect_filled(rect, visuals.corner_radius, visuals.bg_fill);
        let font_id = egui::TextStyle::Button.resolve(ui.style());
        ui.painter().text(
            rect.left_center() + egui::vec2(6.0, 0.0),
            egui::Align2::LEFT_CENTER,
            text,
            font_id,
            visuals.text_color(),
        );
    }
    response
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(statics::EN_LABEL_CONTENT_ROOT);
                let resp = ui.add(
                    egui::TextEdit::singleline(&mut self.root_input).desired_width(420.0),
                );
                let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button(statics::EN_BTN_APPLY_ROOT).clicked() || enter {
                    self.apply_content_root(self.root_input.clone());
                }
                if ui.button(statics::EN_BTN_BROWSE).clicked() {
                    self.browse_content_root();
                }
            });
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_LOAD_ALL).clicked() {
                    self.load_all();
                }
                if ui.button(statics::EN_BTN_SAVE_CURRENT).clicked() {
                    self.save_current();
                }
                if ui.button(statics::EN_BTN_SAVE_ALL).clicked() {
                    self.save_all();
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.settings.dark_theme = !self.settings.dark_theme;
                    if self.settings.dark_theme {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                    self.persist_settings();
                }
                if ui.checkbox(&mut self.settings.backups, ".bak").changed() {
                    self.repo.set_backups(self.settings.backups);
                    self.persist_settings();
                }
            });
        });

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.separator();
                let target = self
                    .repo
                    .path_for_name(self.active.name())
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| statics::EN_UNKNOWN_PATH.to_string());
                ui.label(format!("{} {target}", statics::EN_LABEL_TARGET));
                if let Some(ctrl) = self.lists.iter().find(|c| c.config().entity == self.active) {
                    ui.separator();
                    ui.label(format!("{} {}", statics::EN_LABEL_RECORDS, ctrl.records().len()));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for entity in Entity::ALL {
                    if ui
                        .selectable_label(self.active == entity, entity.title())
                        .clicked()
                        && self.active != entity
                    {
                        self.active = entity;
                        self.gallery_selected = None;
                        self.gallery_url_input.clear();
                    }
                }
            });
            ui.separator();

            if self.active.is_singleton() {
                self.render_info_tab(ui);
            } else if let Some(idx) = self
                .lists
                .iter()
                .position(|c| c.config().entity == self.active)
            {
                self.render_list_tab(ui, idx);
            }
        });
    }
}
