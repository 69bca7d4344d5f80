// Central place for UI strings, file layout names and content keys.
// Keep these out of gui.rs and the entity tables to reduce duplication.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "Portfolio Content Editor";

pub const EN_LABEL_CONTENT_ROOT: &str = "Content Root:";
pub const EN_BTN_BROWSE: &str = "Browse...";
pub const EN_BTN_APPLY_ROOT: &str = "Apply";
pub const EN_BTN_LOAD_ALL: &str = "Load All";
pub const EN_BTN_SAVE_CURRENT: &str = "Save Current Tab";
pub const EN_BTN_SAVE_ALL: &str = "Save All";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";

pub const EN_BTN_NEW: &str = "New";
pub const EN_BTN_ADD_UPDATE: &str = "Add / Update";
pub const EN_BTN_DELETE: &str = "Delete";
pub const EN_BTN_UP: &str = "Up";
pub const EN_BTN_DOWN: &str = "Down";

pub const EN_BTN_ADD_FILES: &str = "Add Files...";
pub const EN_BTN_ADD_URL: &str = "Add URL";
pub const EN_BTN_SET_COVER: &str = "Set as Cover";
pub const EN_BTN_REMOVE: &str = "Remove";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_FETCH: &str = "Fetch";

pub const EN_LABEL_TARGET: &str = "->";
pub const EN_LABEL_COVER: &str = "Cover:";
pub const EN_LABEL_NO_COVER: &str = "Cover: -";
pub const EN_LABEL_PRESENT: &str = "Present (ongoing)";
pub const EN_LABEL_START: &str = "Start";
pub const EN_LABEL_END: &str = "End";
pub const EN_LABEL_URL: &str = "URL";
pub const EN_LABEL_SAVED_VALUE: &str = "Saved value";
pub const EN_LABEL_PROFILE_PHOTO: &str = "Profile Photo";
pub const EN_LABEL_UNIVERSITY_LOGO: &str = "University Logo";
pub const EN_LABEL_GENERAL: &str = "General";
pub const EN_LABEL_RECORDS: &str = "records:";

pub const EN_HINT_DATE: &str = "YYYY-MM-DD";
pub const EN_HINT_URL: &str = "https://";
pub const EN_HINT_ONE_PER_LINE: &str = "one per line";
pub const EN_HINT_COMMA_LIST: &str = "comma separated";

pub const EN_LANG_EN: &str = "EN";
pub const EN_LANG_TR: &str = "TR";

pub const EN_STATUS_LOADED_ALL: &str = "Loaded all tabs";
pub const EN_STATUS_SAVED: &str = "Saved";
pub const EN_STATUS_SAVED_ALL: &str = "Saved all tabs";

pub const EN_ERR_SAVE: &str = "Failed to save";
pub const EN_ERR_UPDATE: &str = "Failed to add/update record";
pub const EN_ERR_DELETE: &str = "Failed to delete record";
pub const EN_ERR_MOVE: &str = "Failed to move record";
pub const EN_ERR_IMAGE: &str = "Image error";

pub const EN_FILTER_IMAGES: &str = "Images";
pub const EN_FILTER_LOGOS: &str = "Logos";

pub const EN_EMPTY: &str = "";
pub const EN_UNKNOWN_PATH: &str = "(unknown)";

// File layout.
pub const FILE_EXT_JSON: &str = "json";
pub const FILE_EXT_BACKUP: &str = "bak";
pub const DIR_FRONTEND: &str = "frontend";
pub const DIR_PUBLIC: &str = "public";
pub const DIR_CONTENT: &str = "content";
pub const DIR_IMAGES: &str = "images";
pub const MARKER_FILE: &str = "info.json";
pub const SETTINGS_DIR: &str = "portfolio-editor";
pub const SETTINGS_FILE: &str = "settings.json";

pub const ENV_PROJECT_ROOT: &str = "PORTFOLIO_PROJECT_ROOT";
pub const ENV_CONTENT_ROOT: &str = "PORTFOLIO_CONTENT_ROOT";

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "ico"];
pub const LOGO_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "webp", "gif", "bmp", "ico"];

// Content keys shared by several entities.
pub const KEY_ORDER_INDEX: &str = "order_index";
pub const KEY_EN: &str = "en";
pub const KEY_TR: &str = "tr";
pub const KEY_IMAGES: &str = "images";
pub const KEY_ICON: &str = "icon";
pub const KEY_START: &str = "start";
pub const KEY_END: &str = "end";
pub const KEY_PRESENT: &str = "present";
pub const SUFFIX_ISO: &str = "_iso";
pub const SUFFIX_UNIX: &str = "_unix";

// Info image slots.
pub const KEY_PROFILE_PHOTO: &str = "profile_photo";
pub const KEY_UNIVERSITY_LOGO: &str = "university_logo";
pub const KEY_SLOT_PATH: &str = "path";
pub const KEY_SLOT_URL: &str = "url";

// Dynamic form layout hints.
pub const PREFERRED_ORDER: &[&str] = &[
    "full_name",
    "name",
    "title",
    "headline",
    "email",
    "phone",
    "location",
    "university",
    "department",
    "graduation_year",
    "summary",
    "about",
    "bio",
];
pub const MULTILINE_KEYS: &[&str] = &["summary", "about", "bio"];
