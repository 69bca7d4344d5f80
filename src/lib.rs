//! Core library for the portfolio content editor.
//! Loads, edits and atomically saves the JSON content files behind a portfolio site:
//! one singleton `info` record and seven record lists, plus their image assets.

pub mod assets;
pub mod bilingual;
pub mod controller;
pub mod dates;
pub mod dynamic_form;
pub mod entities;
pub mod gallery;
mod gui;
pub mod info;
pub mod repository;
pub mod settings;
pub mod statics;
pub mod store;
pub mod value;

pub use gui::run_gui;
pub use repository::{Entity, EntityStore, Repository};
pub use value::{ContentMap, ContentValue};
