// src/output/mod.rs
//! Output handling: the filesystem capability and the pure path rules that
//! decide where each page and asset lands.

mod paths;
mod writer;

pub use paths::{document_path, page_dir_name, relativize};
pub use writer::{LocalStore, Store};
