// src/assets/mod.rs
//! Binary assets: fetching bytes behind redirects, and storing them under a
//! content-derived name so identical content is written once.

mod fetcher;
mod store;

pub use fetcher::{follow_redirects, Fetcher, Hop, HttpFetcher};
pub use store::{asset_file_name, AssetStore, Materialized};
