//! Google Hacking Database scraper
//!
//! Pulls the dork listing from exploit-db and optionally stores it as dork
//! files the `scan` command can read.

mod categories;
mod fetch;
mod store;

pub use categories::{category_file_name, category_name, to_json as categories_json, CATEGORIES};
pub use fetch::{CategoryDorks, GhdbDatabase, GhdbScraper, GHDB_URL};
pub use store::{SaveOptions, ALL_DORKS_JSON, ALL_DORKS_TXT};
