//! Writing scraped dorks to the dorks directory

use super::categories::category_file_name;
use super::fetch::GhdbDatabase;
use crate::error::GhdbError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Flat dork list file name
pub const ALL_DORKS_TXT: &str = "all_google_dorks.txt";
/// Raw listing dump file name
pub const ALL_DORKS_JSON: &str = "all_google_dorks.json";

/// Which files to write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Raw GHDB records as JSON
    pub json: bool,
    /// Every dork, one per line
    pub text: bool,
    /// One `.dorks` file per category
    pub categories: bool,
}

impl GhdbDatabase {
    /// Write the selected files into `dir`, creating it if needed.
    ///
    /// Returns the paths written.
    pub fn save(&self, dir: &Path, options: SaveOptions) -> Result<Vec<PathBuf>, GhdbError> {
        std::fs::create_dir_all(dir).map_err(|source| GhdbError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();

        if options.categories {
            for (id, category) in &self.category_dict {
                info!(
                    "Category {} ('{}') has {} dorks",
                    id,
                    category.category_name,
                    category.dorks.len()
                );
                let path = dir.join(category_file_name(&category.category_name));
                info!(
                    "Writing dork category '{}' to file: {}",
                    category.category_name,
                    path.display()
                );
                write_lines(&path, &category.dorks)?;
                written.push(path);
            }
        }

        if options.json {
            let path = dir.join(ALL_DORKS_JSON);
            info!("Writing all dorks to JSON file: {}", path.display());
            let body = serde_json::to_vec(&self.records).map_err(|e| GhdbError::Write {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
            write_file(&path, &body)?;
            written.push(path);
        }

        if options.text {
            let path = dir.join(ALL_DORKS_TXT);
            info!("Writing all dorks to txt file: {}", path.display());
            write_lines(&path, &self.extracted_dorks)?;
            written.push(path);
        }

        Ok(written)
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<(), GhdbError> {
    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    write_file(path, body.as_bytes())
}

fn write_file(path: &Path, body: &[u8]) -> Result<(), GhdbError> {
    std::fs::write(path, body).map_err(|source| GhdbError::Write {
        path: path.to_path_buf(),
        source,
    })
}
