//! Output directory handling.
//!
//! Pages are written as `<display number>.jpg` into one directory per run.
//! [`prepare`] makes sure that directory exists before anything is fetched,
//! and asks before writing into one left over from an earlier run.

use crate::error::{Error, Result};
use crate::prompt::PromptProvider;

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A directory ready to receive page files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
    reused: bool,
}

impl OutputDirectory {
    /// Path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory existed before this run.
    pub fn reused(&self) -> bool {
        self.reused
    }

    /// Where the page with one-based `page` number is written.
    pub fn page_path(&self, page: u32) -> PathBuf {
        page_path(&self.path, page)
    }
}

/// `<dir>/<page>.jpg`.
pub fn page_path(dir: &Path, page: u32) -> PathBuf {
    dir.join(format!("{}.jpg", page))
}

/// The directory used when none is given: `./<book id>`.
pub fn default_output_dir(book_id: &str) -> PathBuf {
    Path::new(".").join(book_id)
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Create `path`, or confirm that an existing directory may be reused.
///
/// Declining is an [`Error::UserDeclinedOverwrite`]. Nothing in an existing
/// directory is removed; pages of this run replace same-named files.
pub async fn prepare(path: &Path, prompt: &dyn PromptProvider) -> Result<OutputDirectory> {
    let path = expand_home(path);

    match fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => {
            let question = format!("Output folder {} already exists. Continue?", path.display());
            if !prompt.confirm(&question)? {
                return Err(Error::UserDeclinedOverwrite(path));
            }
            debug!("Reusing output directory {:?}", path);
            Ok(OutputDirectory { path, reused: true })
        }
        Ok(_) => Err(Error::NotADirectory(path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Creating output directory {:?}", path);
            fs::create_dir_all(&path).await?;
            Ok(OutputDirectory {
                path,
                reused: false,
            })
        }
        Err(e) => Err(e.into()),
    }
}
