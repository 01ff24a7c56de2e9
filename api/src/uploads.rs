use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
pub const GALLERY_LIMIT: usize = 12;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("filename pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file extension is not allowed: '{0}'")]
    UnsupportedExtension(String),
    #[error("upload I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// True when `filename` ends in one of [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduce a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators and whitespace become `_`, everything outside
/// `[A-Za-z0-9_.-]` is dropped, and leading dots/underscores are removed so
/// the result can never be hidden or escape the upload directory.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = UNSAFE_CHARS.replace_all(&flattened, "");
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Flat directory of uploaded images.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Save `bytes` as `YYYYmmdd_HHMMSS_<name>` and return the stored name.
    ///
    /// The timestamp is prefixed before sanitising, so a name made only of
    /// non-ASCII letters still keeps its extension ("фото.png" is stored as
    /// `20260223_090507_.png`).
    pub async fn store(
        &self,
        original_name: &str,
        bytes: &[u8],
        now: NaiveDateTime,
    ) -> Result<String, UploadError> {
        if !allowed_file(original_name) {
            let ext = original_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default();
            return Err(UploadError::UnsupportedExtension(ext));
        }
        let stored_name = secure_filename(&format!(
            "{}_{original_name}",
            now.format("%Y%m%d_%H%M%S")
        ));
        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&stored_name), bytes).await?;
        tracing::info!(file = %stored_name, size = bytes.len(), "upload stored");
        Ok(stored_name)
    }

    /// Up to `limit` stored names, newest first. A missing directory is empty.
    pub async fn recent(&self, limit: usize) -> Result<Vec<String>, UploadError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort_unstable_by(|a, b| b.cmp(a));
        names.truncate(limit);
        Ok(names)
    }
}
