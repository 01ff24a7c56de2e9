use std::path::{Path, PathBuf};

use perra_core::stats::{CounterField, Counters};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("counter file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("counter file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON-file backed counters.
///
/// Every increment is a read-modify-write of the whole file, serialised by
/// an async mutex and committed with write-to-temp + rename so a crash never
/// leaves a half-written file.
#[derive(Debug)]
pub struct CounterStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Create the file with zeroed counters if it does not exist yet.
    pub async fn ensure_initialized(&self) -> Result<(), CounterError> {
        let _guard = self.lock.lock().await;
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        write_atomic(&self.path, &Counters::default()).await
    }

    pub async fn snapshot(&self) -> Result<Counters, CounterError> {
        let _guard = self.lock.lock().await;
        read_counters(&self.path).await
    }

    /// Add one to `field` and return the counters after the update.
    pub async fn increment(&self, field: CounterField) -> Result<Counters, CounterError> {
        let _guard = self.lock.lock().await;
        let mut counters = read_counters(&self.path).await?;
        counters.increment(field);
        write_atomic(&self.path, &counters).await?;
        tracing::debug!(
            counter = field.as_str(),
            value = counters.get(field),
            "counter incremented"
        );
        Ok(counters)
    }
}

async fn read_counters(path: &Path) -> Result<Counters, CounterError> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Counters::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Counters::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic(path: &Path, counters: &Counters) -> Result<(), CounterError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, serde_json::to_vec(counters)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
