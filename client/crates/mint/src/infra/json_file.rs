//! JSON file solution log
//!
//! Appends are read-modify-write under an exclusive `<path>.lock` file and
//! committed with temp file + rename, so readers never see a torn file.

use crate::domain::entities::Solution;
use crate::domain::repository::SolutionRepository;
use crate::error::{MintError, MintResult};
use crate::presentation::dto::{SolutionLogDto, StoredSolutionDto};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

const LOCK_POLL: Duration = Duration::from_millis(20);

/// Solution log backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonSolutionStore {
    path: PathBuf,
    lock_timeout: Duration,
}

/// Removes the lock file when dropped, including on error paths
struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
        }
    }
}

impl JsonSolutionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    async fn lock(&self) -> MintResult<LockGuard> {
        let path = self.lock_path();
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(_) => return Ok(LockGuard { path }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(MintError::Storage(format!(
                            "timed out waiting for {}; remove it if no other process is running",
                            path.display()
                        )));
                    }
                    tokio::time::sleep(LOCK_POLL).await;
                }
                Err(e) => {
                    return Err(MintError::Storage(format!(
                        "failed to create lock file {}: {e}",
                        path.display()
                    )));
                }
            }
        }
    }

    async fn read_log(&self) -> MintResult<SolutionLogDto> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                MintError::Storage(format!("corrupt solution log {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SolutionLogDto::default()),
            Err(e) => Err(MintError::Storage(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write_log(&self, log: &SolutionLogDto) -> MintResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(log)
            .map_err(|e| MintError::Storage(format!("failed to encode solution log: {e}")))?;

        let temp_path = self.sibling(".tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| MintError::Storage(format!("failed to create temp file: {e}")))?;
        file.write_all(&json)
            .await
            .map_err(|e| MintError::Storage(format!("failed to write temp file: {e}")))?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| MintError::Storage(format!("failed to rename temp file: {e}")))
    }
}

impl SolutionRepository for JsonSolutionStore {
    async fn append(&self, solution: &Solution) -> MintResult<()> {
        let _guard = self.lock().await?;
        let mut log = self.read_log().await?;
        log.solutions.push(StoredSolutionDto::from(solution));
        self.write_log(&log).await?;

        tracing::info!(
            label = %solution.label,
            total = log.solutions.len(),
            path = %self.path.display(),
            "Solution appended"
        );
        Ok(())
    }

    async fn load_all(&self) -> MintResult<Vec<Solution>> {
        let log = self.read_log().await?;
        log.solutions
            .into_iter()
            .map(StoredSolutionDto::into_domain)
            .collect()
    }
}
