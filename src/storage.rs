use crate::models::{NewPageView, PageViewData, PageViewRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{fs, sync::Mutex};
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode page views: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write page views: {0}")]
    Io(#[from] std::io::Error),
    #[error("page view file {path} is unreadable, refusing to overwrite it: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("page view store unavailable: {0}")]
    Unavailable(String),
}

/// The `page_views` table. Append and read only; other writers may be
/// appending at the same time.
#[async_trait]
pub trait PageViewStore: Send + Sync {
    async fn insert(&self, view: NewPageView) -> Result<PageViewRecord, StoreError>;

    /// Every record, newest first.
    async fn list_recent(&self) -> Result<Vec<PageViewRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Page views kept in a JSON file, rewritten on every insert.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<PageViewData>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let data = load_data(&path).await?;
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }
}

#[async_trait]
impl PageViewStore for JsonFileStore {
    async fn insert(&self, view: NewPageView) -> Result<PageViewRecord, StoreError> {
        let record = PageViewRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            path: view.path,
            country: view.country,
            browser: Some(view.browser),
            os: Some(view.os),
        };

        let mut data = self.data.lock().await;
        data.views.push(record.clone());
        if let Err(err) = persist_data(&self.path, &data).await {
            data.views.pop();
            return Err(err);
        }
        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<PageViewRecord>, StoreError> {
        let data = self.data.lock().await;
        let mut views = data.views.clone();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let data = self.data.lock().await;
        Ok(data.views.len() as u64)
    }
}

/// A missing file is an empty store. A file that exists but cannot be read
/// or parsed is an error: every insert rewrites the whole file, so starting
/// empty would discard the records already in it.
pub async fn load_data(path: &Path) -> Result<PageViewData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
            error!(path = %path.display(), "failed to parse page view file: {source}");
            StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PageViewData::default()),
        Err(err) => {
            error!(path = %path.display(), "failed to read page view file: {err}");
            Err(err.into())
        }
    }
}

pub async fn persist_data(path: &Path, data: &PageViewData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
