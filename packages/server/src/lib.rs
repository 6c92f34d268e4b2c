//! # Server side of the portfolio site
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`settings`] | `SiteSettings` from defaults, `site.toml` and the environment |
//! | [`auth`] | Session Gate endpoints and the Route Guard middleware |
//! | [`db`] | Lazy Postgres pool and migrations |
//! | [`repo`] | `ContentRepo`, the Postgres Content Store |
//! | [`realtime`] | `LISTEN/NOTIFY` relay and the SSE change feed |
//! | [`images`] | Image Ingestion and filesystem object storage |
//! | [`error`] | `AuthError` and `IngestError` |
//!
//! Server functions reach the shared services through [`content_repo`] and
//! [`image_ingestor`], both initialised on first use.

pub mod auth;
pub mod db;
pub mod error;
pub mod images;
pub mod realtime;
pub mod repo;
pub mod settings;

pub use error::{AuthError, IngestError};
pub use images::{FsObjectStorage, ImageIngestor, ObjectStorage};
pub use realtime::ChangeHub;
pub use repo::ContentRepo;
pub use settings::{settings, SiteSettings};

use store::SyncError;
use tokio::sync::OnceCell;

static REPO: OnceCell<ContentRepo> = OnceCell::const_new();
static INGESTOR: OnceCell<ImageIngestor<FsObjectStorage>> = OnceCell::const_new();

pub async fn content_repo() -> Result<&'static ContentRepo, SyncError> {
    REPO.get_or_try_init(|| async {
        let pool = db::get_pool().await.map_err(|err| {
            tracing::error!(error = %err, "database unavailable");
            SyncError::StoreRead("database connection".to_string())
        })?;
        Ok(ContentRepo::new(pool.clone()))
    })
    .await
}

pub async fn image_ingestor() -> Result<&'static ImageIngestor<FsObjectStorage>, IngestError> {
    INGESTOR
        .get_or_try_init(|| async {
            let settings = settings()
                .await
                .map_err(|err| IngestError::Upload(err.to_string()))?;
            Ok(ImageIngestor::new(FsObjectStorage::new(
                &settings.storage.root,
                &settings.storage.url,
            )))
        })
        .await
}
