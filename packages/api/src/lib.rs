//! # API crate: fullstack server functions for the portfolio site
//!
//! Every public `async fn` in this file is a Dioxus server function, annotated with
//! `#[get(...)]` or `#[post(...)]` and compiled twice: once with the server logic
//! (behind `#[cfg(feature = "server")]`, backed by the `server` crate) and once as a thin
//! client stub that forwards the call over HTTP.
//!
//! - **Public reads**: `get_content`, `get_metadata`, `list_projects`
//! - **Admin writes** (under `/api/admin`, behind the Route Guard): `save_content`,
//!   `save_metadata`, `create_project`, `save_project`, `delete_project`
//! - **Images** (admin): `resolve_image_url`, `upload_og_image`, `upload_project_image`
//!
//! Login and logout are plain axum endpoints (`POST /api/auth`, `POST /api/auth/logout`)
//! because they set cookies; see `server::auth`.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

pub use store::{Content, Metadata, Project, ProjectDraft};

#[cfg(feature = "server")]
use store::ContentRemote;

/// A file picked in the editor, sent for storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[cfg(feature = "server")]
fn fn_error(err: impl std::fmt::Display) -> ServerFnError {
    ServerFnError::new(err.to_string())
}

/// The landing page copy.
#[cfg(feature = "server")]
#[get("/api/content")]
pub async fn get_content() -> Result<Content, ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.fetch_content().await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/content")]
pub async fn get_content() -> Result<Content, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[get("/api/metadata")]
pub async fn get_metadata() -> Result<Metadata, ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.fetch_metadata().await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/metadata")]
pub async fn get_metadata() -> Result<Metadata, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// All projects, newest first.
#[cfg(feature = "server")]
#[get("/api/projects")]
pub async fn list_projects() -> Result<Vec<Project>, ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.list_projects().await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/projects")]
pub async fn list_projects() -> Result<Vec<Project>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Replace the `content` row.
#[cfg(feature = "server")]
#[post("/api/admin/content")]
pub async fn save_content(content: Content) -> Result<(), ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.update_content(content).await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/content")]
pub async fn save_content(content: Content) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Replace the `metadata` row.
#[cfg(feature = "server")]
#[post("/api/admin/metadata")]
pub async fn save_metadata(metadata: Metadata) -> Result<(), ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.update_metadata(metadata).await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/metadata")]
pub async fn save_metadata(metadata: Metadata) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Insert a project; the store assigns its id.
#[cfg(feature = "server")]
#[post("/api/admin/projects/create")]
pub async fn create_project(draft: ProjectDraft) -> Result<Project, ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.insert_project(draft).await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/projects/create")]
pub async fn create_project(draft: ProjectDraft) -> Result<Project, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/admin/projects/update")]
pub async fn save_project(project: Project) -> Result<(), ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.update_project(project).await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/projects/update")]
pub async fn save_project(project: Project) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/admin/projects/delete")]
pub async fn delete_project(id: i64) -> Result<(), ServerFnError> {
    let repo = server::content_repo().await.map_err(fn_error)?;
    repo.delete_project(id).await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/projects/delete")]
pub async fn delete_project(id: i64) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Check a pasted image link, rewriting share-page links first. Returns the URL to store.
#[cfg(feature = "server")]
#[post("/api/admin/images/resolve")]
pub async fn resolve_image_url(url: String) -> Result<String, ServerFnError> {
    let ingestor = server::image_ingestor().await.map_err(fn_error)?;
    ingestor.resolve_url(&url).await.map_err(fn_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/images/resolve")]
pub async fn resolve_image_url(url: String) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Store a social preview image and return its public URL. Nothing points at it until
/// the SEO form is saved.
#[cfg(feature = "server")]
#[post("/api/admin/images/og")]
pub async fn upload_og_image(file: ImageUpload) -> Result<String, ServerFnError> {
    use store::images::Bucket;

    let ingestor = server::image_ingestor().await.map_err(fn_error)?;
    let url = ingestor
        .upload(Bucket::OgImages, "og", &file.file_name, &file.mime, file.bytes)
        .await
        .map_err(fn_error)?;

    tracing::info!(%url, "og image stored");
    Ok(url)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/images/og")]
pub async fn upload_og_image(file: ImageUpload) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Store an image for project `id` and return its public URL. The project keeps its
/// current image until the editor is saved.
#[cfg(feature = "server")]
#[post("/api/admin/images/project")]
pub async fn upload_project_image(id: i64, file: ImageUpload) -> Result<String, ServerFnError> {
    use store::images::Bucket;

    let ingestor = server::image_ingestor().await.map_err(fn_error)?;
    let url = ingestor
        .upload(
            Bucket::ProjectImages,
            &id.to_string(),
            &file.file_name,
            &file.mime,
            file.bytes,
        )
        .await
        .map_err(fn_error)?;

    tracing::info!(id, %url, "project image stored");
    Ok(url)
}

#[cfg(not(feature = "server"))]
#[post("/api/admin/images/project")]
pub async fn upload_project_image(id: i64, file: ImageUpload) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
