//! [`ContentRemote`] over the fullstack server functions in the `api` crate.

use std::fmt::Display;

use store::{Content, ContentRemote, Metadata, Project, ProjectDraft, SyncError};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ServerFnRemote;

fn read_error<E: Display>(what: &str) -> impl FnOnce(E) -> SyncError + '_ {
    move |err| SyncError::StoreRead(format!("{what}: {err}"))
}

fn write_error<E: Display>(what: &str) -> impl FnOnce(E) -> SyncError + '_ {
    move |err| SyncError::StoreWrite(format!("{what}: {err}"))
}

impl ContentRemote for ServerFnRemote {
    async fn fetch_content(&self) -> Result<Content, SyncError> {
        api::get_content().await.map_err(read_error("content"))
    }

    async fn update_content(&self, content: Content) -> Result<(), SyncError> {
        api::save_content(content)
            .await
            .map_err(write_error("content"))
    }

    async fn fetch_metadata(&self) -> Result<Metadata, SyncError> {
        api::get_metadata().await.map_err(read_error("metadata"))
    }

    async fn update_metadata(&self, metadata: Metadata) -> Result<(), SyncError> {
        api::save_metadata(metadata)
            .await
            .map_err(write_error("metadata"))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, SyncError> {
        api::list_projects().await.map_err(read_error("projects"))
    }

    async fn insert_project(&self, draft: ProjectDraft) -> Result<Project, SyncError> {
        api::create_project(draft)
            .await
            .map_err(write_error("projects"))
    }

    async fn update_project(&self, project: Project) -> Result<(), SyncError> {
        api::save_project(project)
            .await
            .map_err(write_error("projects"))
    }

    async fn delete_project(&self, id: i64) -> Result<(), SyncError> {
        api::delete_project(id)
            .await
            .map_err(write_error("projects"))
    }
}
