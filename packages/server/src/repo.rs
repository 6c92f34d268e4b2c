//! Postgres-backed Content Store.
//!
//! Rows are read through `FromRow` structs with nullable columns, then mapped into the
//! store models so a `NULL` never reaches a view as anything but an empty string.

use sqlx::PgPool;
use store::{Content, ContentRemote, Metadata, Project, ProjectDraft, SyncError, SINGLETON_ID};

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    hero_text: Option<String>,
    intro_text: Option<String>,
    availability_text: Option<String>,
    work_intro: Option<String>,
    email: Option<String>,
}

impl From<ContentRow> for Content {
    fn from(row: ContentRow) -> Self {
        Self {
            hero_text: row.hero_text.unwrap_or_default(),
            intro_text: row.intro_text.unwrap_or_default(),
            availability_text: row.availability_text.unwrap_or_default(),
            work_intro: row.work_intro.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MetadataRow {
    id: i64,
    title: Option<String>,
    description: Option<String>,
    keywords: Option<Vec<String>>,
    author: Option<String>,
    og_image: Option<String>,
    twitter_handle: Option<String>,
}

impl From<MetadataRow> for Metadata {
    fn from(row: MetadataRow) -> Self {
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            keywords: row.keywords.unwrap_or_default(),
            author: row.author.unwrap_or_default(),
            og_image: row.og_image.filter(|url| !url.trim().is_empty()),
            twitter_handle: row.twitter_handle.unwrap_or_default(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    github_url: Option<String>,
    live_url: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            date: row.date.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            github_url: row.github_url.unwrap_or_default(),
            live_url: row.live_url.unwrap_or_default(),
        }
    }
}

fn read_error(table: &str) -> impl FnOnce(sqlx::Error) -> SyncError + '_ {
    move |err| {
        tracing::error!(table, error = %err, "store read failed");
        SyncError::StoreRead(table.to_string())
    }
}

fn write_error(table: &str) -> impl FnOnce(sqlx::Error) -> SyncError + '_ {
    move |err| {
        tracing::error!(table, error = %err, "store write failed");
        SyncError::StoreWrite(table.to_string())
    }
}

/// Fails with `NotFound` when an update touched no row.
fn expect_row(rows_affected: u64, what: impl Into<String>) -> Result<(), SyncError> {
    if rows_affected == 0 {
        Err(SyncError::NotFound(what.into()))
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ContentRepo {
    pool: PgPool,
}

impl ContentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ContentRemote for ContentRepo {
    async fn fetch_content(&self) -> Result<Content, SyncError> {
        let row: Option<ContentRow> = sqlx::query_as(
            "SELECT hero_text, intro_text, availability_text, work_intro, email
             FROM content WHERE id = $1",
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("content"))?;

        row.map(Content::from)
            .ok_or_else(|| SyncError::NotFound("content".to_string()))
    }

    async fn update_content(&self, content: Content) -> Result<(), SyncError> {
        let result = sqlx::query(
            "UPDATE content
             SET hero_text = $1, intro_text = $2, availability_text = $3, work_intro = $4, email = $5
             WHERE id = $6",
        )
        .bind(&content.hero_text)
        .bind(&content.intro_text)
        .bind(&content.availability_text)
        .bind(&content.work_intro)
        .bind(&content.email)
        .bind(SINGLETON_ID)
        .execute(&self.pool)
        .await
        .map_err(write_error("content"))?;

        expect_row(result.rows_affected(), "content")
    }

    async fn fetch_metadata(&self) -> Result<Metadata, SyncError> {
        let row: Option<MetadataRow> = sqlx::query_as(
            "SELECT id, title, description, keywords, author, og_image, twitter_handle
             FROM metadata WHERE id = $1",
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("metadata"))?;

        row.map(Metadata::from)
            .ok_or_else(|| SyncError::NotFound("metadata".to_string()))
    }

    async fn update_metadata(&self, metadata: Metadata) -> Result<(), SyncError> {
        let result = sqlx::query(
            "UPDATE metadata
             SET title = $1, description = $2, keywords = $3, author = $4, og_image = $5, twitter_handle = $6
             WHERE id = $7",
        )
        .bind(&metadata.title)
        .bind(&metadata.description)
        .bind(&metadata.keywords)
        .bind(&metadata.author)
        .bind(metadata.og_image.as_deref().filter(|url| !url.trim().is_empty()))
        .bind(&metadata.twitter_handle)
        .bind(SINGLETON_ID)
        .execute(&self.pool)
        .await
        .map_err(write_error("metadata"))?;

        expect_row(result.rows_affected(), "metadata")
    }

    async fn list_projects(&self) -> Result<Vec<Project>, SyncError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT id, title, date, description, image_url, github_url, live_url
             FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("projects"))?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn fetch_project(&self, id: i64) -> Result<Option<Project>, SyncError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, title, date, description, image_url, github_url, live_url
             FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("projects"))?;

        Ok(row.map(Project::from))
    }

    async fn insert_project(&self, draft: ProjectDraft) -> Result<Project, SyncError> {
        let draft = draft.normalized();
        let row: ProjectRow = sqlx::query_as(
            "INSERT INTO projects (title, date, description, image_url, github_url, live_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, title, date, description, image_url, github_url, live_url",
        )
        .bind(&draft.title)
        .bind(&draft.date)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(&draft.github_url)
        .bind(&draft.live_url)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error("projects"))?;

        Ok(row.into())
    }

    async fn update_project(&self, project: Project) -> Result<(), SyncError> {
        let project = project.normalized();
        let result = sqlx::query(
            "UPDATE projects
             SET title = $1, date = $2, description = $3, image_url = $4, github_url = $5, live_url = $6
             WHERE id = $7",
        )
        .bind(&project.title)
        .bind(&project.date)
        .bind(&project.description)
        .bind(&project.image_url)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(project.id)
        .execute(&self.pool)
        .await
        .map_err(write_error("projects"))?;

        expect_row(result.rows_affected(), format!("project {}", project.id))
    }

    async fn delete_project(&self, id: i64) -> Result<(), SyncError> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(write_error("projects"))?;
        Ok(())
    }
}
