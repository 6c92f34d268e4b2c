//! Ingress boundary for untyped rows.
//!
//! Rows that arrive as JSON (change notification payloads, or any backend that hands out
//! loosely typed records) are parsed here before they reach typed state. Text columns
//! that are missing or `null` become empty strings; anything of the wrong type is an
//! error rather than being coerced.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::models::{Content, Metadata, Project, SINGLETON_ID};
use crate::realtime::{ChangeEvent, Table};

type Row = Map<String, Value>;

fn as_row(value: &Value) -> Result<&Row, SchemaError> {
    value.as_object().ok_or(SchemaError::NotAnObject)
}

fn text(row: &Row, field: &'static str) -> Result<String, SchemaError> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn id(row: &Row, field: &'static str) -> Result<i64, SchemaError> {
    match row.get(field) {
        None | Some(Value::Null) => Err(SchemaError::MissingField(field)),
        Some(value) => value.as_i64().ok_or(SchemaError::InvalidField {
            field,
            expected: "an integer",
        }),
    }
}

pub fn parse_content(value: &Value) -> Result<Content, SchemaError> {
    let row = as_row(value)?;
    Ok(Content {
        hero_text: text(row, "hero_text")?,
        intro_text: text(row, "intro_text")?,
        availability_text: text(row, "availability_text")?,
        work_intro: text(row, "work_intro")?,
        email: text(row, "email")?,
    })
}

pub fn parse_metadata(value: &Value) -> Result<Metadata, SchemaError> {
    let row = as_row(value)?;

    let keywords = match row.get("keywords") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or(SchemaError::InvalidField {
                    field: "keywords",
                    expected: "an array of strings",
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(SchemaError::InvalidField {
                field: "keywords",
                expected: "an array of strings",
            })
        }
    };

    let og_image = Some(text(row, "og_image")?).filter(|url| !url.trim().is_empty());

    Ok(Metadata {
        id: match row.get("id") {
            None | Some(Value::Null) => SINGLETON_ID,
            Some(_) => id(row, "id")?,
        },
        title: text(row, "title")?,
        description: text(row, "description")?,
        keywords,
        author: text(row, "author")?,
        og_image,
        twitter_handle: text(row, "twitter_handle")?,
    })
}

pub fn parse_project(value: &Value) -> Result<Project, SchemaError> {
    let row = as_row(value)?;
    Ok(Project {
        id: id(row, "id")?,
        title: text(row, "title")?,
        date: text(row, "date")?,
        description: text(row, "description")?,
        image_url: text(row, "image_url")?,
        github_url: text(row, "github_url")?,
        live_url: text(row, "live_url")?,
    })
}

/// Decode one `change` frame of the SSE feed (a JSON [`ChangeEvent`]), passing the row it
/// carries through the same rules as every other untyped row.
pub fn parse_change_frame(data: &str) -> Result<ChangeEvent, SchemaError> {
    let value: Value = serde_json::from_str(data).map_err(|_| SchemaError::NotAnObject)?;
    let frame = as_row(&value)?;
    let kind = match frame.get("kind") {
        None | Some(Value::Null) => return Err(SchemaError::MissingField("kind")),
        Some(Value::String(kind)) => kind.as_str(),
        Some(_) => {
            return Err(SchemaError::InvalidField {
                field: "kind",
                expected: "a string",
            })
        }
    };
    let row = |field: &'static str| frame.get(field).ok_or(SchemaError::MissingField(field));

    match kind {
        "project_inserted" => Ok(ChangeEvent::ProjectInserted {
            project: parse_project(row("project")?)?,
        }),
        "project_updated" => Ok(ChangeEvent::ProjectUpdated {
            project: parse_project(row("project")?)?,
        }),
        "project_deleted" => Ok(ChangeEvent::ProjectDeleted {
            id: id(frame, "id")?,
        }),
        "content_updated" => Ok(ChangeEvent::ContentUpdated {
            content: parse_content(row("content")?)?,
        }),
        "metadata_updated" => Ok(ChangeEvent::MetadataUpdated {
            metadata: parse_metadata(row("metadata")?)?,
        }),
        other => Err(SchemaError::UnknownOperation {
            table: "feed".to_string(),
            op: other.to_string(),
        }),
    }
}

/// A validated notification. It names the changed row; the row itself is read back
/// from the store before anything is published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowChange {
    ContentUpdated,
    MetadataUpdated,
    ProjectInserted(i64),
    ProjectUpdated(i64),
    ProjectDeleted(i64),
}

impl RowChange {
    pub fn table(self) -> Table {
        match self {
            Self::ContentUpdated => Table::Content,
            Self::MetadataUpdated => Table::Metadata,
            Self::ProjectInserted(_) | Self::ProjectUpdated(_) | Self::ProjectDeleted(_) => {
                Table::Projects
            }
        }
    }
}

/// Raw notification as published by the database trigger.
///
/// ```json
/// { "table": "projects", "op": "UPDATE", "id": 7 }
/// ```
///
/// Rows are never embedded, so the payload stays a few bytes long whatever the row holds.
#[derive(Clone, Debug, Deserialize)]
pub struct ChangeEnvelope {
    pub table: String,
    pub op: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl ChangeEnvelope {
    /// Parse a notification payload straight from its JSON text.
    pub fn parse(payload: &str) -> Result<RowChange, SchemaError> {
        let envelope: ChangeEnvelope =
            serde_json::from_str(payload).map_err(|_| SchemaError::NotAnObject)?;
        envelope.into_change()
    }

    pub fn into_change(self) -> Result<RowChange, SchemaError> {
        let table = match self.table.as_str() {
            "content" => Table::Content,
            "metadata" => Table::Metadata,
            "projects" => Table::Projects,
            other => return Err(SchemaError::UnknownTable(other.to_string())),
        };
        let id = || self.id.ok_or(SchemaError::MissingField("id"));

        match (table, self.op.to_ascii_uppercase().as_str()) {
            (Table::Projects, "INSERT") => Ok(RowChange::ProjectInserted(id()?)),
            (Table::Projects, "UPDATE") => Ok(RowChange::ProjectUpdated(id()?)),
            (Table::Projects, "DELETE") => Ok(RowChange::ProjectDeleted(id()?)),
            (Table::Content, "UPDATE") => Ok(RowChange::ContentUpdated),
            (Table::Metadata, "UPDATE") => Ok(RowChange::MetadataUpdated),
            (table, op) => Err(SchemaError::UnknownOperation {
                table: table.as_str().to_string(),
                op: op.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_nulls_become_empty_strings() {
        let row = json!({
            "id": 4,
            "title": "Site",
            "date": null,
            "description": "A site",
            "image_url": null,
            "github_url": "https://github.com/me/site",
            "created_at": "2024-05-01T10:00:00Z"
        });

        let project = parse_project(&row).unwrap();
        assert_eq!(project.id, 4);
        assert_eq!(project.date, "");
        assert_eq!(project.image_url, "");
        assert_eq!(project.live_url, "");
    }

    #[test]
    fn project_without_id_is_rejected() {
        let err = parse_project(&json!({ "title": "x" })).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("id"));

        let err = parse_project(&json!({ "id": "4" })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { field: "id", .. }));
    }

    #[test]
    fn wrong_types_are_rejected_not_coerced() {
        let err = parse_content(&json!({ "hero_text": 12 })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { field: "hero_text", .. }));

        let err = parse_metadata(&json!({ "keywords": "a,b" })).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { field: "keywords", .. }));

        assert_eq!(parse_project(&json!([1, 2])).unwrap_err(), SchemaError::NotAnObject);
    }

    #[test]
    fn metadata_blank_og_image_is_none() {
        let metadata = parse_metadata(&json!({
            "id": 1,
            "title": "Me",
            "keywords": ["rust", "web"],
            "og_image": ""
        }))
        .unwrap();
        assert_eq!(metadata.og_image, None);
        assert_eq!(metadata.keywords, vec!["rust", "web"]);
        assert_eq!(metadata.twitter_handle, "");
    }

    #[test]
    fn change_frames_pass_the_row_rules() {
        let frame = json!({
            "kind": "project_updated",
            "project": { "id": 3, "title": "Site", "live_url": null }
        });
        let event = parse_change_frame(&frame.to_string()).unwrap();
        let ChangeEvent::ProjectUpdated { project } = event else {
            panic!("unexpected event {event:?}");
        };
        assert_eq!(project.id, 3);
        assert_eq!(project.live_url, "");

        let deleted = parse_change_frame(r#"{"kind":"project_deleted","id":3}"#).unwrap();
        assert_eq!(deleted, ChangeEvent::ProjectDeleted { id: 3 });

        let sent = ChangeEvent::ContentUpdated {
            content: Content::default(),
        };
        let text = serde_json::to_string(&sent).unwrap();
        assert_eq!(parse_change_frame(&text).unwrap(), sent);
    }

    #[test]
    fn bad_change_frames_are_rejected() {
        let err = parse_change_frame(r#"{"kind":"project_inserted"}"#).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("project"));

        let err = parse_change_frame(r#"{"kind":"content_updated","content":{"email":5}}"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { field: "email", .. }));

        let err = parse_change_frame(r#"{"project":{"id":1}}"#).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("kind"));

        assert!(parse_change_frame(r#"{"kind":"table_dropped"}"#).is_err());
    }

    #[test]
    fn envelopes_name_rows() {
        let insert = ChangeEnvelope::parse(r#"{"table":"projects","op":"INSERT","id":9}"#).unwrap();
        assert_eq!(insert, RowChange::ProjectInserted(9));

        let update = ChangeEnvelope::parse(r#"{"table":"projects","op":"update","id":9}"#).unwrap();
        assert_eq!(update, RowChange::ProjectUpdated(9));

        let delete = ChangeEnvelope::parse(r#"{"table":"projects","op":"DELETE","id":9}"#).unwrap();
        assert_eq!(delete, RowChange::ProjectDeleted(9));
        assert_eq!(delete.table(), Table::Projects);

        let content = ChangeEnvelope::parse(r#"{"table":"content","op":"UPDATE","id":1}"#).unwrap();
        assert_eq!(content, RowChange::ContentUpdated);

        let metadata = ChangeEnvelope::parse(r#"{"table":"metadata","op":"UPDATE"}"#).unwrap();
        assert_eq!(metadata, RowChange::MetadataUpdated);
    }

    #[test]
    fn unsupported_envelopes_are_errors() {
        let err = ChangeEnvelope::parse(r#"{"table":"users","op":"INSERT"}"#).unwrap_err();
        assert_eq!(err, SchemaError::UnknownTable("users".to_string()));

        let err = ChangeEnvelope::parse(r#"{"table":"content","op":"DELETE","id":1}"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownOperation { .. }));

        let err = ChangeEnvelope::parse(r#"{"table":"projects","op":"UPDATE"}"#).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("id"));

        let err = ChangeEnvelope::parse(r#"{"table":"projects","op":"DELETE","id":"9"}"#)
            .unwrap_err();
        assert_eq!(err, SchemaError::NotAnObject);

        assert_eq!(ChangeEnvelope::parse("not json").unwrap_err(), SchemaError::NotAnObject);
    }
}
