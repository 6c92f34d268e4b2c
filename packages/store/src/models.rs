//! # Domain models for the three content tables
//!
//! | Struct | Table | Shape |
//! |--------|-------|-------|
//! | [`Content`] | `content` | Singleton. Free text rendered on the landing page. |
//! | [`Metadata`] | `metadata` | Singleton. Title, description, keywords and social preview fields. |
//! | [`Project`] | `projects` | Multi-row. One portfolio entry, identified by a server-assigned `id`. |
//! | [`ProjectDraft`] | `projects` | The column values of a project that is about to be inserted. |
//!
//! Every text field is a plain `String` defaulting to an empty string or a placeholder, so
//! nothing downstream ever renders a missing value as literal text. The only nullable
//! column is [`Metadata::og_image`].

use serde::{Deserialize, Serialize};

use crate::urls::normalize_url;

/// Key of the single row held by the `content` and `metadata` tables.
pub const SINGLETON_ID: i64 = 1;

/// Landing page copy (`content` table).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub hero_text: String,
    pub intro_text: String,
    pub availability_text: String,
    pub work_intro: String,
    pub email: String,
}

impl Default for Content {
    /// Built-in copy shown until (or instead of) the stored row.
    fn default() -> Self {
        Self {
            hero_text: "Software Engineer working on building impactful digital experiences."
                .to_string(),
            intro_text: "I am a Software Engineer focusing on building modern web applications and digital experiences.".to_string(),
            availability_text: "I have limited availability, but I am open to hearing about your project! If you're looking for a developer, please feel free to reach out via".to_string(),
            work_intro: "Below is a selection of my work from the last few years.".to_string(),
            email: "hello@example.com".to_string(),
        }
    }
}

impl Content {
    /// Overwrite each field with the incoming value unless that value is blank.
    ///
    /// Used for fetched rows and change notifications, so an empty column never blanks
    /// out copy that is already on screen.
    pub fn merge_non_empty(&mut self, incoming: &Content) {
        fn take(current: &mut String, incoming: &str) {
            if !incoming.trim().is_empty() {
                *current = incoming.to_string();
            }
        }
        take(&mut self.hero_text, &incoming.hero_text);
        take(&mut self.intro_text, &incoming.intro_text);
        take(&mut self.availability_text, &incoming.availability_text);
        take(&mut self.work_intro, &incoming.work_intro);
        take(&mut self.email, &incoming.email);
    }
}

/// Page metadata (`metadata` table).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub og_image: Option<String>,
    pub twitter_handle: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            id: SINGLETON_ID,
            title: "Portfolio".to_string(),
            description: "Projects, writing and contact details.".to_string(),
            keywords: Vec::new(),
            author: String::new(),
            og_image: None,
            twitter_handle: String::new(),
        }
    }
}

impl Metadata {
    /// Keywords as a single `meta name="keywords"` value.
    pub fn keywords_line(&self) -> String {
        self.keywords.join(", ")
    }

    /// Split a comma separated input into trimmed, non-empty keywords, keeping order.
    pub fn parse_keywords(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A portfolio entry (`projects` table).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    /// Free-form label such as `"2024"` or `"Present"`.
    pub date: String,
    pub description: String,
    pub image_url: String,
    pub github_url: String,
    pub live_url: String,
}

impl Project {
    pub fn from_draft(id: i64, draft: ProjectDraft) -> Self {
        Self {
            id,
            title: draft.title,
            date: draft.date,
            description: draft.description,
            image_url: draft.image_url,
            github_url: draft.github_url,
            live_url: draft.live_url,
        }
    }

    /// Copy with `github_url` and `live_url` given a scheme where they lack one.
    pub fn normalized(mut self) -> Self {
        self.github_url = normalize_url(&self.github_url);
        self.live_url = normalize_url(&self.live_url);
        self
    }
}

/// Column values for a project insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image_url: String,
    pub github_url: String,
    pub live_url: String,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            title: "New Project".to_string(),
            date: "Present".to_string(),
            description: String::new(),
            image_url: String::new(),
            github_url: String::new(),
            live_url: String::new(),
        }
    }
}

impl ProjectDraft {
    pub fn normalized(mut self) -> Self {
        self.github_url = normalize_url(&self.github_url);
        self.live_url = normalize_url(&self.live_url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_current_text_for_blank_fields() {
        let mut content = Content::default();
        let incoming = Content {
            hero_text: "Building tools".to_string(),
            intro_text: "   ".to_string(),
            availability_text: String::new(),
            work_intro: "Selected work".to_string(),
            email: String::new(),
        };

        content.merge_non_empty(&incoming);

        assert_eq!(content.hero_text, "Building tools");
        assert_eq!(content.work_intro, "Selected work");
        assert_eq!(content.intro_text, Content::default().intro_text);
        assert_eq!(content.email, "hello@example.com");
    }

    #[test]
    fn keywords_parse_and_join() {
        let keywords = Metadata::parse_keywords(" rust, web ,, portfolio ");
        assert_eq!(keywords, vec!["rust", "web", "portfolio"]);

        let metadata = Metadata {
            keywords,
            ..Metadata::default()
        };
        assert_eq!(metadata.keywords_line(), "rust, web, portfolio");
    }

    #[test]
    fn normalized_project_gets_https_links() {
        let project = Project::from_draft(
            3,
            ProjectDraft {
                github_url: "github.com/me".to_string(),
                live_url: "https://me.dev".to_string(),
                ..ProjectDraft::default()
            },
        )
        .normalized();

        assert_eq!(project.github_url, "https://github.com/me");
        assert_eq!(project.live_url, "https://me.dev");
        assert_eq!(project.title, "New Project");
        assert_eq!(project.date, "Present");
    }
}
