//! # Site state container
//!
//! [`SiteState`] is the in-memory mirror of the three content tables plus the bits of
//! view state that depend on them (the open project and the operator notice). It only
//! changes through [`SiteState::apply`], one [`Action`] at a time, whether the change
//! comes from a fetch, an operator edit or the realtime feed.
//!
//! Every project mutation is a replace-by-identity, so applying the same change twice
//! (for example a local insert followed by the feed echoing it back) leaves the same
//! state as applying it once. Concurrent writers are merged last-write-wins per row.
//!
//! A failed write never rolls anything back: the operator's edit stays on screen next to
//! the error notice so it can be saved again.

use crate::models::{Content, Metadata, Project};
use crate::realtime::ChangeEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message the operator has to acknowledge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// How fetched and notified `content` rows enter state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Blank columns keep the built-in copy. The landing page renders this.
    #[default]
    Display,
    /// Rows are taken exactly as stored, blanks included. The editors load this so that
    /// saving never writes placeholder copy back.
    Raw,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Switch how `content` rows are applied. Changing mode drops the current copy.
    Mode(LoadMode),
    /// A fetched `content` row. In [`LoadMode::Display`] it is merged field by field and
    /// blanks keep the current text.
    ContentLoaded(Content),
    /// Optimistic operator edit, applied before the write is sent and kept if it fails.
    ContentEdited(Content),
    MetadataLoaded(Metadata),
    MetadataEdited(Metadata),
    /// Full project list, newest first.
    ProjectsLoaded(Vec<Project>),
    /// A project created by this client; prepended and opened in the editor.
    ProjectInserted(Project),
    /// A confirmed update made by this client; closes the editor.
    ProjectSaved(Project),
    /// A confirmed delete made by this client.
    ProjectRemoved(i64),
    Select(i64),
    CloseEditor,
    Remote(ChangeEvent),
    Notice(Notice),
    DismissNotice,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct SiteState {
    pub content: Content,
    pub metadata: Metadata,
    pub projects: Vec<Project>,
    /// Id of the project open in the editor, if any.
    pub selected: Option<i64>,
    pub notice: Option<Notice>,
    pub mode: LoadMode,
}

impl SiteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.and_then(|id| self.project(id))
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Mode(mode) => {
                if self.mode != mode {
                    self.mode = mode;
                    self.content = Content::default();
                }
            }
            Action::ContentLoaded(content) => self.load_content(content),
            Action::ContentEdited(content) => self.content = content,
            Action::MetadataLoaded(metadata) | Action::MetadataEdited(metadata) => {
                self.metadata = metadata
            }
            Action::ProjectsLoaded(projects) => {
                self.projects = projects;
                if self.selected_project().is_none() {
                    self.selected = None;
                }
            }
            Action::ProjectInserted(project) => {
                let id = project.id;
                self.upsert_front(project);
                self.selected = Some(id);
            }
            Action::ProjectSaved(project) => {
                self.replace(project);
                self.selected = None;
            }
            Action::ProjectRemoved(id) => self.remove(id),
            Action::Select(id) => {
                if self.project(id).is_some() {
                    self.selected = Some(id);
                }
            }
            Action::CloseEditor => self.selected = None,
            Action::Remote(event) => self.reconcile(event),
            Action::Notice(notice) => self.notice = Some(notice),
            Action::DismissNotice => self.notice = None,
        }
    }

    /// Merge one change notification.
    fn reconcile(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::ProjectInserted { project } => self.upsert_front(project),
            ChangeEvent::ProjectUpdated { project } => self.replace(project),
            ChangeEvent::ProjectDeleted { id } => self.remove(id),
            ChangeEvent::ContentUpdated { content } => self.load_content(content),
            ChangeEvent::MetadataUpdated { metadata } => self.metadata = metadata,
        }
    }

    fn load_content(&mut self, content: Content) {
        match self.mode {
            LoadMode::Display => self.content.merge_non_empty(&content),
            LoadMode::Raw => self.content = content,
        }
    }

    /// Replace the entry with the same id in place, or prepend if there is none.
    fn upsert_front(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.insert(0, project),
        }
    }

    /// Replace the entry with the same id; unknown ids are ignored.
    fn replace(&mut self, project: Project) {
        if let Some(existing) = self.projects.iter_mut().find(|p| p.id == project.id) {
            *existing = project;
        }
    }

    fn remove(&mut self, id: i64) {
        self.projects.retain(|p| p.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectDraft;

    fn project(id: i64, title: &str) -> Project {
        Project {
            title: title.to_string(),
            ..Project::from_draft(id, ProjectDraft::default())
        }
    }

    fn state_with(projects: Vec<Project>) -> SiteState {
        let mut state = SiteState::new();
        state.apply(Action::ProjectsLoaded(projects));
        state
    }

    #[test]
    fn insert_update_delete_converges_to_absent() {
        let mut state = state_with(vec![project(1, "One")]);

        state.apply(Action::Remote(ChangeEvent::ProjectInserted {
            project: project(2, "A"),
        }));
        assert_eq!(state.projects[0].id, 2);

        state.apply(Action::Remote(ChangeEvent::ProjectUpdated {
            project: project(2, "A prime"),
        }));
        assert_eq!(state.project(2).unwrap().title, "A prime");

        state.apply(Action::Remote(ChangeEvent::ProjectDeleted { id: 2 }));
        assert!(state.project(2).is_none());
        assert_eq!(state.projects.len(), 1);
    }

    #[test]
    fn remote_insert_prepends_and_echo_is_harmless() {
        let mut state = state_with(vec![project(5, "Five"), project(4, "Four")]);

        state.apply(Action::ProjectInserted(project(6, "Six")));
        state.apply(Action::Remote(ChangeEvent::ProjectInserted {
            project: project(6, "Six"),
        }));

        let ids: Vec<i64> = state.projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 5, 4]);
        assert_eq!(state.selected, Some(6));
    }

    #[test]
    fn remote_insert_ignores_timestamps_and_prepends() {
        let mut state = state_with(vec![project(10, "Ten")]);
        state.apply(Action::Remote(ChangeEvent::ProjectInserted {
            project: project(3, "Older row"),
        }));
        assert_eq!(state.projects[0].id, 3);
    }

    #[test]
    fn update_for_unknown_row_is_a_no_op() {
        let mut state = state_with(vec![project(1, "One")]);
        let before = state.clone();

        state.apply(Action::Remote(ChangeEvent::ProjectUpdated {
            project: project(99, "Ghost"),
        }));
        assert_eq!(state, before);
    }

    #[test]
    fn deleting_the_open_project_clears_selection_once() {
        let mut state = state_with(vec![project(7, "Seven"), project(6, "Six")]);
        state.apply(Action::Select(7));
        assert_eq!(state.selected_project().map(|p| p.id), Some(7));

        state.apply(Action::ProjectRemoved(7));
        assert_eq!(state.selected, None);
        let after_local = state.clone();

        state.apply(Action::Remote(ChangeEvent::ProjectDeleted { id: 7 }));
        assert_eq!(state, after_local);
    }

    #[test]
    fn deleting_another_project_keeps_selection() {
        let mut state = state_with(vec![project(7, "Seven"), project(6, "Six")]);
        state.apply(Action::Select(7));
        state.apply(Action::Remote(ChangeEvent::ProjectDeleted { id: 6 }));
        assert_eq!(state.selected, Some(7));
    }

    #[test]
    fn select_requires_a_known_project() {
        let mut state = state_with(vec![project(1, "One")]);
        state.apply(Action::Select(2));
        assert_eq!(state.selected, None);

        state.apply(Action::Select(1));
        state.apply(Action::CloseEditor);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn saved_project_replaces_entry_and_closes_editor() {
        let mut state = state_with(vec![project(1, "One")]);
        state.apply(Action::Select(1));
        state.apply(Action::ProjectSaved(project(1, "Uno")));

        assert_eq!(state.project(1).unwrap().title, "Uno");
        assert_eq!(state.selected, None);
    }

    #[test]
    fn reload_drops_selection_of_vanished_project() {
        let mut state = state_with(vec![project(1, "One")]);
        state.apply(Action::Select(1));
        state.apply(Action::ProjectsLoaded(vec![project(2, "Two")]));
        assert_eq!(state.selected, None);
    }

    #[test]
    fn content_update_merges_non_empty_fields() {
        let mut state = SiteState::new();
        let incoming = Content {
            hero_text: "Hello".to_string(),
            intro_text: String::new(),
            ..Content::default()
        };
        state.apply(Action::Remote(ChangeEvent::ContentUpdated { content: incoming }));

        assert_eq!(state.content.hero_text, "Hello");
        assert_eq!(state.content.intro_text, Content::default().intro_text);
    }

    #[test]
    fn raw_mode_keeps_blank_columns() {
        let mut state = SiteState::new();
        state.apply(Action::Mode(LoadMode::Raw));
        let stored = Content {
            hero_text: "Hello".to_string(),
            intro_text: String::new(),
            availability_text: String::new(),
            work_intro: String::new(),
            email: String::new(),
        };
        state.apply(Action::ContentLoaded(stored.clone()));
        assert_eq!(state.content, stored);

        state.apply(Action::Remote(ChangeEvent::ContentUpdated {
            content: Content {
                email: "me@example.org".to_string(),
                ..stored.clone()
            },
        }));
        assert_eq!(state.content.email, "me@example.org");
        assert_eq!(state.content.intro_text, "");
    }

    #[test]
    fn switching_back_to_display_restores_built_in_copy() {
        let mut state = SiteState::new();
        state.apply(Action::Mode(LoadMode::Raw));
        state.apply(Action::ContentLoaded(Content {
            hero_text: String::new(),
            ..Content::default()
        }));
        assert_eq!(state.content.hero_text, "");

        state.apply(Action::Mode(LoadMode::Display));
        assert_eq!(state.content, Content::default());
        state.apply(Action::Mode(LoadMode::Display));
        assert_eq!(state.mode, LoadMode::Display);
    }

    #[test]
    fn notices_are_set_and_dismissed() {
        let mut state = SiteState::new();
        state.apply(Action::Notice(Notice::error("Failed to update content")));
        assert_eq!(state.notice.as_ref().unwrap().level, NoticeLevel::Error);
        state.apply(Action::DismissNotice);
        assert!(state.notice.is_none());
    }
}
