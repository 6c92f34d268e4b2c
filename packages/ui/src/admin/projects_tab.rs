use dioxus::prelude::*;
use store::Project;

use super::content_tab::TextField;
use super::image_picker::{ImagePicker, ImageTarget};
use crate::cell::{use_site, use_site_client};
use crate::icons::{FaPlus, FaTrashCan};
use crate::landing::FallbackImage;
use crate::modal::Modal;
use crate::Icon;

#[component]
pub fn ProjectsTab() -> Element {
    let site = use_site();
    let client = use_site_client();
    let mut adding = use_signal(|| false);

    let add = move |_| {
        spawn(async move {
            adding.set(true);
            if let Err(err) = client.insert_project().await {
                tracing::debug!(error = %err, "project insert failed");
            }
            adding.set(false);
        });
    };

    let (projects, selected) = {
        let state = site.read();
        (state.projects.clone(), state.selected_project().cloned())
    };

    rsx! {
        div {
            class: "admin-toolbar",
            button {
                class: "btn btn-primary",
                disabled: adding(),
                onclick: add,
                Icon { icon: FaPlus, width: 12, height: 12 }
                if adding() { " Adding..." } else { " Add project" }
            }
        }

        if projects.is_empty() {
            p { class: "view-muted", "No projects yet." }
        }

        div {
            class: "project-grid",
            for project in projects {
                button {
                    key: "{project.id}",
                    class: "project-tile",
                    onclick: move |_| client.select(project.id),
                    FallbackImage {
                        key: "{project.image_url}",
                        src: project.image_url.clone(),
                        alt: project.title.clone(),
                    }
                    span { class: "project-tile-title", "{project.title}" }
                    span { class: "project-date", "{project.date}" }
                }
            }
        }

        if let Some(project) = selected {
            ProjectEditor { key: "{project.id}", project }
        }
    }
}

/// Modal editor for one project. Saving closes it once the write succeeds; a failed
/// save keeps it open with the operator's edits.
#[component]
pub fn ProjectEditor(project: Project) -> Element {
    let client = use_site_client();
    let id = project.id;
    let mut draft = use_signal(|| project.clone());
    let mut saving = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);

    let save = move |_| {
        spawn(async move {
            saving.set(true);
            if let Err(err) = client.update_project(draft()).await {
                tracing::debug!(id, error = %err, "project save failed");
            }
            saving.set(false);
        });
    };

    let delete = move |_| {
        spawn(async move {
            saving.set(true);
            if let Err(err) = client.delete_project(id).await {
                tracing::debug!(id, error = %err, "project delete failed");
            }
            saving.set(false);
            confirm_delete.set(false);
        });
    };

    rsx! {
        Modal {
            title: "Edit project",
            on_close: move |_| client.close_editor(),

            div {
                class: "admin-form",
                TextField {
                    label: "Title",
                    value: draft().title,
                    on_input: move |value| draft.write().title = value,
                }
                TextField {
                    label: "Date",
                    value: draft().date,
                    placeholder: "2024, Present",
                    on_input: move |value| draft.write().date = value,
                }
                TextField {
                    label: "Description",
                    value: draft().description,
                    multiline: true,
                    on_input: move |value| draft.write().description = value,
                }
                TextField {
                    label: "GitHub link",
                    value: draft().github_url,
                    placeholder: "github.com/you/project",
                    on_input: move |value| draft.write().github_url = value,
                }
                TextField {
                    label: "Live link",
                    value: draft().live_url,
                    placeholder: "project.example.com",
                    on_input: move |value| draft.write().live_url = value,
                }
                div {
                    class: "field",
                    span { class: "field-label", "Image" }
                    ImagePicker {
                        target: ImageTarget::Project(id),
                        value: draft().image_url,
                        on_change: move |url: String| draft.write().image_url = url,
                    }
                }
            }

            div {
                class: "modal-actions",
                if confirm_delete() {
                    span { class: "form-error", "Delete this project?" }
                    button {
                        class: "btn btn-danger",
                        disabled: saving(),
                        onclick: delete,
                        "Delete"
                    }
                    button {
                        class: "btn",
                        onclick: move |_| confirm_delete.set(false),
                        "Keep"
                    }
                } else {
                    button {
                        class: "btn btn-danger",
                        title: "Delete project",
                        disabled: saving(),
                        onclick: move |_| confirm_delete.set(true),
                        Icon { icon: FaTrashCan, width: 12, height: 12 }
                    }
                    button {
                        class: "btn",
                        onclick: move |_| client.close_editor(),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        disabled: saving(),
                        onclick: save,
                        if saving() { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}
