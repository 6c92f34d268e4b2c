use dioxus::prelude::*;
use store::images::validate_upload;

use crate::landing::FallbackImage;

/// Where an uploaded file is stored. The returned URL only lands in the editor's draft;
/// the record changes when the editor is saved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageTarget {
    OgImage,
    Project(i64),
}

/// Image chooser for the editors: paste a link (share links are rewritten and probed on
/// the server) or pick a JPEG/PNG file. Files are checked here first so an oversized or
/// unsupported file never leaves the browser.
#[component]
pub fn ImagePicker(target: ImageTarget, value: String, on_change: EventHandler<String>) -> Element {
    let mut link = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let use_link = move |_| async move {
        let url = link().trim().to_string();
        if url.is_empty() {
            return;
        }
        busy.set(true);
        error.set(None);
        match api::resolve_image_url(url).await {
            Ok(resolved) => {
                link.set(String::new());
                on_change.call(resolved);
            }
            Err(err) => {
                tracing::warn!(error = %err, "image link rejected");
                error.set(Some(err.to_string()));
            }
        }
        busy.set(false);
    };

    let pick_file = move |evt: FormEvent| async move {
        let Some(file) = evt.files().into_iter().next() else {
            return;
        };
        let mime = file.content_type().unwrap_or_default();
        if let Err(err) = validate_upload(file.size(), &mime) {
            error.set(Some(err.to_string()));
            return;
        }

        busy.set(true);
        error.set(None);
        let upload = match file.read_bytes().await {
            Ok(bytes) => api::ImageUpload {
                file_name: file.name(),
                mime,
                bytes: bytes.to_vec(),
            },
            Err(err) => {
                error.set(Some(format!("Could not read file: {err}")));
                busy.set(false);
                return;
            }
        };

        let stored = match target {
            ImageTarget::OgImage => api::upload_og_image(upload).await,
            ImageTarget::Project(id) => api::upload_project_image(id, upload).await,
        };
        match stored {
            Ok(url) => on_change.call(url),
            Err(err) => {
                tracing::error!(error = %err, "image upload failed");
                error.set(Some(err.to_string()));
            }
        }
        busy.set(false);
    };

    rsx! {
        div {
            class: "image-picker",
            div {
                class: "image-preview",
                FallbackImage { key: "{value}", src: value.clone(), alt: "Selected image" }
            }
            div {
                class: "image-picker-row",
                input {
                    r#type: "url",
                    placeholder: "Paste an image or share link",
                    value: link(),
                    disabled: busy(),
                    oninput: move |evt: FormEvent| link.set(evt.value()),
                }
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: busy(),
                    onclick: use_link,
                    "Use link"
                }
            }
            input {
                r#type: "file",
                accept: "image/jpeg,image/png",
                disabled: busy(),
                onchange: pick_file,
            }
            if busy() {
                p { class: "view-muted", "Checking image..." }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
        }
    }
}
