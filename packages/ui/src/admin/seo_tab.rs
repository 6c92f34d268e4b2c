use dioxus::prelude::*;
use store::Metadata;

use super::content_tab::{SaveButton, TextField};
use super::image_picker::{ImagePicker, ImageTarget};
use crate::cell::{use_site, use_site_client};

/// Editor for the `metadata` row: document title, description, keywords, author, social
/// preview image and Twitter handle.
#[component]
pub fn SeoTab() -> Element {
    let site = use_site();
    let client = use_site_client();
    let stored = use_memo(move || site.read().metadata.clone());
    let mut draft = use_signal(|| stored.peek().clone());
    // Keywords are edited as one comma separated line and split on save.
    let mut keywords = use_signal(|| stored.peek().keywords_line());
    let mut saving = use_signal(|| false);

    use_effect(move || {
        let metadata = stored();
        keywords.set(metadata.keywords_line());
        draft.set(metadata);
    });

    let edited = move || Metadata {
        keywords: Metadata::parse_keywords(&keywords()),
        ..draft()
    };

    let save = move |_| {
        spawn(async move {
            saving.set(true);
            if let Err(err) = client.update_metadata(edited()).await {
                tracing::debug!(error = %err, "metadata save failed");
            }
            saving.set(false);
        });
    };

    let og_image = draft().og_image.unwrap_or_default();

    rsx! {
        div {
            class: "admin-form",
            TextField {
                label: "Page title",
                value: draft().title,
                on_input: move |value| draft.write().title = value,
            }
            TextField {
                label: "Description",
                value: draft().description,
                multiline: true,
                on_input: move |value| draft.write().description = value,
            }
            TextField {
                label: "Keywords",
                value: keywords(),
                placeholder: "rust, web, portfolio",
                on_input: move |value| keywords.set(value),
            }
            TextField {
                label: "Author",
                value: draft().author,
                on_input: move |value| draft.write().author = value,
            }
            TextField {
                label: "Twitter handle",
                value: draft().twitter_handle,
                placeholder: "@handle",
                on_input: move |value| draft.write().twitter_handle = value,
            }
            div {
                class: "field",
                span { class: "field-label", "Social preview image" }
                ImagePicker {
                    target: ImageTarget::OgImage,
                    value: og_image,
                    on_change: move |url: String| {
                        draft.write().og_image = (!url.is_empty()).then_some(url);
                    },
                }
            }
            SaveButton { saving: saving(), dirty: edited() != stored(), onclick: save }
        }
    }
}
