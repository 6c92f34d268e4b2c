use dioxus::prelude::*;

use crate::cell::{use_site, use_site_client};

/// Editor for the landing page copy.
#[component]
pub fn ContentTab() -> Element {
    let site = use_site();
    let client = use_site_client();
    let stored = use_memo(move || site.read().content.clone());
    let mut draft = use_signal(|| stored.peek().clone());
    let mut saving = use_signal(|| false);

    // Follow the stored row so live edits from elsewhere show up in the form.
    use_effect(move || draft.set(stored()));

    let save = move |_| {
        spawn(async move {
            saving.set(true);
            if let Err(err) = client.update_content(draft()).await {
                tracing::debug!(error = %err, "content save failed");
            }
            saving.set(false);
        });
    };

    rsx! {
        div {
            class: "admin-form",
            TextField {
                label: "Hero text",
                value: draft().hero_text,
                multiline: true,
                on_input: move |value| draft.write().hero_text = value,
            }
            TextField {
                label: "Introduction",
                value: draft().intro_text,
                multiline: true,
                on_input: move |value| draft.write().intro_text = value,
            }
            TextField {
                label: "Work introduction",
                value: draft().work_intro,
                multiline: true,
                on_input: move |value| draft.write().work_intro = value,
            }
            TextField {
                label: "Availability",
                value: draft().availability_text,
                multiline: true,
                on_input: move |value| draft.write().availability_text = value,
            }
            TextField {
                label: "Contact email",
                value: draft().email,
                on_input: move |value| draft.write().email = value,
            }
            SaveButton { saving: saving(), dirty: draft() != stored(), onclick: save }
        }
    }
}

#[component]
pub fn TextField(
    label: String,
    value: String,
    #[props(default)] multiline: bool,
    #[props(default)] placeholder: String,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label {
            class: "field",
            span { class: "field-label", "{label}" }
            if multiline {
                textarea {
                    rows: 3,
                    placeholder: "{placeholder}",
                    value: "{value}",
                    oninput: move |evt: FormEvent| on_input.call(evt.value()),
                }
            } else {
                input {
                    r#type: "text",
                    placeholder: "{placeholder}",
                    value: "{value}",
                    oninput: move |evt: FormEvent| on_input.call(evt.value()),
                }
            }
        }
    }
}

#[component]
pub fn SaveButton(saving: bool, dirty: bool, onclick: EventHandler<MouseEvent>) -> Element {
    rsx! {
        button {
            class: "btn btn-primary",
            r#type: "button",
            disabled: saving || !dirty,
            onclick: move |evt| onclick.call(evt),
            if saving { "Saving..." } else { "Save changes" }
        }
    }
}
