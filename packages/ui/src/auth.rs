//! Login form and logout button, talking to the Session Gate endpoints.
//!
//! The gate answers with a `Set-Cookie` header, so these go through plain HTTP requests
//! rather than server functions; the browser stores the marker itself.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

const LOGIN_ENDPOINT: &str = "/api/auth";
const LOGOUT_ENDPOINT: &str = "/api/auth/logout";

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(target_arch = "wasm32")]
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}{path}")
}

#[cfg(not(target_arch = "wasm32"))]
fn endpoint(path: &str) -> String {
    format!("http://localhost:8080{path}")
}

fn navigate(path: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    tracing::debug!(path, "navigation requested outside the browser");
}

/// `POST /api/auth`. The error is the message to show next to the form.
pub async fn login(username: &str, password: &str) -> Result<(), String> {
    let response = reqwest::Client::new()
        .post(endpoint(LOGIN_ENDPOINT))
        .json(&Credentials { username, password })
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        return Ok(());
    }
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(body.error),
        Err(_) => Err("Login failed".to_string()),
    }
}

/// `POST /api/auth/logout`.
pub async fn logout() -> Result<(), String> {
    reqwest::Client::new()
        .post(endpoint(LOGOUT_ENDPOINT))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[component]
pub fn LoginForm() -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut submitting = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            submitting.set(true);
            error.set(None);
            match login(&username(), &password()).await {
                Ok(()) => navigate("/admin"),
                Err(message) => {
                    tracing::warn!("login rejected");
                    error.set(Some(message));
                    submitting.set(false);
                }
            }
        });
    };

    rsx! {
        form {
            class: "login-form",
            onsubmit: onsubmit,

            h1 { class: "login-title", "Admin Login" }

            if let Some(message) = error() {
                p { class: "form-error", role: "alert", "{message}" }
            }

            label { r#for: "username", "Username" }
            input {
                id: "username",
                r#type: "text",
                autocomplete: "username",
                value: username(),
                oninput: move |evt: FormEvent| username.set(evt.value()),
            }

            label { r#for: "password", "Password" }
            input {
                id: "password",
                r#type: "password",
                autocomplete: "current-password",
                value: password(),
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: submitting(),
                if submitting() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}

#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let onclick = move |_| async move {
        match logout().await {
            Ok(()) => tracing::info!("signed out"),
            Err(err) => tracing::error!("Failed to sign out: {}", err),
        }
        navigate("/login");
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
