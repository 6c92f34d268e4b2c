//! Login page view. A visitor who already holds a valid marker is sent on to
//! `/admin` by the guard middleware before this renders.

use dioxus::prelude::*;
use ui::LoginForm;

#[component]
pub fn Login() -> Element {
    rsx! {
        document::Title { "Login" }
        document::Meta { name: "robots", content: "noindex, nofollow" }

        div {
            class: "login-container",
            LoginForm {}
        }
    }
}
