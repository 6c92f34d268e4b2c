//! Dashboard view. Only reachable with a valid session marker; the guard middleware
//! redirects everyone else to `/login` before this renders.

use dioxus::prelude::*;
use ui::AdminDashboard;

#[component]
pub fn Admin() -> Element {
    rsx! {
        AdminDashboard {}
    }
}
