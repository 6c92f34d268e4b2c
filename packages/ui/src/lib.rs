//! This crate contains all shared UI for the portfolio site.

pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod activity_log;
pub use activity_log::{log_notice, use_activity_log, ActivityLog, LogEntry};

mod activity_log_panel;
pub use activity_log_panel::ActivityLogPanel;

mod auth;
pub use auth::{login, logout, LoginForm, LogoutButton};

mod cell;
pub use cell::{use_site, use_site_client, SignalCell, SiteClient, SiteProvider};

mod remote;
pub use remote::ServerFnRemote;

mod live;
pub use live::{use_site_sync, LiveFeed};

mod modal;
pub use modal::Modal;

mod landing;
pub use landing::{FallbackImage, LandingPage, ProjectCard, SeoHead};

pub mod admin;
pub use admin::{AdminDashboard, NoticeBanner};
