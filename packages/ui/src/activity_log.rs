use dioxus::prelude::*;
use store::{Notice, NoticeLevel};

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: NoticeLevel,
    pub message: String,
}

/// Operator-facing history of notices shown on the dashboard.
#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_notice(log: &mut Signal<ActivityLog>, notice: &Notice) {
    let timestamp = current_time();
    log.write().entries.push(LogEntry {
        timestamp,
        level: notice.level,
        message: notice.message.clone(),
    });
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    "00:00:00".to_string()
}
