use chat_shared::config::is_guest_query;
use chrono::{DateTime, Local, Utc};
use web_sys::window;

const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Get the base HTTP URL (e.g., "http://localhost:3000" or "https://myapp.com")
pub fn get_base_url() -> String {
    let location = window().map(|w| w.location());

    let protocol = location
        .as_ref()
        .and_then(|l| l.protocol().ok())
        .unwrap_or_else(|| "http:".to_string());
    let host = location
        .as_ref()
        .and_then(|l| l.host().ok())
        .unwrap_or_else(|| "localhost:3000".to_string());

    format!("{}//{}", protocol, host)
}

/// Build a full API URL from a path (e.g., "/chat" -> "http://localhost:3000/chat")
pub fn api_url(path: &str) -> String {
    format!("{}{}", get_base_url(), path)
}

/// Whether the page was opened with `?guest=1`
pub fn is_guest_mode() -> bool {
    window()
        .and_then(|w| w.location().search().ok())
        .is_some_and(|search| is_guest_query(&search))
}

/// Milliseconds since the Unix epoch, from the browser clock
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current local time as shown next to messages
pub fn now_label() -> String {
    Local::now().format(CLOCK_FORMAT).to_string()
}

/// Local time of a stored timestamp as shown next to messages
pub fn clock_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(CLOCK_FORMAT).to_string()
}
