//! Bubble view models and the small DOM scripts the chat view runs.

use crate::types::{ChatMessage, Role};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

pub const CHAT_BOX_ID: &str = "chat-box";
pub const INPUT_ID: &str = "user-input";
pub const SEND_BUTTON_ID: &str = "send-btn";
pub const TYPING_ID: &str = "typing-indicator";

pub const GREETING: &str = "Hello! How can PPG help you today?";
pub const TYPING_TEXT: &str = "Typing…";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub class: &'static str,
    /// Escaped markup, safe for `dangerous_inner_html`.
    pub html: String,
    pub time: Option<String>,
}

impl Bubble {
    pub fn greeting() -> Self {
        Self {
            class: bubble_class(Role::Assistant),
            html: text_to_html(GREETING),
            time: None,
        }
    }
}

pub fn bubble_class(role: Role) -> &'static str {
    match role {
        Role::User => "bubble user",
        Role::Assistant => "bubble bot",
    }
}

pub fn render(message: &ChatMessage) -> Bubble {
    Bubble {
        class: bubble_class(message.role),
        html: text_to_html(&message.content),
        time: format_timestamp(message.timestamp),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape, then keep line breaks visible.
pub fn text_to_html(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

pub fn format_timestamp(timestamp_ms: i64) -> Option<String> {
    if timestamp_ms <= 0 {
        return None;
    }
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    let mut datetime = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

pub fn scroll_to_bottom_script(container_id: &str) -> String {
    format!(
        "const el = document.getElementById('{container_id}'); if (el) {{ el.scrollTop = el.scrollHeight; }}"
    )
}

pub fn focus_script(element_id: &str) -> String {
    format!("const el = document.getElementById('{element_id}'); if (el) {{ el.focus(); }}")
}
