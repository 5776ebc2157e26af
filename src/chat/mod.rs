//! Chat send path
//!
//! One user message goes out as a single JSON POST (`{message, userKey}`) and
//! comes back as one assistant message, either the endpoint's `reply` or a
//! readable error.
//!
//! # Architecture
//!
//! - `client` - wire types, the `ChatTransport` seam and the reqwest transport
//! - `controller` - `SendController`, which owns history and the in-flight flag
//! - `error` - `SendError` and the text each failure shows the user
//!
//! # Usage
//!
//! ```rust,no_run
//! use ppg_chat::chat::{HttpTransport, SendController};
//! use ppg_chat::config::WidgetConfig;
//! use ppg_chat::history::HistoryStore;
//! use ppg_chat::storage::MemoryStore;
//!
//! # async fn example() {
//! let config = WidgetConfig::load();
//! let mut chat = SendController::new(HistoryStore::new(MemoryStore::new()), config.send);
//! let reply = chat.send_message("Hello!", &HttpTransport::new()).await;
//! # }
//! ```
mod client;
mod controller;
mod error;

pub use client::{
    ChatRequest, ChatTransport, EndpointReply, HttpTransport, TransportError, interpret_reply,
    with_deadline,
};
pub use controller::{PendingSend, SendController};
pub use error::{
    CONFIG_MISSING_TEXT, NETWORK_TEXT, NO_ANSWER_TEXT, SERVICE_ERROR_PREFIX, SendError,
    TIMEOUT_TEXT,
};
