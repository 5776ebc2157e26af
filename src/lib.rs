pub mod chat;
pub mod config;
pub mod faq;
pub mod history;
pub mod render;
pub mod storage;
pub mod types;

#[cfg(any(feature = "web", feature = "desktop"))]
pub mod ui;
#[cfg(any(feature = "web", feature = "desktop"))]
pub mod views;

/// Native builds log to stderr; in the browser the UI runtime routes `tracing`
/// to the console.
pub fn init_tracing() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = tracing_subscriber::fmt().with_target(false).try_init();
    }
}
