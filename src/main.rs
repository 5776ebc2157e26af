#[cfg(any(feature = "web", feature = "desktop"))]
fn main() {
    ppg_chat::init_tracing();
    ppg_chat::config::load_dotenv();
    dioxus::launch(ppg_chat::ui::App);
}

#[cfg(not(any(feature = "web", feature = "desktop")))]
fn main() {
    ppg_chat::init_tracing();
    tracing::error!("no UI platform compiled in; build with `--features web` or `--features desktop`");
    std::process::exit(2);
}
