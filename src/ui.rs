use crate::config::WidgetConfig;
use crate::views::ChatView;
use dioxus::prelude::*;

const WIDGET_CSS: Asset = asset!("/assets/widget.css");

#[component]
pub fn App() -> Element {
    let config = use_hook(WidgetConfig::load);

    rsx! {
        document::Link { rel: "stylesheet", href: WIDGET_CSS }
        ChatView { config }
    }
}
