use crate::faq::FaqIndex;
use dioxus::prelude::*;

pub const FAQ_TOGGLE_ID: &str = "faq-toggle";
pub const FAQ_PANEL_ID: &str = "faq-panel";
pub const FAQ_CLOSE_ID: &str = "faq-close";
pub const FAQ_SEARCH_ID: &str = "faq-search";
pub const FAQ_CHIPS_ID: &str = "faq-chips";
pub const FAQ_LIST_ID: &str = "faq-list";

/// Floating FAQ panel. Picking an entry hands its question to `on_pick`.
#[component]
pub fn FaqPanel(index: FaqIndex, on_pick: EventHandler<String>) -> Element {
    let mut open = use_signal(|| false);
    let mut query = use_signal(String::new);
    let mut active_tag = use_signal(|| Option::<String>::None);

    let tags = index.tags();
    let selected = active_tag();
    let items = index.view(selected.as_deref(), &query());

    rsx! {
        button {
            id: FAQ_TOGGLE_ID,
            class: "btn faq-toggle",
            r#type: "button",
            aria_expanded: open().to_string(),
            onclick: move |_| open.set(!open()),
            "FAQ"
        }
        if open() {
            div { id: FAQ_PANEL_ID, class: "faq-panel", role: "dialog",
                div { class: "faq-panel-header",
                    strong { "Frequently asked questions" }
                    button {
                        id: FAQ_CLOSE_ID,
                        class: "btn-ghost",
                        r#type: "button",
                        aria_label: "Close FAQ",
                        onclick: move |_| open.set(false),
                        dangerous_inner_html: "&times;"
                    }
                }
                input {
                    id: FAQ_SEARCH_ID,
                    class: "faq-search",
                    r#type: "search",
                    placeholder: "Search questions",
                    value: "{query}",
                    oninput: move |ev| query.set(ev.value()),
                }
                div { id: FAQ_CHIPS_ID, class: "faq-chips",
                    button {
                        class: format_args!("faq-chip {}", if selected.is_none() { "active" } else { "" }),
                        r#type: "button",
                        onclick: move |_| active_tag.set(None),
                        "All"
                    }
                    for tag in tags.into_iter() {
                        button {
                            key: "{tag}",
                            class: format_args!(
                                "faq-chip {}",
                                if selected.as_deref() == Some(tag.as_str()) { "active" } else { "" }
                            ),
                            r#type: "button",
                            onclick: {
                                let tag = tag.clone();
                                move |_| active_tag.set(Some(tag.clone()))
                            },
                            "{tag}"
                        }
                    }
                }
                div { id: FAQ_LIST_ID, class: "faq-list",
                    if items.is_empty() {
                        p { class: "faq-empty", "No matching questions." }
                    } else {
                        for (i, item) in items.into_iter().enumerate() {
                            details { key: "{i}-{item.id}", class: "faq-item",
                                summary { "{item.question}" }
                                if !item.answer.is_empty() {
                                    p { class: "faq-answer", "{item.answer}" }
                                }
                                if !item.question.is_empty() {
                                    button {
                                        class: "btn faq-ask",
                                        r#type: "button",
                                        onclick: {
                                            let question = item.question.clone();
                                            move |_| on_pick.call(question.clone())
                                        },
                                        "Ask this"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
