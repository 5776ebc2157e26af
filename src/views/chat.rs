use crate::chat::{ChatTransport, HttpTransport, SendController};
use crate::config::WidgetConfig;
use crate::history::HistoryStore;
use crate::render::{
    self, Bubble, CHAT_BOX_ID, INPUT_ID, SEND_BUTTON_ID, TYPING_ID, TYPING_TEXT,
};
use crate::storage::platform_store;
use crate::views::FaqPanel;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::rc::Rc;

fn scroll_to_bottom() {
    let _ = document::eval(&render::scroll_to_bottom_script(CHAT_BOX_ID));
}

fn focus_input() {
    let _ = document::eval(&render::focus_script(INPUT_ID));
}

#[component]
pub fn ChatView(config: WidgetConfig) -> Element {
    let send_settings = config.send.clone();
    let controller = use_signal(move || {
        SendController::new(HistoryStore::new(platform_store()), send_settings)
    });
    let transport = use_signal(|| Rc::new(HttpTransport::new()) as Rc<dyn ChatTransport>);
    let mut input = use_signal(String::new);
    let faq_autosend = config.faq_autosend;

    use_effect(move || {
        controller.with(|chat| (chat.messages().len(), chat.is_sending()));
        scroll_to_bottom();
    });

    let mut send_message = {
        let mut controller = controller;
        let mut input_signal = input;
        move |text: String| {
            let started = controller.write().begin(&text);
            let pending = match started {
                Ok(pending) => pending,
                Err(err) => {
                    tracing::debug!(%err, "send ignored");
                    return;
                }
            };
            input_signal.set(String::new());

            let transport = transport.read().clone();
            spawn(async move {
                let outcome = pending.dispatch(transport.as_ref()).await;
                controller.write().complete(outcome);
                focus_input();
            });
        }
    };

    let (bubbles, sending) = controller.with(|chat| {
        let bubbles: Vec<Bubble> = if chat.messages().is_empty() {
            vec![Bubble::greeting()]
        } else {
            chat.messages().iter().map(render::render).collect()
        };
        (bubbles, chat.is_sending())
    });

    rsx! {
        div { class: "chat-widget",
            div { id: CHAT_BOX_ID, class: "chat-box",
                for (i, bubble) in bubbles.into_iter().enumerate() {
                    div { key: "{i}", class: bubble.class,
                        span { class: "bubble-text", dangerous_inner_html: "{bubble.html}" }
                        if let Some(time) = bubble.time.as_ref() {
                            span { class: "bubble-time", "{time}" }
                        }
                    }
                }
                if sending {
                    div { id: TYPING_ID, class: "bubble bot typing", "{TYPING_TEXT}" }
                }
            }

            div { class: "composer",
                input {
                    id: INPUT_ID,
                    r#type: "text",
                    placeholder: "Type your question…",
                    autocomplete: "off",
                    value: "{input}",
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter {
                            ev.prevent_default();
                            send_message(input());
                        }
                    },
                    autofocus: true,
                }
                button {
                    id: SEND_BUTTON_ID,
                    class: "btn",
                    r#type: "button",
                    disabled: sending,
                    onclick: move |_| send_message(input()),
                    "Send"
                }
            }

            if !config.faq.is_empty() {
                FaqPanel {
                    index: config.faq.clone(),
                    on_pick: move |question: String| {
                        input.set(question.clone());
                        if faq_autosend {
                            send_message(question);
                        } else {
                            focus_input();
                        }
                    },
                }
            }
        }
    }
}
