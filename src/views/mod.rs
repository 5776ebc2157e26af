pub mod chat;
pub mod faq;

pub use chat::ChatView;
pub use faq::FaqPanel;
