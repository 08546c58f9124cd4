mod button;
mod part;
mod text;

pub use button::{ButtonMessage, ButtonOption, OnActivate};
pub use part::{BeforeType, MessagePart};
pub use text::{CONTINUE_PROMPT, OnComplete, TextMessage, TextState};
