//! # Typelog
//!
//! Typewriter-style text reveals and scripted message logs for interactive
//! terminals.
//!
//! A [`MessageLog`] is a vertical list of messages where only the newest one
//! reacts to keys. A [`TextMessage`] reveals its parts through a
//! [`Typewriter`], waits for the advance key between parts, and can capture a
//! line of input into a variable. A [`ButtonMessage`] offers a set of options.
//! Completion and activation callbacks append the next message, which is how
//! a dialogue moves forward.
//!
//! ## Quick start
//!
//! ```no_run
//! use typelog::{Stage, TerminalSession, TypewriterConfig, parse_str};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let script = parse_str(r#"
//! ask "What's your name? " name global
//! say "\nHello {name}"
//! "#)?;
//!
//!     let mut stage = Stage::new();
//!     let mut terminal = TerminalSession::enter()?;
//!     stage.start_boxed(script.into_message(TypewriterConfig::default())?)?;
//!     stage.run(&mut terminal).await
//! }
//! ```
//!
//! ## Without a terminal
//!
//! [`Stage`] also runs headless: feed it keys with [`Stage::press`] and fire
//! timers with [`Stage::fire_next`] or [`Stage::run_until_idle`].
//!
//! ```
//! use std::time::Duration;
//! use typelog::{Key, MessagePart, Stage, TextMessage};
//!
//! let mut stage = Stage::new();
//! stage.start(TextMessage::new([
//!     MessagePart::new("Hello").delay(Duration::from_millis(20)),
//! ])).unwrap();
//! stage.press(Key::ADVANCE).unwrap();
//! assert_eq!(stage.render()[0], "Hello");
//! ```
//!
//! ## Script syntax
//!
//! | Directive | Description |
//! |-----------|-------------|
//! | `say "text"` | Add a part to the current message |
//! | `say "text" 50ms auto` | Per-symbol delay; `auto` moves on without a prompt; `replace` clears the text first |
//! | `ask "prompt" VAR [global] [discard] [delay]` | Reveal a prompt, then capture a line of input into `VAR` |
//! | `end` | Close the current message; the next part starts a new one |
//! | `choice VAR "a" "b"` | Show buttons; the activated label is stored in global `VAR` |
//! | `# comment` | Full-line or inline comment |
//!
//! `{NAME}` inside a text is replaced right before it is revealed, looking at
//! the message's own captured input first and the global variables second.

pub mod directive;
pub mod directives;
pub mod error;
pub mod event;
pub(crate) mod input_reader;
pub mod key;
pub mod message_log;
pub mod messages;
pub mod parser;
pub mod scheduler;
pub mod script;
pub mod signal;
pub mod stage;
pub mod terminal;
pub mod typewriter;
pub mod vars;
pub mod widget;

pub use directive::Directive;
pub use error::Error;
pub use event::TypewriterEvent;
pub use key::Key;
pub use message_log::MessageLog;
pub use messages::{ButtonMessage, ButtonOption, CONTINUE_PROMPT, MessagePart, TextMessage, TextState};
pub use parser::{parse_duration, parse_file, parse_str};
pub use scheduler::{ScheduleHandle, Scheduler, TimerQueue};
pub use script::{DEMO_SCRIPT, Script};
pub use signal::Signal;
pub use stage::Stage;
pub use terminal::TerminalSession;
pub use typewriter::{DEFAULT_TYPING_DELAY, InputMode, Typewriter, TypewriterConfig};
pub use vars::{GlobalVars, VarStore};
pub use widget::{Context, Message, Redraw, RedrawFlag, Widget};
