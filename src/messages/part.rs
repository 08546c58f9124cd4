//! [`MessagePart`]: one typing step of a [`TextMessage`] and what happens
//! after it.

use crate::messages::TextMessage;
use crate::widget::Context;
use anyhow::Result;
use std::fmt;
use std::time::Duration;

/// Runs right before a part is revealed and may rewrite its text.
pub type BeforeType = Box<dyn FnOnce(&TextMessage, &mut MessagePart, &mut Context<'_>) -> Result<()>>;

/// A single reveal inside a [`TextMessage`].
///
/// Parts are consumed exactly once, front to back.
pub struct MessagePart {
    pub text: String,
    /// `None` uses the typewriter's default delay; zero reveals instantly.
    pub symbol_delay: Option<Duration>,
    /// Append to the revealed text instead of replacing it.
    pub append: bool,
    /// Move to the next part as soon as this one is revealed.
    pub auto_advance: bool,
    /// Capture a line of input into this variable once revealed.
    pub capture_key: Option<String>,
    pub capture_globally: bool,
    /// Leave the captured text on screen after it is confirmed.
    pub keep_captured_text: bool,
    pub(crate) before_type: Option<BeforeType>,
}

impl MessagePart {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            symbol_delay: None,
            append: true,
            auto_advance: false,
            capture_key: None,
            capture_globally: false,
            keep_captured_text: true,
            before_type: None,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.symbol_delay = Some(delay);
        self
    }

    pub fn auto_advance(mut self) -> Self {
        self.auto_advance = true;
        self
    }

    pub fn capture(mut self, key: impl Into<String>) -> Self {
        self.capture_key = Some(key.into());
        self
    }

    /// Store captured input in the global store rather than the message.
    pub fn globally(mut self) -> Self {
        self.capture_globally = true;
        self
    }

    pub fn discard_captured(mut self) -> Self {
        self.keep_captured_text = false;
        self
    }

    /// Clear the revealed text before this part is typed.
    pub fn replace(mut self) -> Self {
        self.append = false;
        self
    }

    pub fn before_type(
        mut self,
        hook: impl FnOnce(&TextMessage, &mut MessagePart, &mut Context<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.before_type = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for MessagePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagePart")
            .field("text", &self.text)
            .field("symbol_delay", &self.symbol_delay)
            .field("append", &self.append)
            .field("auto_advance", &self.auto_advance)
            .field("capture_key", &self.capture_key)
            .field("capture_globally", &self.capture_globally)
            .field("keep_captured_text", &self.keep_captured_text)
            .field("before_type", &self.before_type.is_some())
            .finish()
    }
}
