/// Notifications a [`Typewriter`](crate::Typewriter) emits while revealing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypewriterEvent {
    /// One revealed unit: a single symbol, a skipped remainder, or a whole
    /// zero-delay string.
    FragmentTyped(String),

    /// The reveal started by the last `type_text` call is complete.
    FinishedTyping,
}

impl TypewriterEvent {
    /// Create a FragmentTyped event from a string
    pub fn fragment(text: impl Into<String>) -> Self {
        TypewriterEvent::FragmentTyped(text.into())
    }

    /// The revealed text, if this is a fragment.
    pub fn as_fragment(&self) -> Option<&str> {
        match self {
            TypewriterEvent::FragmentTyped(text) => Some(text),
            TypewriterEvent::FinishedTyping => None,
        }
    }
}
