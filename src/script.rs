//! Linear dialogues built from parsed directives.
//!
//! A [`Script`] is a list of [`Block`]s. Each block becomes one message when
//! its turn comes: the completion callback of a text message, or the
//! activation callback of a choice, appends the message for the next block.

use crate::error::Error;
use crate::messages::{ButtonMessage, ButtonOption, MessagePart, TextMessage};
use crate::typewriter::TypewriterConfig;
use crate::widget::Message;
use anyhow::{Result, anyhow};
use std::rc::Rc;
use std::time::Duration;

/// The dialogue `typelog` plays when no script is given.
pub const DEMO_SCRIPT: &str = r#"# typelog demo
say "Welcome" 100ms
say "\nNo time to explain" 10ms auto
say "\nThis one doesn't get typed" 0ms
ask "\nWhat's your name?\n" name global
say "\nHello {name}"
end

say "Select an option" auto
choice selected "1" "2" "3"

say "Selected option {selected}"
end

say "End of demo" auto
say "\nGoodbye {name}" 0ms auto
"#;

/// Where a part stores the line of input it captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub var: String,
    pub global: bool,
    pub keep: bool,
}

/// A part as written in a script. `{NAME}` references in `text` are resolved
/// right before the part is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSpec {
    pub text: String,
    pub delay: Option<Duration>,
    pub auto: bool,
    pub replace: bool,
    pub capture: Option<Capture>,
}

impl PartSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: None,
            auto: false,
            replace: false,
            capture: None,
        }
    }

    fn to_part(&self) -> MessagePart {
        let mut part = MessagePart::new(self.text.clone());
        part.symbol_delay = self.delay;
        part.auto_advance = self.auto;
        part.append = !self.replace;
        if let Some(capture) = &self.capture {
            part.capture_key = Some(capture.var.clone());
            part.capture_globally = capture.global;
            part.keep_captured_text = capture.keep;
        }
        if self.text.contains('{') {
            part = part.before_type(|message, part, ctx| {
                part.text = interpolate(&part.text, |name| {
                    match message.local_var(name) {
                        Some(value) => Ok(value.to_owned()),
                        None => ctx.vars().get(name).map(str::to_owned),
                    }
                })?;
                Ok(())
            });
        }
        part
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(Vec<PartSpec>),
    /// Buttons labelled `labels`; the activated label is stored in global `var`.
    Choice { var: String, labels: Vec<String> },
}

/// A parsed dialogue.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Script {
    blocks: Vec<Block>,
    open: bool,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Add a part to the open text message, opening one if needed.
    pub fn push_part(&mut self, part: PartSpec) {
        if let (true, Some(Block::Text(parts))) = (self.open, self.blocks.last_mut()) {
            parts.push(part);
            return;
        }
        self.blocks.push(Block::Text(vec![part]));
        self.open = true;
    }

    /// Close the open text message. The next part starts a new one.
    pub fn end_message(&mut self) {
        self.open = false;
    }

    pub fn push_choice(&mut self, var: impl Into<String>, labels: Vec<String>) {
        self.end_message();
        self.blocks.push(Block::Choice {
            var: var.into(),
            labels,
        });
    }

    /// Close the script, rejecting one that would show nothing.
    pub fn finish(mut self) -> Result<Self> {
        self.end_message();
        if self.blocks.is_empty() {
            return Err(anyhow!("Script contains no messages"));
        }
        Ok(self)
    }

    /// Build the first message. Later ones are built as the dialogue reaches
    /// them.
    pub fn into_message(self, config: TypewriterConfig) -> Result<Box<dyn Message>> {
        let chain = Rc::new(Chain {
            blocks: self.blocks,
            config,
        });
        build(&chain, 0).ok_or_else(|| anyhow!("Script contains no messages"))
    }
}

struct Chain {
    blocks: Vec<Block>,
    config: TypewriterConfig,
}

fn build(chain: &Rc<Chain>, index: usize) -> Option<Box<dyn Message>> {
    let message: Box<dyn Message> = match chain.blocks.get(index)? {
        Block::Text(parts) => {
            let next = Rc::clone(chain);
            let message = TextMessage::with_config(parts.iter().map(PartSpec::to_part), chain.config)
                .on_complete(move |_, ctx| {
                    if let Some(message) = build(&next, index + 1) {
                        ctx.append_boxed(message);
                    }
                    Ok(())
                });
            Box::new(message)
        }
        Block::Choice { var, labels } => {
            let options = labels.iter().map(|label| {
                let next = Rc::clone(chain);
                let var = var.clone();
                ButtonOption::new(label.clone(), move |_, option, ctx| {
                    ctx.vars_mut().set(&var, option.label().to_owned());
                    if let Some(message) = build(&next, index + 1) {
                        ctx.append_boxed(message);
                    }
                    Ok(())
                })
            });
            Box::new(ButtonMessage::new(options))
        }
    };
    Some(message)
}

/// Replace every `{NAME}` in `template` with `lookup(NAME)`.
///
/// Braces that do not enclose a plain name (letters, digits, `_`, `-`) are
/// kept as written.
pub fn interpolate(
    template: &str,
    mut lookup: impl FnMut(&str) -> Result<String, Error>,
) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_var_name(&after[..close]) => {
                out.push_str(&lookup(&after[..close])?);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
