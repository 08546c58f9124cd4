//! [`Say`] directive: reveals a line of text.
//!
//! Script syntax:
//! - `say "Welcome"`: default delay, waits for Enter afterwards
//! - `say "\nNo time to explain" 10ms auto`: custom delay, moves on by itself
//! - `say "Chapter two" 0ms replace`: instant, clears earlier text first

use crate::directive::Directive;
use crate::parser::{parse_duration, split_quoted};
use crate::script::{PartSpec, Script};
use anyhow::{Result, anyhow};
use std::time::Duration;

/// Adds one part to the current text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Say {
    pub text: String,
    pub delay: Option<Duration>,
    pub auto: bool,
    pub replace: bool,
}

impl Say {
    pub const NAME: &'static str = "say";

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: None,
            auto: false,
            replace: false,
        }
    }
}

impl Directive for Say {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (text, options) = split_quoted(args)?;
        let mut say = Self::new(text);
        for option in options.split_whitespace() {
            match option {
                "auto" => say.auto = true,
                "replace" => say.replace = true,
                _ if say.delay.is_none() => {
                    say.delay = Some(
                        parse_duration(option)
                            .map_err(|_| anyhow!("Unknown option for 'say': {}", option))?,
                    )
                }
                _ => return Err(anyhow!("Unknown option for 'say': {}", option)),
            }
        }
        Ok(say)
    }

    fn apply(&self, script: &mut Script) -> Result<()> {
        script.push_part(PartSpec {
            text: self.text.clone(),
            delay: self.delay,
            auto: self.auto,
            replace: self.replace,
            capture: None,
        });
        Ok(())
    }
}
