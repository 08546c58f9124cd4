//! [`Ask`] directive: reveals a question and captures a line of input.
//!
//! Script syntax: `ask "What's your name? " name [global] [discard] [DELAY]`

use crate::directive::Directive;
use crate::parser::{parse_duration, split_quoted};
use crate::script::{Capture, PartSpec, Script};
use anyhow::{Result, anyhow};
use std::time::Duration;

/// Adds a part that waits for input and stores it under `var`.
///
/// Input is stored on the message unless `global` is given. `discard`
/// removes the typed text from the screen once it is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ask {
    pub text: String,
    pub var: String,
    pub global: bool,
    pub discard: bool,
    pub delay: Option<Duration>,
}

impl Ask {
    pub const NAME: &'static str = "ask";
}

impl Directive for Ask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (text, rest) = split_quoted(args)?;
        let mut words = rest.split_whitespace();
        let var = words
            .next()
            .ok_or_else(|| anyhow!("Expected variable name after question"))?;

        let mut ask = Self {
            text,
            var: var.to_owned(),
            global: false,
            discard: false,
            delay: None,
        };
        for option in words {
            match option {
                "global" => ask.global = true,
                "discard" => ask.discard = true,
                _ if ask.delay.is_none() => {
                    ask.delay = Some(
                        parse_duration(option)
                            .map_err(|_| anyhow!("Unknown option for 'ask': {}", option))?,
                    )
                }
                _ => return Err(anyhow!("Unknown option for 'ask': {}", option)),
            }
        }
        Ok(ask)
    }

    fn apply(&self, script: &mut Script) -> Result<()> {
        script.push_part(PartSpec {
            text: self.text.clone(),
            delay: self.delay,
            auto: false,
            replace: false,
            capture: Some(Capture {
                var: self.var.clone(),
                global: self.global,
                keep: !self.discard,
            }),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local() {
        let ask = Ask::parse(r#""Name? " name"#).unwrap();
        assert_eq!(ask.text, "Name? ");
        assert_eq!(ask.var, "name");
        assert!(!ask.global);
        assert!(!ask.discard);
        assert_eq!(ask.delay, None);
    }

    #[test]
    fn test_parse_options() {
        let ask = Ask::parse(r#""Name? " name global discard 20ms"#).unwrap();
        assert!(ask.global);
        assert!(ask.discard);
        assert_eq!(ask.delay, Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_parse_missing_var() {
        assert!(Ask::parse(r#""Name? ""#).is_err());
    }

    #[test]
    fn test_apply_captures() {
        let mut script = Script::new();
        Ask::parse(r#""Name? " name discard"#)
            .unwrap()
            .apply(&mut script)
            .unwrap();
        let crate::script::Block::Text(parts) = &script.blocks()[0] else {
            panic!("expected a text block");
        };
        let capture = parts[0].capture.as_ref().unwrap();
        assert_eq!(capture.var, "name");
        assert!(!capture.keep);
    }
}
