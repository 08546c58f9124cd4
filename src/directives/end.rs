//! [`End`] directive: closes the current text message.
//!
//! Script syntax: `end`

use crate::directive::Directive;
use crate::script::Script;
use anyhow::{Result, anyhow};

/// Ends the current text message; the next part starts a new one, appended
/// once this one completes.
pub struct End;

impl End {
    pub const NAME: &'static str = "end";
}

impl Directive for End {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        if !args.trim().is_empty() {
            return Err(anyhow!("'end' takes no arguments, got: {}", args.trim()));
        }
        Ok(Self)
    }

    fn apply(&self, script: &mut Script) -> Result<()> {
        script.end_message();
        Ok(())
    }
}
