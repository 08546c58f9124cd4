//! [`Choice`] directive: offers a set of buttons.
//!
//! Script syntax: `choice selected "Yes" "No"`

use crate::directive::Directive;
use crate::parser::split_quoted;
use crate::script::Script;
use anyhow::{Result, anyhow};

/// A button message. The activated label is stored in global `var` and the
/// dialogue continues with the next message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub var: String,
    pub labels: Vec<String>,
}

impl Choice {
    pub const NAME: &'static str = "choice";
}

impl Directive for Choice {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(args: &str) -> Result<Self> {
        let (var, mut rest) = args
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("Expected a variable name and at least one label"))?;

        let mut labels = Vec::new();
        while !rest.trim().is_empty() {
            let (label, remainder) = split_quoted(rest)?;
            labels.push(label);
            rest = remainder;
        }
        if labels.is_empty() {
            return Err(anyhow!("Expected at least one label"));
        }

        Ok(Self {
            var: var.to_owned(),
            labels,
        })
    }

    fn apply(&self, script: &mut Script) -> Result<()> {
        script.push_choice(self.var.clone(), self.labels.clone());
        Ok(())
    }
}
