//! The [`Directive`] trait implemented by every script keyword.

use crate::script::Script;
use anyhow::Result;

/// A single line of a dialogue script.
///
/// Implement this trait to add a new keyword. Then:
///
/// 1. Define `pub const NAME: &'static str` on your struct. It is the script
///    keyword (e.g. `"say"`, `"ask"`) used by the parser.
/// 2. Re-export the struct from `src/directives/mod.rs`.
/// 3. Add one entry to the `REGISTRY` in [`crate::parser`]:
///    `(MyDirective::NAME, MyDirective::parse_boxed)`.
pub trait Directive: 'static {
    /// The keyword, accessible at runtime through a trait object.
    ///
    /// Implementations should return their `NAME` constant:
    /// `fn name(&self) -> &'static str { Self::NAME }`.
    fn name(&self) -> &'static str;

    /// Parse this directive from the argument string (everything after the
    /// keyword on the script line).
    fn parse(args: &str) -> Result<Self>
    where
        Self: Sized;

    /// Parse and box this directive. Used as the function-pointer type stored
    /// in the registry.
    fn parse_boxed(args: &str) -> Result<Box<dyn Directive>>
    where
        Self: Sized,
    {
        Ok(Box::new(Self::parse(args)?))
    }

    /// Add what this directive describes to `script`.
    fn apply(&self, script: &mut Script) -> Result<()>;
}
