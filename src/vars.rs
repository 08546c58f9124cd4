//! Named string variables shared across messages.

use crate::error::Error;
use std::collections::HashMap;

/// Read/write access to variables by name.
pub trait VarStore {
    /// Fails with [`Error::MissingVariable`] when `name` is unset.
    fn get(&self, name: &str) -> Result<&str, Error>;
    fn set(&mut self, name: &str, value: String);
    fn delete(&mut self, name: &str);
}

/// The process-wide variable store, held by the [`Stage`](crate::Stage).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalVars {
    vars: HashMap<String, String>,
}

impl GlobalVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl VarStore for GlobalVars {
    fn get(&self, name: &str) -> Result<&str, Error> {
        self.vars
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingVariable(name.to_owned()))
    }

    fn set(&mut self, name: &str, value: String) {
        self.vars.insert(name.to_owned(), value);
    }

    fn delete(&mut self, name: &str) {
        self.vars.remove(name);
    }
}
