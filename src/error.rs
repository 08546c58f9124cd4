//! Typed errors the message machinery reports by kind.

/// Errors surfaced by the variable store and propagated through callbacks.
///
/// Everything else in the crate travels as [`anyhow::Error`]; hosts that need
/// to tell a missing variable apart can `downcast_ref::<Error>()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A variable was read before anything stored it.
    #[error("Missing variable: '{0}'")]
    MissingVariable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_message() {
        let err = Error::MissingVariable("name".into());
        assert_eq!(err.to_string(), "Missing variable: 'name'");
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = Error::MissingVariable("name".into()).into();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::MissingVariable("name".into()))
        );
    }
}
