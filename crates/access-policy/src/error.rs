//! Policy error types.
//!
//! Evaluation never fails; these errors only come out of loading policy
//! documents and encoding principals.

use thiserror::Error;

/// Errors from reading and writing policy documents.
///
/// `#[non_exhaustive]`: new document formats may add variants.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A principal would not read back as itself once written out, such as an
    /// empty group list or an entry containing a comma.
    #[error("cannot encode principal: {0}")]
    Invalid(String),

    /// The TOML document is malformed or misses a required statement field.
    #[error("malformed policy document: {0}")]
    Parse(String),

    /// The policy file could not be read.
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Principal;

    #[test]
    fn test_messages_name_the_failing_step() {
        let none: [&str; 0] = [];
        let err = Principal::groups(none).encode().unwrap_err();
        assert!(err.to_string().starts_with("cannot encode principal: "));

        let err = Error::Parse("expected `=`".into());
        assert_eq!(err.to_string(), "malformed policy document: expected `=`");

        let err = Error::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("failed to read policy file: "));
    }
}
