use crate::{Descriptor, Value};
use std::fmt;
use thiserror::Error;

/// Crate wide result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Conversion failures.
///
/// The three conversion kinds are kept distinct as callers observe the difference: a missing
/// handler ([`Error::CannotConvert`]) is a registration problem, a rejected input
/// ([`Error::ShapeMismatch`]) is a data problem, and [`Error::AmbiguousKey`] is a registry that
/// can not decide between two handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No registered handler applies, or every alternative of a union failed.
    #[error("{0}")]
    CannotConvert(String),
    /// A handler applied but the input does not have the structure it requires.
    #[error("{0}")]
    ShapeMismatch(String),
    /// Two or more equally specific registrations matched the lookup subject.
    #[error("{subject} matches more than one registration: {}", .keys.join(", "))]
    AmbiguousKey {
        /// The value or descriptor being looked up.
        subject: String,
        /// The matching registration keys.
        keys: Vec<String>,
    },
    /// A wire codec failed to produce or read its serialized form.
    #[error("codec error: {0}")]
    Codec(String),
}

impl Error {
    /// No serialization handler for the type of `value`.
    pub fn cannot_serialize(value: &Value) -> Self {
        Error::CannotConvert(format!("cannot serialize type {}", value.type_name()))
    }

    /// No deserialization handler for `target`.
    pub fn cannot_deserialize(target: &Descriptor) -> Self {
        Error::CannotConvert(format!("cannot deserialize to type {}", target))
    }

    /// Every alternative of the union `target` rejected `value`.
    pub fn no_alternative(value: &Value, target: &Descriptor) -> Self {
        Error::CannotConvert(format!("cannot deserialize {} as {}", value, target))
    }

    /// `value` can not be read as `target`, for the given `reason`.
    pub fn mismatch<R: fmt::Display>(value: &Value, target: &Descriptor, reason: R) -> Self {
        Error::ShapeMismatch(format!(
            "cannot deserialize {} as {}: {}",
            value, target, reason
        ))
    }

    /// Build an ambiguity error from the lookup subject and the matching keys.
    pub fn ambiguous<S, K, I>(subject: S, keys: I) -> Self
    where
        S: fmt::Display,
        K: fmt::Display,
        I: IntoIterator<Item = K>,
    {
        Error::AmbiguousKey {
            subject: subject.to_string(),
            keys: keys.into_iter().map(|k| k.to_string()).collect(),
        }
    }

    /// The error is a [`Error::ShapeMismatch`] or [`Error::CannotConvert`], the kinds a union
    /// tries the next alternative on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::CannotConvert(_) | Error::ShapeMismatch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let e = Error::cannot_serialize(&Value::Bytes(vec![1]));
        assert_eq!(e.to_string(), "cannot serialize type bytes");

        let e = Error::cannot_deserialize(&Descriptor::list_of(Descriptor::INT));
        assert_eq!(e.to_string(), "cannot deserialize to type List[int]");

        let e = Error::mismatch(&Value::from(1.5), &Descriptor::INT, "lossy");
        assert_eq!(e.to_string(), "cannot deserialize 1.5 as int: lossy");

        let e = Error::ambiguous(2, ["{1, 2}", "{2, 3}"]);
        assert_eq!(e.to_string(), "2 matches more than one registration: {1, 2}, {2, 3}");
    }

    #[test]
    fn recoverable_kinds() {
        assert!(Error::CannotConvert(String::new()).is_recoverable());
        assert!(Error::ShapeMismatch(String::new()).is_recoverable());
        assert!(!Error::ambiguous("x", ["a", "b"]).is_recoverable());
        assert!(!Error::Codec(String::new()).is_recoverable());
    }
}
