//! Error types for the `Proxide` runtime.
//!
//! Errors fall into the categories reported by [`Error::kind`]:
//!
//! - **Configuration** errors are raised while a proxy is being created and
//!   never at call time.
//! - **Argument** and **return** mismatches surface from the one call that
//!   produced them.
//! - **Invocation** errors cover everything else a single call can fail with,
//!   including failures raised by user targets and handlers.
//! - **Internal** errors indicate a runtime defect.

use crate::runtime::Visibility;
use thiserror::Error;

/// Errors that can occur in the `Proxide` runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A proxy was requested without any interface.
    #[error("A proxy must implement at least one interface")]
    NoInterfaces,

    /// A requested contract is not interface-shaped.
    #[error("{interface} is not an interface type")]
    NotAnInterface {
        /// Qualified name of the offending contract.
        interface: String,
    },

    /// A requested contract is not externally visible.
    #[error("{interface} is not public (declared {visibility})")]
    NotVisible {
        /// Qualified name of the offending contract.
        interface: String,
        /// The declared visibility.
        visibility: Visibility,
    },

    /// The bound target does not conform to a requested interface.
    #[error("Target does not implement interface {interface}")]
    TargetInterfaceMismatch {
        /// Qualified name of the first interface the target lacks.
        interface: String,
    },

    /// An argument was replaced with a value of the wrong type.
    #[error(
        "Argument type mismatch for {method} at index {index}: expected '{expected}', got '{got}'"
    )]
    ArgumentTypeMismatch {
        /// The invoked method.
        method: String,
        /// Argument index.
        index: usize,
        /// Declared parameter type.
        expected: &'static str,
        /// Runtime type of the supplied value.
        got: &'static str,
    },

    /// Argument count mismatch for a method signature.
    #[error("Argument count mismatch for {method}: expected {expected}, got {got}")]
    ArgumentCountMismatch {
        /// The invoked method.
        method: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of arguments supplied.
        got: usize,
    },

    /// Argument index outside the captured argument sequence.
    #[error("Argument index {index} out of range for {method} ({len} arguments)")]
    ArgumentIndexOutOfRange {
        /// The invoked method.
        method: String,
        /// Requested index.
        index: usize,
        /// Number of captured arguments.
        len: usize,
    },

    /// The value placed in the result slot has the wrong type.
    #[error("Invalid return type for {method}: expected '{expected}', got '{got}'")]
    InvalidReturnType {
        /// The invoked method.
        method: String,
        /// Declared return type.
        expected: &'static str,
        /// Runtime type of the captured value.
        got: &'static str,
    },

    /// A non-void call finished without anything in its result slot.
    #[error("No result was produced for {method}")]
    MissingResult {
        /// The invoked method.
        method: String,
    },

    /// No overload of the same arity accepts the supplied argument types.
    #[error("No overload of {method} accepts ({arguments})")]
    NoMatchingOverload {
        /// The invoked method name.
        method: String,
        /// Runtime types of the supplied arguments.
        arguments: String,
    },

    /// Several overloads accept the supplied argument types.
    #[error("Call to {method} is ambiguous between {candidates} overloads")]
    AmbiguousOverload {
        /// The invoked method name.
        method: String,
        /// Number of matching overloads.
        candidates: usize,
    },

    /// The proxy was not created for the interface declaring this method.
    #[error("Method {interface}::{method} is not implemented by this proxy")]
    MethodNotProxied {
        /// Interface name.
        interface: String,
        /// Method name.
        method: String,
    },

    /// The interface declares no method with this name.
    #[error("Interface {interface} has no method named '{method}'")]
    MethodNotFound {
        /// Interface name.
        interface: String,
        /// Method name.
        method: String,
    },

    /// `proceed` was requested but no target is bound.
    #[error("No target is bound for {method}")]
    NoTarget {
        /// The invoked method.
        method: String,
    },

    /// A generic method was forwarded without static type arguments.
    #[error("Generic method {method} cannot be forwarded without closed type arguments")]
    OpenGenericMethod {
        /// The invoked method.
        method: String,
    },

    /// Failure raised by a target, handler or interceptor.
    #[error("{0}")]
    Custom(String),

    /// Runtime invariant violated.
    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

/// Categories of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raised synchronously at proxy creation time.
    Configuration,
    /// An argument could not be converted to its parameter type.
    ArgumentTypeMismatch,
    /// A result could not be converted to the declared return type.
    InvalidReturnType,
    /// Any other failure of a single call.
    Invocation,
    /// Runtime defect.
    Internal,
}

impl Error {
    /// Creates an error carrying a user-supplied message.
    pub fn custom(message: impl std::fmt::Display) -> Self {
        Error::Custom(message.to_string())
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::NoInterfaces
            | Error::NotAnInterface { .. }
            | Error::NotVisible { .. }
            | Error::TargetInterfaceMismatch { .. } => ErrorKind::Configuration,
            Error::ArgumentTypeMismatch { .. } => ErrorKind::ArgumentTypeMismatch,
            Error::InvalidReturnType { .. } => ErrorKind::InvalidReturnType,
            Error::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::Invocation,
        }
    }
}

/// Result type for `Proxide` runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::NotAnInterface {
                interface: "app::Thing".into()
            }
            .to_string(),
            "app::Thing is not an interface type"
        );
        assert_eq!(
            Error::ArgumentTypeMismatch {
                method: "IFoo::foo".into(),
                index: 1,
                expected: "i32",
                got: "alloc::string::String",
            }
            .to_string(),
            "Argument type mismatch for IFoo::foo at index 1: expected 'i32', got 'alloc::string::String'"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::NoInterfaces.kind(), ErrorKind::Configuration);
        assert_eq!(
            Error::TargetInterfaceMismatch {
                interface: "IOne".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::InvalidReturnType {
                method: "m".into(),
                expected: "i32",
                got: "u8"
            }
            .kind(),
            ErrorKind::InvalidReturnType
        );
        assert_eq!(Error::custom("boom").kind(), ErrorKind::Invocation);
        assert_eq!(Error::Internal("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_custom_message() {
        assert_eq!(Error::custom("target failed").to_string(), "target failed");
    }
}
