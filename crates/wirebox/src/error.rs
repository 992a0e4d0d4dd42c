//! Error handling types
//!
//! Two philosophies, kept visibly apart:
//!
//! - [`ResolveError`] is the recoverable taxonomy returned by resolution.
//! - [`InvalidFactorySignature`] is a wiring defect. It is never returned
//!   from registration; the container raises it as a panic so malformed
//!   wiring surfaces immediately during startup and testing.

use crate::key::ContractKey;
use thiserror::Error;

/// Boxed error type carried out of user factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors surfaced by resolving from a container.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No registration exists for the requested contract in this container.
    ///
    /// Fork makes inherited registrations visible by copying them; there is
    /// no dynamic parent fallback afterwards.
    #[error("the contract `{contract}` does not have a resolver in this container")]
    UnregisteredContract {
        /// The contract that was requested
        contract: ContractKey,
    },

    /// The resolution target cannot hold the value registered under the
    /// requested contract.
    ///
    /// Unreachable through the typed API, where the compiler ties target
    /// and registration together. It guards the erased layer: custom
    /// [`ResolveTarget`](crate::target::ResolveTarget) implementations and
    /// dynamically assembled factories whose runtime product does not match
    /// their declared contract.
    #[error("expected a target that accepts the contract `{contract}`, but `{target}` cannot hold the resolved value")]
    InvalidResolutionTarget {
        /// Type name of the rejecting target
        target: &'static str,
        /// The contract that was resolved
        contract: ContractKey,
    },

    /// The user factory reported a failure. The original cause is preserved
    /// as the error source and embedded in the message.
    #[error("di resolve failure: {source}")]
    ResolutionFailed {
        /// The failure returned by the factory
        #[source]
        source: BoxError,
    },
}

impl ResolveError {
    /// Create an unregistered-contract error
    pub fn unregistered(contract: ContractKey) -> Self {
        Self::UnregisteredContract { contract }
    }

    /// Create an invalid-target error for the target type `T`
    pub fn invalid_target<T: 'static>(contract: ContractKey) -> Self {
        Self::InvalidResolutionTarget {
            target: std::any::type_name::<T>(),
            contract,
        }
    }

    /// Wrap a factory failure
    pub fn failure(source: BoxError) -> Self {
        Self::ResolutionFailed { source }
    }
}

/// A factory does not have the required shape.
///
/// The required shape is `fn(&Container) -> Result<T, E>` where `T` is the
/// contract handle the registration is keyed under. The typed registration
/// path proves this at compile time; the erased path checks it when the
/// resolver is built, deterministically and before any factory runs.
#[derive(Error, Debug)]
#[error(
    "expected a factory shaped like `fn(&Container) -> Result<T, E>` producing `{declared}`, but the supplied factory produces `{produced}`"
)]
pub struct InvalidFactorySignature {
    /// The contract the registration was keyed under
    pub declared: ContractKey,
    /// The contract the factory actually produces
    pub produced: ContractKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_failure_message_embeds_cause() {
        let err = ResolveError::failure("an error".into());
        assert_eq!(err.to_string(), "di resolve failure: an error");
    }

    #[test]
    fn unregistered_message_names_the_contract() {
        let err = ResolveError::unregistered(ContractKey::of::<String>());
        assert!(err.to_string().contains("String"));
        assert!(err.to_string().contains("does not have a resolver"));
    }

    #[test]
    fn invalid_signature_names_both_sides() {
        let fault = InvalidFactorySignature {
            declared: ContractKey::of::<String>(),
            produced: ContractKey::of::<u32>(),
        };
        let message = fault.to_string();
        assert!(message.contains("String"));
        assert!(message.contains("u32"));
    }
}
