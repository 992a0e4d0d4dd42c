//! Validated factory wrapper
//!
//! A [`Resolver`] pairs an erased factory with the contract key it is
//! registered under. Construction is the validation point: the typed path
//! cannot fail (the compiler already proved the shape), and the erased path
//! verifies the factory's produced-contract tag against the registration
//! key. After construction a resolver is immutable.

use crate::container::Container;
use crate::error::{InvalidFactorySignature, ResolveError};
use crate::factory::{ContractValue, ErasedFactory, Factory};
use crate::key::ContractKey;
use std::fmt;

/// Validated, immutable wrapper around a user factory.
pub struct Resolver {
    contract: ContractKey,
    factory: ErasedFactory,
}

impl Resolver {
    /// Wrap a compile-checked factory. Infallible: the factory's shape and
    /// produced contract were verified by the compiler.
    pub fn new<F: Factory>(factory: F) -> Self {
        let factory = ErasedFactory::of(factory);
        Self {
            contract: factory.produces(),
            factory,
        }
    }

    /// Wrap an erased factory for registration under `contract`.
    ///
    /// Fails when the factory's produced-contract tag disagrees with the
    /// registration key. The check is deterministic and happens before the
    /// factory ever runs.
    pub fn from_erased(
        contract: ContractKey,
        factory: ErasedFactory,
    ) -> Result<Self, InvalidFactorySignature> {
        if factory.produces() != contract {
            return Err(InvalidFactorySignature {
                declared: contract,
                produced: factory.produces(),
            });
        }
        Ok(Self { contract, factory })
    }

    /// The contract this resolver produces. Always equal to the key its
    /// enclosing scope is stored under.
    pub fn contract(&self) -> ContractKey {
        self.contract
    }

    /// Invoke the factory with `container`.
    ///
    /// A factory failure is wrapped so callers can tell a DI-layer failure
    /// apart from their own errors; the original cause is kept as the
    /// source. The factory may legitimately call back into
    /// `container.resolve` for its own dependencies.
    pub fn resolve(&self, container: &Container) -> Result<ContractValue, ResolveError> {
        self.factory
            .invoke(container)
            .map_err(ResolveError::failure)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resolver({})", self.contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::sync::Arc;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct Hello;
    impl Greeter for Hello {
        fn greet(&self) -> String {
            "Hello, World!".into()
        }
    }

    #[test]
    fn typed_resolver_records_the_contract() {
        let resolver = Resolver::new(|_: &Container| {
            Ok::<_, BoxError>(Arc::new(Hello) as Arc<dyn Greeter>)
        });
        assert_eq!(resolver.contract(), ContractKey::of::<Arc<dyn Greeter>>());
    }

    #[test]
    fn factory_failure_is_wrapped_with_the_di_prefix() {
        let resolver = Resolver::new(|_: &Container| {
            Err::<Arc<dyn Greeter>, BoxError>("an error".into())
        });
        let err = resolver.resolve(&Container::new()).unwrap_err();
        assert_eq!(err.to_string(), "di resolve failure: an error");
    }

    #[test]
    fn factory_success_passes_the_value_through() {
        let resolver = Resolver::new(|_: &Container| {
            Ok::<_, BoxError>(Arc::new(Hello) as Arc<dyn Greeter>)
        });
        let value = resolver.resolve(&Container::new()).unwrap();
        let greeter = value.extract::<Arc<dyn Greeter>>().unwrap();
        assert_eq!(greeter.greet(), "Hello, World!");
    }

    #[test]
    fn erased_resolver_rejects_a_mismatched_contract() {
        let factory = ErasedFactory::of(|_: &Container| {
            Ok::<_, BoxError>(Arc::new(Hello) as Arc<dyn Greeter>)
        });
        let fault = Resolver::from_erased(ContractKey::of::<Arc<String>>(), factory).unwrap_err();
        assert_eq!(fault.produced, ContractKey::of::<Arc<dyn Greeter>>());
        assert_eq!(fault.declared, ContractKey::of::<Arc<String>>());
    }

    #[test]
    fn erased_resolver_accepts_a_matching_contract() {
        let factory = ErasedFactory::of(|_: &Container| {
            Ok::<_, BoxError>(Arc::new(Hello) as Arc<dyn Greeter>)
        });
        let resolver =
            Resolver::from_erased(ContractKey::of::<Arc<dyn Greeter>>(), factory).unwrap();
        assert_eq!(resolver.contract(), ContractKey::of::<Arc<dyn Greeter>>());
    }
}
