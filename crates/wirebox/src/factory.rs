//! User factories and their type-erased form
//!
//! A factory has one fixed shape: it takes the container (so it may resolve
//! its own dependencies) and returns exactly one of a contract handle or a
//! failure. The typed [`Factory`] trait lets the compiler prove that shape;
//! [`ErasedFactory`] is the runtime form the registry stores, carrying the
//! key of the contract it produces so the shape check survives erasure.
//!
//! ```text
//! closure `fn(&Container) -> Result<T, E>`
//!        │  blanket impl
//!        ▼
//!    Factory (Contract = T)
//!        │  ErasedFactory::of
//!        ▼
//!    ErasedFactory { produces: ContractKey::of::<T>(), call }
//! ```

use crate::container::Container;
use crate::error::BoxError;
use crate::key::ContractKey;
use std::any::Any;
use std::fmt;

/// A construction recipe for one contract.
///
/// Implemented for every closure of the required shape, so ordinary wiring
/// code never implements this by hand:
///
/// ```rust,ignore
/// container.register(Lifetime::Singleton, |c: &Container| {
///     let greeter: Arc<dyn Greeter> = c.resolve()?;
///     Ok::<_, BoxError>(Arc::new(GreetingService::new(greeter)) as Arc<dyn Greeting>)
/// });
/// ```
pub trait Factory: Send + Sync + 'static {
    /// The contract handle this factory produces, idiomatically
    /// `Arc<dyn Trait>`.
    type Contract: Clone + Send + Sync + 'static;

    /// Run the factory. Exactly one of the value or the failure is
    /// meaningful; on failure the value does not exist.
    fn produce(&self, container: &Container) -> Result<Self::Contract, BoxError>;
}

impl<F, T, E> Factory for F
where
    F: Fn(&Container) -> Result<T, E> + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    E: Into<BoxError>,
{
    type Contract = T;

    fn produce(&self, container: &Container) -> Result<T, BoxError> {
        self(container).map_err(Into::into)
    }
}

/// Clonable type-erased contract value.
///
/// This is what flows through the erased resolution path and what a caching
/// scope stores. Cloning clones the underlying handle, which for the
/// idiomatic `Arc<dyn Trait>` contracts is a reference-count bump, so a
/// cached value handed to many callers stays one shared instance.
pub struct ContractValue(Box<dyn ErasedValue>);

impl ContractValue {
    /// Erase a contract handle.
    pub fn new<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Recover the handle as `T`, or `None` if the value is of a different
    /// type than the caller expects.
    pub fn extract<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.0.as_any().downcast_ref::<T>().cloned()
    }
}

impl Clone for ContractValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl fmt::Debug for ContractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContractValue(..)")
    }
}

trait ErasedValue: Send + Sync {
    fn clone_boxed(&self) -> Box<dyn ErasedValue>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Clone + Send + Sync + 'static> ErasedValue for T {
    fn clone_boxed(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-erased factory, tagged with the contract it produces.
///
/// The tag is what keeps the original registration-time shape check alive
/// after erasure: building a resolver compares the tag against the
/// registration key and rejects a mismatch before any factory ever runs.
pub struct ErasedFactory {
    produces: ContractKey,
    call: ErasedCall,
}

/// The boxed closure form an erased factory runs.
pub type ErasedCall = Box<dyn Fn(&Container) -> Result<ContractValue, BoxError> + Send + Sync>;

impl ErasedFactory {
    /// Erase a compile-checked factory. The produced-contract tag is derived
    /// from the factory's own type, so it cannot be wrong.
    pub fn of<F: Factory>(factory: F) -> Self {
        Self {
            produces: ContractKey::of::<F::Contract>(),
            call: Box::new(move |container| {
                factory.produce(container).map(ContractValue::new)
            }),
        }
    }

    /// Assemble an erased factory from raw parts.
    ///
    /// For wiring layers that discover factories at runtime (name-keyed
    /// plugin registries, config-driven provider selection) and cannot go
    /// through the typed path. `produces` is the caller's claim about what
    /// `call` yields; a claim that disagrees with the registration key is
    /// rejected when the resolver is built, and a claim the closure does not
    /// honor at runtime surfaces as an invalid-target error at resolution.
    pub fn from_raw(produces: ContractKey, call: ErasedCall) -> Self {
        Self { produces, call }
    }

    /// The contract this factory claims to produce.
    pub fn produces(&self) -> ContractKey {
        self.produces
    }

    pub(crate) fn invoke(&self, container: &Container) -> Result<ContractValue, BoxError> {
        (self.call)(container)
    }
}

impl fmt::Debug for ErasedFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErasedFactory(-> {})", self.produces)
    }
}
