//! Contract identity
//!
//! The registry is keyed by the *contract handle type* a factory produces,
//! idiomatically `Arc<dyn Trait>`. `ContractKey` captures that type's
//! identity for storage plus its name for diagnostics.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a contract in a container's registry.
///
/// Two keys are equal exactly when they were built from the same type.
/// The captured type name is carried only for error messages and logs;
/// it takes no part in equality or hashing.
#[derive(Clone, Copy)]
pub struct ContractKey {
    id: TypeId,
    name: &'static str,
}

impl ContractKey {
    /// Build the key for the contract handle type `T`.
    ///
    /// `T` is the type a factory returns and a resolution asks for,
    /// e.g. `Arc<dyn Greeter>`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Human-readable name of the contract type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContractKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContractKey {}

impl Hash for ContractKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Debug for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractKey({})", self.name)
    }
}
