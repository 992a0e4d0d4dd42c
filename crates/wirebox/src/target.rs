//! Resolution targets
//!
//! `Container::resolve_into` fills a sequence of mutable targets in order.
//! [`Slot`] is the built-in target; the [`ResolveTarget`] trait is public so
//! wiring layers can write values into their own structures.

use crate::error::ResolveError;
use crate::factory::ContractValue;
use crate::key::ContractKey;

/// A mutable slot that a resolution writes into.
///
/// `contract` names what the target asks for; `fill` accepts the resolved
/// value. An implementation whose `fill` cannot hold the value registered
/// under its own contract key is a wiring bug, surfaced as
/// [`ResolveError::InvalidResolutionTarget`].
pub trait ResolveTarget {
    /// The contract this target asks for.
    fn contract(&self) -> ContractKey;

    /// Accept the resolved value.
    fn fill(&mut self, value: ContractValue) -> Result<(), ResolveError>;
}

/// An initially-empty slot for one contract handle.
///
/// ```rust,ignore
/// let mut greeter = Slot::<Arc<dyn Greeter>>::empty();
/// let mut mailer = Slot::<Arc<dyn Mailer>>::empty();
/// container.resolve_into(&mut [&mut greeter, &mut mailer])?;
/// let greeter = greeter.take().unwrap();
/// ```
#[derive(Debug)]
pub struct Slot<T> {
    value: Option<T>,
}

impl<T> Slot<T> {
    /// Create an empty slot.
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Borrow the resolved value, if any.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Take the resolved value out of the slot.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Consume the slot, returning the resolved value, if any.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone + Send + Sync + 'static> ResolveTarget for Slot<T> {
    fn contract(&self) -> ContractKey {
        ContractKey::of::<T>()
    }

    fn fill(&mut self, value: ContractValue) -> Result<(), ResolveError> {
        match value.extract::<T>() {
            Some(resolved) => {
                self.value = Some(resolved);
                Ok(())
            }
            None => Err(ResolveError::invalid_target::<T>(self.contract())),
        }
    }
}
