//! The container
//!
//! Registry owner and resolution entry point.
//!
//! ```text
//! register(lifetime, factory)        resolve::<T>()
//!        │                                 │
//!        ▼                                 ▼
//!    Resolver ──► Scope ──────► registry lookup (shared lock)
//!                   ▲                      │
//!                   │                      ▼
//!                 fork()            scope.resolve(self) ──► factory
//! ```
//!
//! ## Forking
//!
//! `fork` produces a child container with its own registry. Singleton scopes
//! are aliased into the child, so one cache cell is visible across the whole
//! lineage; per-container scopes are rebuilt around the same resolver, giving
//! the child an independent cache; per-call scopes are stateless and shared.
//!
//! ## Concurrency
//!
//! Any number of threads may call into one container. Registration takes the
//! registry's exclusive lock; resolution takes the shared lock only for the
//! lookup and releases it before the scope runs, so factories may resolve
//! their own dependencies through the same container without re-entering the
//! registry lock. A `register` racing a `resolve` on the same contract is
//! not serialized beyond the registry lock: the lookup observes whichever
//! scope was installed at lookup time. Registration is intended to finish
//! before concurrent resolution traffic begins, but this is not enforced.

use crate::error::{ResolveError, Result};
use crate::factory::{ContractValue, ErasedFactory, Factory};
use crate::key::ContractKey;
use crate::lifetime::Lifetime;
use crate::module::WiringModule;
use crate::resolver::Resolver;
use crate::scope::{CachedScope, PerCallScope, Scope};
use crate::target::ResolveTarget;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace};

/// A lifetime-scoped dependency-injection container.
///
/// ```rust,ignore
/// let container = Container::new();
/// container.register(Lifetime::Singleton, |_: &Container| {
///     Ok::<_, BoxError>(Arc::new(ConsoleGreeter) as Arc<dyn Greeter>)
/// });
///
/// let greeter: Arc<dyn Greeter> = container.resolve()?;
/// ```
pub struct Container {
    scopes: RwLock<HashMap<ContractKey, Arc<dyn Scope>>>,
}

impl Container {
    /// Create a new, empty container.
    pub fn new() -> Self {
        Self {
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// Register `factory` under its contract with the given lifetime,
    /// replacing any prior registration for that contract.
    ///
    /// The factory shape (`fn(&Container) -> Result<T, E>` for a contract
    /// handle `T`) is checked by the compiler, so this path cannot observe a
    /// malformed factory.
    pub fn register<F: Factory>(&self, lifetime: Lifetime, factory: F) {
        self.install_resolver(lifetime, Arc::new(Resolver::new(factory)));
    }

    /// Register a runtime-assembled factory under `contract`.
    ///
    /// This is the dynamic counterpart of [`register`](Self::register) for
    /// wiring layers that discover factories at runtime.
    ///
    /// # Panics
    ///
    /// Panics when the factory does not produce `contract`. A malformed
    /// registration is a wiring defect, not a runtime condition: it is
    /// raised immediately and loudly so it gets caught during startup and
    /// testing instead of being silently tolerated.
    pub fn register_erased(
        &self,
        lifetime: Lifetime,
        contract: ContractKey,
        factory: ErasedFactory,
    ) {
        match Resolver::from_erased(contract, factory) {
            Ok(resolver) => self.install_resolver(lifetime, Arc::new(resolver)),
            Err(fault) => panic!("{fault}"),
        }
    }

    fn install_resolver(&self, lifetime: Lifetime, resolver: Arc<Resolver>) {
        let contract = resolver.contract();
        let scope: Arc<dyn Scope> = match lifetime {
            Lifetime::PerCall => Arc::new(PerCallScope::new(resolver)),
            Lifetime::PerContainer | Lifetime::Singleton => {
                Arc::new(CachedScope::new(resolver, lifetime))
            }
        };

        debug!("registered `{contract}` with lifetime {lifetime}");
        let mut scopes = self.scopes.write().unwrap_or_else(PoisonError::into_inner);
        scopes.insert(contract, scope);
    }

    /// Resolve the contract handle `T` from this container.
    pub fn resolve<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        let contract = ContractKey::of::<T>();
        let value = self.resolve_contract(contract)?;
        value
            .extract::<T>()
            .ok_or_else(|| ResolveError::invalid_target::<T>(contract))
    }

    /// Resolve by key, returning the type-erased value.
    ///
    /// The registry lock is released before the scope runs, so a factory may
    /// recursively resolve its own dependencies through the container it was
    /// handed. A dependency cycle is a caller error and shows up as runtime
    /// recursion or a deadlock on the scope's cache lock; it is not detected.
    pub fn resolve_contract(&self, contract: ContractKey) -> Result<ContractValue> {
        let scope = {
            let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
            scopes.get(&contract).map(Arc::clone)
        };

        let Some(scope) = scope else {
            return Err(ResolveError::unregistered(contract));
        };

        trace!("resolving `{contract}`");
        scope.resolve(self)
    }

    /// Fill each target in order, stopping at the first failure.
    ///
    /// No rollback is attempted: targets filled before the failure keep
    /// their resolved values.
    pub fn resolve_into(&self, targets: &mut [&mut dyn ResolveTarget]) -> Result<()> {
        for target in targets {
            let value = self.resolve_contract(target.contract())?;
            target.fill(value)?;
        }
        Ok(())
    }

    /// Fork this container into a new lifetime.
    ///
    /// The child inherits every registration. Singleton scopes are aliased
    /// (the cache cell is shared, not copied), per-container scopes are
    /// rebuilt fresh around the same resolver, and stateless per-call scopes
    /// are aliased since rebuilding them would change nothing.
    pub fn fork(&self) -> Container {
        let parent = self.scopes.read().unwrap_or_else(PoisonError::into_inner);

        let mut child: HashMap<ContractKey, Arc<dyn Scope>> =
            HashMap::with_capacity(parent.len());
        for (contract, scope) in parent.iter() {
            let inherited: Arc<dyn Scope> = if scope.lifetime().shares_scope_on_fork() {
                Arc::clone(scope)
            } else {
                Arc::new(CachedScope::new(
                    Arc::clone(scope.resolver()),
                    scope.lifetime(),
                ))
            };
            child.insert(*contract, inherited);
        }

        debug!("forked container with {} registrations", child.len());
        Container {
            scopes: RwLock::new(child),
        }
    }

    /// Install every registration of a wiring module.
    pub fn install<M: WiringModule + ?Sized>(&self, module: &M) {
        module.register(self);
    }

    /// Whether the contract handle `T` is registered in this container.
    pub fn contains<T: 'static>(&self) -> bool {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes.contains_key(&ContractKey::of::<T>())
    }

    /// The contracts registered in this container, in no particular order.
    pub fn contracts(&self) -> Vec<ContractKey> {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes.keys().copied().collect()
    }

    /// Number of registered contracts.
    pub fn len(&self) -> usize {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes.len()
    }

    /// Whether no contracts are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.len())
            .finish()
    }
}
