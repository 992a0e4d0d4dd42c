//! Lifetime scopes
//!
//! A [`Scope`] decides how often its resolver runs. Three lifetimes exist
//! but only two implementations do: `Singleton` and `PerContainer` differ
//! only in the fork sharing rule, which the container applies, so both ride
//! on [`CachedScope`] while `PerCall` rides on the stateless
//! [`PerCallScope`].
//!
//! ```text
//! resolve ──► read lock ── cached? ──► clone of cached handle
//!                │ no
//!                ▼
//!            write lock ── re-check ──► invoke resolver once, store
//! ```

use crate::container::Container;
use crate::error::ResolveError;
use crate::factory::ContractValue;
use crate::lifetime::Lifetime;
use crate::resolver::Resolver;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Caching strategy applied to one resolver.
///
/// A scope instance is the unit of shared ownership across forked
/// containers: aliasing a caching scope aliases its cache cell.
pub trait Scope: Send + Sync {
    /// Resolve a value under this scope's policy. `container` is whichever
    /// container triggered the resolution and is what the factory receives.
    fn resolve(&self, container: &Container) -> Result<ContractValue, ResolveError>;

    /// The resolver this scope wraps.
    fn resolver(&self) -> &Arc<Resolver>;

    /// The lifetime this scope enforces.
    fn lifetime(&self) -> Lifetime;
}

/// Stateless pass-through scope backing [`Lifetime::PerCall`].
///
/// Every resolution invokes the resolver fresh. No mutable state, so it is
/// trivially safe to share between threads and across forks.
pub struct PerCallScope {
    resolver: Arc<Resolver>,
}

impl PerCallScope {
    /// Create a per-call scope over `resolver`.
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }
}

impl Scope for PerCallScope {
    fn resolve(&self, container: &Container) -> Result<ContractValue, ResolveError> {
        self.resolver.resolve(container)
    }

    fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::PerCall
    }
}

/// Lazily-initializing scope backing [`Lifetime::PerContainer`] and
/// [`Lifetime::Singleton`].
///
/// The cell moves from empty to resolved exactly once; there is no eviction
/// and no recomputation. Mutual exclusion during the first computation comes
/// purely from the exclusive lock: a caller that loses the race blocks until
/// the winner finishes, then observes the stored value on its own re-check.
/// The common already-resolved path takes only the shared lock.
pub struct CachedScope {
    resolver: Arc<Resolver>,
    lifetime: Lifetime,
    cell: RwLock<Option<ContractValue>>,
}

impl CachedScope {
    /// Create an empty caching scope over `resolver`.
    pub fn new(resolver: Arc<Resolver>, lifetime: Lifetime) -> Self {
        Self {
            resolver,
            lifetime,
            cell: RwLock::new(None),
        }
    }
}

impl Scope for CachedScope {
    fn resolve(&self, container: &Container) -> Result<ContractValue, ResolveError> {
        // Fast path: the cell is already populated.
        {
            let cell = self.cell.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(value) = cell.as_ref() {
                return Ok(value.clone());
            }
        }

        let mut cell = self.cell.write().unwrap_or_else(PoisonError::into_inner);

        // A competing caller may have populated the cell while we waited
        // for the exclusive lock.
        if let Some(value) = cell.as_ref() {
            return Ok(value.clone());
        }

        trace!("first resolution of `{}`", self.resolver.contract());
        let value = self.resolver.resolve(container)?;
        *cell = Some(value.clone());
        Ok(value)
    }

    fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Counterish: Send + Sync {}
    struct Nothing;
    impl Counterish for Nothing {}

    fn counting_resolver(invocations: Arc<AtomicUsize>) -> Arc<Resolver> {
        Arc::new(Resolver::new(move |_: &Container| {
            invocations.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxError>(Arc::new(Nothing) as Arc<dyn Counterish>)
        }))
    }

    #[test]
    fn per_call_scope_invokes_every_time() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let scope = PerCallScope::new(counting_resolver(invocations.clone()));
        let container = Container::new();

        scope.resolve(&container).unwrap();
        scope.resolve(&container).unwrap();
        scope.resolve(&container).unwrap();

        assert_eq!(invocations.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn cached_scope_invokes_once() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let scope = CachedScope::new(
            counting_resolver(invocations.clone()),
            Lifetime::PerContainer,
        );
        let container = Container::new();

        let first = scope.resolve(&container).unwrap();
        let second = scope.resolve(&container).unwrap();

        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        let first = first.extract::<Arc<dyn Counterish>>().unwrap();
        let second = second.extract::<Arc<dyn Counterish>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cached_scope_does_not_cache_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let resolver = {
            let attempts = attempts.clone();
            Arc::new(Resolver::new(move |_: &Container| {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err::<Arc<dyn Counterish>, BoxError>("cold start".into())
                } else {
                    Ok(Arc::new(Nothing) as Arc<dyn Counterish>)
                }
            }))
        };
        let scope = CachedScope::new(resolver, Lifetime::Singleton);
        let container = Container::new();

        assert!(scope.resolve(&container).is_err());
        assert!(scope.resolve(&container).is_ok());
        // Resolved value is now cached.
        assert!(scope.resolve(&container).is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn scope_reports_its_lifetime_and_resolver() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let resolver = counting_resolver(invocations);
        let cached = CachedScope::new(resolver.clone(), Lifetime::Singleton);
        assert_eq!(cached.lifetime(), Lifetime::Singleton);
        assert_eq!(cached.resolver().contract(), resolver.contract());

        let per_call = PerCallScope::new(resolver.clone());
        assert_eq!(per_call.lifetime(), Lifetime::PerCall);
        assert_eq!(per_call.resolver().contract(), resolver.contract());
    }
}
