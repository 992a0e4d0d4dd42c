//! Instantiation policies
//!
//! A [`Lifetime`] decides how often a registered factory runs and what a
//! forked container inherits. The container interprets the policy in exactly
//! two places: scope selection at registration and the sharing rule at fork.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// A new instance on every resolution. The smallest, and simplest,
    /// lifetime: nothing is ever cached.
    PerCall,

    /// One instance per container. Behaves like `Singleton` within a single
    /// container, but a forked container starts with an empty cache and will
    /// resolve its own instance up to one time.
    PerContainer,

    /// One instance across the entire container lineage. The first
    /// resolution anywhere in the lineage populates a cache that every
    /// container forked from a common ancestor observes.
    Singleton,
}

impl Lifetime {
    /// Whether resolutions under this policy are cached after the first one.
    pub fn is_cached(self) -> bool {
        !matches!(self, Self::PerCall)
    }

    /// Whether fork aliases the existing scope instead of rebuilding it.
    ///
    /// `Singleton` scopes are shared so the cache cell is visible across the
    /// lineage. `PerCall` scopes are stateless, so sharing and rebuilding are
    /// indistinguishable; they are shared to avoid the allocation.
    pub fn shares_scope_on_fork(self) -> bool {
        matches!(self, Self::Singleton | Self::PerCall)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerCall => f.write_str("per_call"),
            Self::PerContainer => f.write_str("per_container"),
            Self::Singleton => f.write_str("singleton"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caching_predicate() {
        assert!(!Lifetime::PerCall.is_cached());
        assert!(Lifetime::PerContainer.is_cached());
        assert!(Lifetime::Singleton.is_cached());
    }

    #[test]
    fn fork_sharing_rule() {
        assert!(Lifetime::Singleton.shares_scope_on_fork());
        assert!(Lifetime::PerCall.shares_scope_on_fork());
        assert!(!Lifetime::PerContainer.shares_scope_on_fork());
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&Lifetime::PerContainer).unwrap();
        assert_eq!(json, "\"per_container\"");
        let back: Lifetime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Lifetime::PerContainer);
    }

    #[test]
    fn display_matches_config_spelling() {
        assert_eq!(Lifetime::Singleton.to_string(), "singleton");
        assert_eq!(Lifetime::PerCall.to_string(), "per_call");
    }
}
