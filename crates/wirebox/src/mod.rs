//! wirebox - lifetime-scoped dependency injection
//!
//! A dependency-injection container mapping abstract capabilities
//! (*contracts*, idiomatically `Arc<dyn Trait>`) to the factories that
//! produce them, with pluggable instance lifetimes and hierarchical scoping
//! via [`Container::fork`].
//!
//! ## Architecture
//!
//! ```text
//! Factory (user closure)
//!    │  validated at registration
//!    ▼
//! Resolver ──wrapped by──► Scope (per-call | cached)
//!                             │
//!                             ▼
//!                    Container registry
//!                    ContractKey → Arc<dyn Scope>
//!                             │
//!                           fork()
//!                             ▼
//!                      child Container
//!              (Singleton scopes aliased,
//!               PerContainer scopes rebuilt)
//! ```
//!
//! ## Lifetimes
//!
//! | Lifetime | Resolve | Fork |
//! |---|---|---|
//! | [`Lifetime::PerCall`] | new instance every call | scope shared (stateless) |
//! | [`Lifetime::PerContainer`] | cached per container | child gets a fresh cache |
//! | [`Lifetime::Singleton`] | cached across the lineage | child shares the cache cell |
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use wirebox::{BoxError, Container, Lifetime};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct ConsoleGreeter;
//! impl Greeter for ConsoleGreeter {
//!     fn greet(&self) -> String {
//!         "Hello, World!".into()
//!     }
//! }
//!
//! let container = Container::new();
//! container.register(Lifetime::Singleton, |_: &Container| {
//!     Ok::<_, BoxError>(Arc::new(ConsoleGreeter) as Arc<dyn Greeter>)
//! });
//!
//! let greeter: Arc<dyn Greeter> = container.resolve().unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

pub mod container;
pub mod error;
pub mod factory;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod resolver;
pub mod scope;
pub mod target;

pub use container::Container;
pub use error::{BoxError, InvalidFactorySignature, ResolveError, Result};
pub use factory::{ContractValue, ErasedCall, ErasedFactory, Factory};
pub use key::ContractKey;
pub use lifetime::Lifetime;
pub use module::WiringModule;
pub use resolver::Resolver;
pub use scope::{CachedScope, PerCallScope, Scope};
pub use target::{ResolveTarget, Slot};
