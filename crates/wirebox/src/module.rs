//! Wiring modules
//!
//! A module groups the registrations of one subsystem so application
//! composition roots can install them as a unit.

use crate::container::Container;

/// A group of registrations installed together.
///
/// ```rust,ignore
/// struct GreetingModule;
///
/// impl WiringModule for GreetingModule {
///     fn register(&self, container: &Container) {
///         container.register(Lifetime::Singleton, |_: &Container| {
///             Ok::<_, BoxError>(Arc::new(ConsoleGreeter) as Arc<dyn Greeter>)
///         });
///     }
/// }
///
/// container.install(&GreetingModule);
/// ```
pub trait WiringModule {
    /// Register this module's contracts into `container`.
    fn register(&self, container: &Container);
}
