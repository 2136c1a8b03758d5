//! Wrapp Proxy breaks circular construction dependencies.
//!
//! When `A` needs a `B` to be constructed and `B` needs an `A`, one side gets a proxy
//! that stands in for its peer until the peer exists. The proxy implements the peer's trait
//! and forwards every call to a target it resolves on first use.
//!
//! Wrapp Proxy is split into two parts:
//! 1. Resolvers: produce a value from a supplier, either on every call ([Direct]) or once ([Memoize])
//! 2. Proxies: forward every call of a trait to the value a resolver produces ([Proxy], [forward!])
//!
//! # Examples
//!
//! ```rust
//! use std::sync::{Arc, OnceLock};
//! use wrapp_proxy::{forward, lazy_proxy, Proxy, ResolveError};
//!
//! forward! {
//!     pub trait Named: Send + Sync {
//!         fn name(&self) -> String;
//!     }
//! }
//!
//! struct A {
//!     b: Arc<dyn Named>,
//! }
//! impl Named for A {
//!     fn name(&self) -> String {
//!         "A".to_string()
//!     }
//! }
//!
//! struct B {
//!     a: Arc<A>,
//! }
//! impl Named for B {
//!     fn name(&self) -> String {
//!         format!("B next to {}", self.a.name())
//!     }
//! }
//!
//! // B can only be built once A exists - hand A a proxy instead
//! let slot = Arc::new(OnceLock::<Arc<A>>::new());
//! let b: Proxy<Arc<B>, ResolveError> = lazy_proxy({
//!     let slot = slot.clone();
//!     move || -> Result<Arc<B>, ResolveError> {
//!         let a = slot.get().cloned().ok_or_else(ResolveError::unavailable::<A>)?;
//!         Ok(Arc::new(B { a }))
//!     }
//! });
//!
//! let a = Arc::new(A { b: Arc::new(b) });
//! let _ = slot.set(a.clone());
//!
//! assert_eq!(a.b.name(), "B next to A");
//! ```
//!
//! Wrapp Proxy consists of the following components:
//!
//! 1. Resolver - [Resolve], [Supplier] and the [Direct] and [Memoize] resolvers
//! 2. Proxy - the [Proxy] binding and the [forward!] macro implementing traits for it
//! 3. Builder - [ProxyBuilder] for configuring proxies
//! 4. Errors - [ResolveError] for suppliers, [InvariantViolation] for misuse

pub mod builder;
pub mod errors;
pub mod proxy;
pub mod resolver;
pub mod types;

pub use builder::{ProxyBuilder, ResolveMode};
pub use errors::{InvariantViolation, ResolveError};
pub use proxy::{Dispatch, Proxy};
pub use resolver::{direct::Direct, memoize::Memoize, Resolve, Supplier};
pub use types::{DynError, Shared, TypeInfo};

/// A proxy that calls `supplier` on every forwarded call
///
/// Useful when the target changes over time, e.g. a reloadable or request scoped target.
pub fn proxy<S, T, E>(supplier: S) -> Proxy<T, E>
where
    S: Supplier<T, E> + 'static,
    T: 'static,
    E: 'static,
{
    Proxy::new(Direct::new(supplier))
}

/// A proxy that calls `supplier` on first use, and reuses its target afterwards
///
/// A failed supplier call is not cached, the next forwarded call tries again.
pub fn lazy_proxy<S, T, E>(supplier: S) -> Proxy<T, E>
where
    S: Supplier<T, E> + 'static,
    T: Clone + Shared,
    E: Clone + Send + 'static,
{
    ProxyBuilder::new().memoized().build(supplier)
}

/// Decorates `supplier` so it is called until it succeeds once
pub fn memoize<S, T, E>(supplier: S) -> Memoize<S, T, E>
where
    S: Supplier<T, E>,
    T: Clone + 'static,
    E: Clone,
{
    Memoize::new(supplier)
}
