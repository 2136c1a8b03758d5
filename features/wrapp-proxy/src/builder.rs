use crate::{
    proxy::Proxy,
    resolver::{direct::Direct, memoize::Memoize, Supplier},
    types::{Shared, TypeInfo},
};

/// How a proxy resolves its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Call the supplier on every forwarded call
    Direct,
    /// Call the supplier until it succeeds once, then reuse the result
    #[default]
    Memoize,
}

/// Configures and builds a [Proxy]
///
/// ```rust
/// use std::sync::Arc;
/// use wrapp_proxy::{ProxyBuilder, ResolveMode};
///
/// let proxy = ProxyBuilder::new()
///     .label("clock")
///     .mode(ResolveMode::Direct)
///     .build(|| Ok::<_, ()>(Arc::new(std::time::Instant::now())));
///
/// assert_eq!(proxy.label().type_name, "clock");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProxyBuilder {
    label: Option<&'static str>,
    mode: ResolveMode,
}

impl ProxyBuilder {
    pub fn new() -> Self {
        ProxyBuilder {
            label: None,
            mode: ResolveMode::default(),
        }
    }
}
impl ProxyBuilder {
    /// Name used in logs and panic messages, defaults to the target's type name
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn direct(self) -> Self {
        self.mode(ResolveMode::Direct)
    }

    pub fn memoized(self) -> Self {
        self.mode(ResolveMode::Memoize)
    }

    pub fn resolve_mode(&self) -> ResolveMode {
        self.mode
    }

    /// Binds a new proxy to `supplier` - the supplier is not called yet
    pub fn build<S, T, E>(self, supplier: S) -> Proxy<T, E>
    where
        S: Supplier<T, E> + 'static,
        T: Clone + Shared,
        E: Clone + Send + 'static,
    {
        let info = match self.label {
            Some(label) => TypeInfo::of::<T>().named(label),
            None => TypeInfo::of::<T>(),
        };

        tracing::trace!(proxy = %info, mode = ?self.mode, "Binding proxy");

        match self.mode {
            ResolveMode::Direct => Proxy::new(Direct::with_info(supplier, info)),
            ResolveMode::Memoize => Proxy::new(Memoize::with_info(supplier, info)),
        }
    }
}
