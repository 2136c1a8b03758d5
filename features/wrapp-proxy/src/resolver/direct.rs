use std::{fmt::Debug, marker::PhantomData};

use crate::{
    resolver::{Resolve, Supplier},
    types::TypeInfo,
};

/// Resolves by calling the supplier on every call - nothing is cached
///
/// Useful when the target legitimately changes over time, e.g. a reloadable or request scoped value.
pub struct Direct<S, T, E> {
    supplier: S,
    info: TypeInfo,
    _supplies: PhantomData<fn() -> Result<T, E>>,
}
impl<S, T, E> Debug for Direct<S, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Direct").field(&self.info.type_name).finish()
    }
}

impl<S: Supplier<T, E>, T: 'static, E> Direct<S, T, E> {
    pub fn new(supplier: S) -> Self {
        Self::with_info(supplier, TypeInfo::of::<T>())
    }
}
impl<S: Supplier<T, E>, T, E> Direct<S, T, E> {
    pub fn with_info(supplier: S, info: TypeInfo) -> Self {
        Direct {
            supplier,
            info,
            _supplies: PhantomData,
        }
    }
}

impl<S: Supplier<T, E>, T, E> Resolve for Direct<S, T, E> {
    type Target = T;
    type Error = E;

    fn resolve(&self) -> Result<T, E> {
        tracing::trace!(resolving = %self.info, "Resolving directly");
        self.supplier.supply()
    }

    fn info(&self) -> TypeInfo {
        self.info
    }
}
