use std::sync::Arc;

use crate::types::TypeInfo;

pub mod direct;
pub mod memoize;

/// A zero argument operation producing a value, or failing
///
/// Implemented for any `Fn() -> Result<T, E>`, so closures can be used directly.
/// Structs can implement it to act as reusable factories.
pub trait Supplier<T, E>: Send + Sync {
    fn supply(&self) -> Result<T, E>;
}
impl<T, E, Fun> Supplier<T, E> for Fun
where
    Fun: Fn() -> Result<T, E> + Send + Sync,
{
    fn supply(&self) -> Result<T, E> {
        self()
    }
}

/// Produces the value a [Proxy](crate::proxy::Proxy) forwards to
pub trait Resolve {
    type Target;
    type Error;

    fn resolve(&self) -> Result<Self::Target, Self::Error>;

    /// What is being resolved - used in logs and panic messages
    fn info(&self) -> TypeInfo;
}

impl<R: Resolve + ?Sized> Resolve for &R {
    type Target = R::Target;
    type Error = R::Error;

    fn resolve(&self) -> Result<Self::Target, Self::Error> {
        (**self).resolve()
    }

    fn info(&self) -> TypeInfo {
        (**self).info()
    }
}

impl<R: Resolve + ?Sized> Resolve for Box<R> {
    type Target = R::Target;
    type Error = R::Error;

    fn resolve(&self) -> Result<Self::Target, Self::Error> {
        (**self).resolve()
    }

    fn info(&self) -> TypeInfo {
        (**self).info()
    }
}

impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    type Target = R::Target;
    type Error = R::Error;

    fn resolve(&self) -> Result<Self::Target, Self::Error> {
        (**self).resolve()
    }

    fn info(&self) -> TypeInfo {
        (**self).info()
    }
}
