use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Ready made supplier error, for suppliers that have no error type of their own
///
/// Memoizing resolvers hand a failure to every waiting caller, so errors must be clone
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The target can not be provided (yet)
    #[error("'{0}' is not available")]
    Unavailable(TypeInfo),
    /// Constructing the target failed
    #[error("Constructing '{target}' failed - error: {error}")]
    Failed {
        target: TypeInfo,
        error: Arc<DynError>,
    },
}
impl ResolveError {
    pub fn unavailable<T: ?Sized + 'static>() -> Self {
        Self::Unavailable(TypeInfo::of::<T>())
    }

    pub fn failed<T: ?Sized + 'static>(error: impl Into<DynError>) -> Self {
        Self::Failed {
            target: TypeInfo::of::<T>(),
            error: Arc::new(error.into()),
        }
    }

    /// The type that could not be resolved
    pub fn target(&self) -> TypeInfo {
        match self {
            Self::Unavailable(target) | Self::Failed { target, .. } => *target,
        }
    }
}

/// Programming errors - a proxy or resolver was wired up in a way that can not work.
///
/// These are never returned, they are raised as panics.
#[derive(Error, Debug, Clone)]
pub enum InvariantViolation {
    /// A method whose return type can not carry the resolution error was called
    /// while the target could not be resolved
    #[error("Proxy '{proxy}' could not resolve a target for '{method}', and '{method}' can not return the error: {error}")]
    Unrepresentable {
        proxy: TypeInfo,
        method: &'static str,
        error: String,
    },
    /// The supplier asked for the value it is currently supplying
    #[error("'{0}' was requested by its own supplier - the cycle is not broken, consider using `lazy_proxy`")]
    Reentrant(TypeInfo),
}
impl InvariantViolation {
    /// Raise the violation
    pub fn raise(self) -> ! {
        tracing::error!("{self}");
        panic!("{self}")
    }
}
