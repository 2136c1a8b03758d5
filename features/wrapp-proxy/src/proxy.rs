use std::{fmt::Debug, sync::Arc};

use crate::{errors::InvariantViolation, resolver::Resolve, types::TypeInfo};

/// Stands in for a target that is resolved when it is first used
///
/// A `Proxy<T, E>` is bound to one resolver for its whole lifetime. Clones share that binding,
/// so handing out clones never resolves the target twice on a memoizing resolver.
///
/// `T` is a pointer to the target, e.g. `Arc<Service>` or `Arc<dyn Service>`.
/// Use [`forward!`](crate::forward) to implement the target's trait for the proxy.
pub struct Proxy<T, E> {
    resolver: Arc<dyn Resolve<Target = T, Error = E> + Send + Sync>,
}
impl<T, E> Clone for Proxy<T, E> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
        }
    }
}
impl<T, E> Debug for Proxy<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Proxy").field(&self.label().type_name).finish()
    }
}

impl<T, E> Proxy<T, E> {
    /// Binds a proxy to any resolver
    ///
    /// Does not resolve anything - the resolver is first called when the proxy is used
    pub fn new<R>(resolver: R) -> Self
    where
        R: Resolve<Target = T, Error = E> + Send + Sync + 'static,
    {
        Proxy {
            resolver: Arc::new(resolver),
        }
    }

    /// What this proxy stands in for
    pub fn label(&self) -> TypeInfo {
        self.resolver.info()
    }

    /// True if both proxies share the same binding
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&this.resolver), Arc::as_ptr(&other.resolver))
    }

    /// Resolves the target
    pub fn target(&self) -> Result<T, E> {
        self.resolver.resolve()
    }

    /// Resolves the target and runs `call` on it
    ///
    /// `call` is not run if the target could not be resolved.
    pub fn dispatch<R>(&self, call: impl FnOnce(&T) -> R) -> Dispatch<R, E> {
        match self.resolver.resolve() {
            Ok(target) => Dispatch::Returned(call(&target)),
            Err(error) => Dispatch::Unresolved(error),
        }
    }
}

/// Proxies are resolvers themselves, so they can be wrapped again - e.g. memoizing a direct proxy
impl<T, E> Resolve for Proxy<T, E> {
    type Target = T;
    type Error = E;

    fn resolve(&self) -> Result<T, E> {
        self.resolver.resolve()
    }

    fn info(&self) -> TypeInfo {
        self.label()
    }
}

/// Outcome of forwarding a call through a [Proxy]
///
/// Keeps what the target returned apart from a failure to reach the target at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<R, E> {
    /// The target was resolved and returned `R`
    Returned(R),
    /// The target could not be resolved - the call was never forwarded
    Unresolved(E),
}
impl<U, F, E> Dispatch<Result<U, F>, E>
where
    F: From<E>,
{
    /// Flattens the resolution error into the error type of the forwarded call
    ///
    /// Errors returned by the target are passed on untouched.
    pub fn into_result(self) -> Result<U, F> {
        match self {
            Dispatch::Returned(returned) => returned,
            Dispatch::Unresolved(error) => Err(F::from(error)),
        }
    }
}
impl<R, E: Debug> Dispatch<R, E> {
    /// The returned value, for calls whose return type can not carry the resolution error
    ///
    /// ### Panics
    ///
    /// If the target could not be resolved
    pub fn or_violate(self, proxy: TypeInfo, method: &'static str) -> R {
        match self {
            Dispatch::Returned(returned) => returned,
            Dispatch::Unresolved(error) => InvariantViolation::Unrepresentable {
                proxy,
                method,
                error: format!("{error:?}"),
            }
            .raise(),
        }
    }
}

/// Implements a trait for [Proxy] by forwarding every method to the resolved target
///
/// Given a proxy `Proxy<T, E>` where `T` derefs to an implementor of the trait,
/// each generated method resolves the target and calls the same method with the same arguments.
///
/// - Methods returning `Result<U, F>` require `F: From<E>`. A failed resolution is returned
///   through that conversion and the target is not called. Errors from the target are returned as is.
/// - Methods returning anything else panic if the target can not be resolved.
///
/// Methods must take `&self`, plain identifiers as arguments, no generics, and return owned values
/// (the target may only live for the duration of the call).
///
/// When the macro defines the trait, supertraits must be single identifiers (`Send + Sync + Debug`).
/// Traits with lifetime, generic or path supertraits are defined by hand and forwarded with the `impl` form.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wrapp_proxy::{forward, lazy_proxy, Proxy};
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct NotFound;
///
/// forward! {
///     pub trait Greeter: Send + Sync {
///         fn greet(&self, name: &str) -> Result<String, NotFound>;
///     }
/// }
///
/// struct Hello;
/// impl Greeter for Hello {
///     fn greet(&self, name: &str) -> Result<String, NotFound> {
///         Ok(format!("Hello, {name}"))
///     }
/// }
///
/// let greeter: Proxy<Arc<Hello>, NotFound> = lazy_proxy(|| Ok(Arc::new(Hello)));
/// assert_eq!(greeter.greet("Ann"), Ok("Hello, Ann".to_string()));
/// ```
///
/// An existing trait is forwarded with `forward! { impl path::to::Trait { ..methods } }`.
#[macro_export]
macro_rules! forward {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $supertrait:ident $(+ $supertraits:ident)*)? {
            $($methods:tt)*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name $(: $supertrait $(+ $supertraits)*)? {
            $($methods)*
        }

        $crate::forward! { impl $name { $($methods)* } }
    };

    (impl $tr:path { $($methods:tt)* }) => {
        $crate::forward!(@munch $tr; []; []; $($methods)*);
    };

    // Methods whose return type can carry the resolution error
    (@munch $tr:path; [$($bounds:tt)*]; [$($impls:tt)*];
        $(#[$method_meta:meta])*
        fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) -> Result<$ok:ty, $err:ty>;
        $($rest:tt)*
    ) => {
        $crate::forward!(@munch $tr;
            [$($bounds)* $err: ::core::convert::From<WrappError>,];
            [$($impls)*
                fn $method(&self $(, $arg: $arg_ty)*) -> Result<$ok, $err> {
                    $crate::proxy::Proxy::dispatch(self, move |target: &WrappTarget| {
                        <<WrappTarget as ::core::ops::Deref>::Target as $tr>::$method(&**target $(, $arg)*)
                    })
                    .into_result()
                }
            ];
            $($rest)*
        );
    };

    // Any other method - a failed resolution is an invariant violation
    (@munch $tr:path; [$($bounds:tt)*]; [$($impls:tt)*];
        $(#[$method_meta:meta])*
        fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::forward!(@munch $tr;
            [$($bounds)*];
            [$($impls)*
                fn $method(&self $(, $arg: $arg_ty)*) $(-> $ret)? {
                    $crate::proxy::Proxy::dispatch(self, move |target: &WrappTarget| {
                        <<WrappTarget as ::core::ops::Deref>::Target as $tr>::$method(&**target $(, $arg)*)
                    })
                    .or_violate($crate::proxy::Proxy::label(self), ::core::stringify!($method))
                }
            ];
            $($rest)*
        );
    };

    (@munch $tr:path; [$($bounds:tt)*]; [$($impls:tt)*];) => {
        impl<WrappTarget, WrappError> $tr for $crate::proxy::Proxy<WrappTarget, WrappError>
        where
            WrappTarget: ::core::ops::Deref,
            <WrappTarget as ::core::ops::Deref>::Target: $tr,
            WrappError: ::core::fmt::Debug,
            $($bounds)*
        {
            $($impls)*
        }
    };
}
