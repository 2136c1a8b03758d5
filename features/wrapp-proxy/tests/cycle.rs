use std::sync::{Arc, OnceLock, Weak};

use wrapp_proxy::{forward, lazy_proxy, Proxy, ProxyBuilder, ResolveError};

forward! {
    pub trait Peer: Send + Sync {
        fn id(&self) -> Result<&'static str, ResolveError>;
        fn peer_id(&self) -> Result<&'static str, ResolveError>;
    }
}

/// Needs a `B` to be constructed
struct A {
    b: Arc<dyn Peer>,
}
impl Peer for A {
    fn id(&self) -> Result<&'static str, ResolveError> {
        Ok("a")
    }

    fn peer_id(&self) -> Result<&'static str, ResolveError> {
        self.b.id()
    }
}

/// Needs an `A` to be constructed
struct B {
    a: Arc<A>,
}
impl Peer for B {
    fn id(&self) -> Result<&'static str, ResolveError> {
        Ok("b")
    }

    fn peer_id(&self) -> Result<&'static str, ResolveError> {
        self.a.id()
    }
}

/// Builds B lazily from whatever A ends up in `slot`
fn lazy_b(slot: &Arc<OnceLock<Weak<A>>>) -> Proxy<Arc<B>, ResolveError> {
    let slot = slot.clone();
    lazy_proxy(move || -> Result<Arc<B>, ResolveError> {
        let a = slot
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(ResolveError::unavailable::<A>)?;
        Ok(Arc::new(B { a }))
    })
}

#[test]
fn lazy_proxy_breaks_cycle() {
    let slot = Arc::new(OnceLock::new());
    let b = lazy_b(&slot);

    let a = Arc::new(A {
        b: Arc::new(b.clone()),
    });
    let _ = slot.set(Arc::downgrade(&a));

    assert_eq!(a.peer_id().unwrap(), "b");
    assert_eq!(b.peer_id().unwrap(), "a");

    // B was built with the real A, and is reused from now on
    let first = b.target().unwrap();
    assert!(Arc::ptr_eq(&first.a, &a));
    for _ in 0..3 {
        assert!(Arc::ptr_eq(&first, &b.target().unwrap()));
    }
}

#[test]
fn early_use_fails_then_recovers() {
    let slot = Arc::new(OnceLock::new());
    let b = lazy_b(&slot);

    // A does not exist yet - nothing is cached
    assert!(matches!(b.id(), Err(ResolveError::Unavailable(_))));

    let a = Arc::new(A {
        b: Arc::new(b.clone()),
    });
    let _ = slot.set(Arc::downgrade(&a));

    assert_eq!(a.peer_id().unwrap(), "b");
    assert!(Arc::ptr_eq(&b.target().unwrap().a, &a));
}

#[test]
fn labelled_proxy_breaks_cycle() {
    let slot: Arc<OnceLock<Weak<A>>> = Arc::new(OnceLock::new());
    let b: Proxy<Arc<B>, ResolveError> = ProxyBuilder::new().label("b").build({
        let slot = slot.clone();
        move || -> Result<Arc<B>, ResolveError> {
            let a = slot
                .get()
                .and_then(Weak::upgrade)
                .ok_or_else(ResolveError::unavailable::<A>)?;
            Ok(Arc::new(B { a }))
        }
    });
    assert_eq!(b.label().type_name, "b");

    let a = Arc::new(A {
        b: Arc::new(b.clone()),
    });
    let _ = slot.set(Arc::downgrade(&a));

    assert_eq!(a.peer_id().unwrap(), "b");
    assert!(Arc::ptr_eq(&b.target().unwrap(), &b.target().unwrap()));
}
