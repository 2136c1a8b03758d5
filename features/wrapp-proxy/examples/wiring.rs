//! Wires up a user service and an audit log that need each other.
//!
//! Run with `RUST_LOG=wrapp_proxy=debug cargo run --example wiring`

use std::sync::{Arc, OnceLock, Weak};

use tracing_subscriber::EnvFilter;
use wrapp_proxy::{forward, lazy_proxy, Proxy, ResolveError};

forward! {
    pub trait Users: Send + Sync {
        fn name_of(&self, id: u32) -> Result<String, ResolveError>;
    }
}

forward! {
    pub trait Audit: Send + Sync {
        fn record(&self, id: u32) -> Result<String, ResolveError>;
    }
}

/// Looks up users, and audits every lookup
struct UserService {
    audit: Arc<dyn Audit>,
}
impl Users for UserService {
    fn name_of(&self, id: u32) -> Result<String, ResolveError> {
        let entry = self.audit.record(id)?;
        tracing::info!("{entry}");
        Ok(format!("user-{id}"))
    }
}

/// Records lookups, naming the looked up user
struct AuditLog {
    users: Weak<UserService>,
}
impl Audit for AuditLog {
    fn record(&self, id: u32) -> Result<String, ResolveError> {
        let users = self
            .users
            .upgrade()
            .ok_or_else(ResolveError::unavailable::<UserService>)?;
        Ok(format!("lookup of {id} by {}", std::any::type_name_of_val(&*users)))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let users_slot: Arc<OnceLock<Weak<UserService>>> = Arc::new(OnceLock::new());

    // The audit log needs the user service, which does not exist yet
    let audit: Proxy<Arc<AuditLog>, ResolveError> = lazy_proxy({
        let users_slot = users_slot.clone();
        move || -> Result<Arc<AuditLog>, ResolveError> {
            let users = users_slot
                .get()
                .cloned()
                .ok_or_else(ResolveError::unavailable::<UserService>)?;
            Ok(Arc::new(AuditLog { users }))
        }
    });

    let users = Arc::new(UserService {
        audit: Arc::new(audit.clone()),
    });
    let _ = users_slot.set(Arc::downgrade(&users));

    for id in [1, 2] {
        match users.name_of(id) {
            Ok(name) => println!("{id} -> {name}"),
            Err(e) => eprintln!("{e}"),
        }
    }
    println!("{audit:?} resolved once and reused");
}
