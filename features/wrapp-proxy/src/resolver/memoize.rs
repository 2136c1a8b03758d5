use std::{
    fmt::Debug,
    sync::{Condvar, Mutex, MutexGuard, OnceLock, PoisonError},
    thread::{self, ThreadId},
};

use crate::{
    errors::InvariantViolation,
    resolver::{Resolve, Supplier},
    types::TypeInfo,
};

/// Resolves by calling the supplier until it succeeds once, the result is cached afterwards
///
/// - A failed call caches nothing, the next `resolve` calls the supplier again
/// - Callers arriving while a call is in flight wait for it and share its outcome,
///   so concurrent first calls invoke the supplier exactly once
/// - Once resolved, the supplier is never called again and every caller gets a clone of the same value
///
/// ### Panics
///
/// If the supplier resolves the same `Memoize` again on its own thread,
/// the dependency cycle was not broken and waiting would deadlock.
pub struct Memoize<S, T, E> {
    supplier: S,
    info: TypeInfo,
    once: OnceLock<T>,
    attempt: Mutex<Attempt<E>>,
    attempt_finished: Condvar,
}
struct Attempt<E> {
    /// Thread currently calling the supplier
    running: Option<ThreadId>,
    /// Number of finished supplier calls
    finished: u64,
    /// Error of the last finished call - None if it succeeded or panicked
    failure: Option<E>,
}

impl<S, T: Debug, E> Debug for Memoize<S, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoize")
            .field("resolving", &self.info.type_name)
            .field("value", &self.once.get())
            .finish()
    }
}

impl<S: Supplier<T, E>, T: 'static, E> Memoize<S, T, E> {
    pub fn new(supplier: S) -> Self {
        Self::with_info(supplier, TypeInfo::of::<T>())
    }
}
impl<S: Supplier<T, E>, T, E> Memoize<S, T, E> {
    pub fn with_info(supplier: S, info: TypeInfo) -> Self {
        Memoize {
            supplier,
            info,
            once: OnceLock::new(),
            attempt: Mutex::new(Attempt {
                running: None,
                finished: 0,
                failure: None,
            }),
            attempt_finished: Condvar::new(),
        }
    }
}
impl<S, T, E> Memoize<S, T, E> {
    /// The resolved value, without resolving or waiting
    pub fn get(&self) -> Option<&T> {
        self.once.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.once.get().is_some()
    }

    // The attempt bookkeeping is only changed in small critical sections
    // that can't panic, so a poisoned lock still holds consistent state
    fn lock(&self) -> MutexGuard<'_, Attempt<E>> {
        self.attempt.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, T, E> Resolve for Memoize<S, T, E>
where
    S: Supplier<T, E>,
    T: Clone,
    E: Clone,
{
    type Target = T;
    type Error = E;

    fn resolve(&self) -> Result<T, E> {
        if let Some(value) = self.once.get() {
            return Ok(value.clone());
        }

        let mut attempt = self.lock();
        loop {
            // Double check once - it might have been set while we waited for the lock
            if let Some(value) = self.once.get() {
                return Ok(value.clone());
            }

            let Some(running) = attempt.running else {
                break;
            };

            if running == thread::current().id() {
                drop(attempt);
                InvariantViolation::Reentrant(self.info).raise();
            }

            // Someone else is calling the supplier - wait for them and share the outcome
            tracing::trace!(resolving = %self.info, "Waiting for resolution in progress");
            let waited_for = attempt.finished;
            attempt = self
                .attempt_finished
                .wait_while(attempt, |attempt| attempt.finished == waited_for)
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(value) = self.once.get() {
                return Ok(value.clone());
            }
            if let Some(error) = &attempt.failure {
                return Err(error.clone());
            }
            // The supplier panicked, contend for a new attempt
        }

        attempt.running = Some(thread::current().id());
        let number = attempt.finished + 1;
        drop(attempt);

        tracing::debug!(resolving = %self.info, attempt = number, "Resolving");
        let mut guard = AttemptGuard {
            memoize: self,
            failure: None,
        };

        match self.supplier.supply() {
            Ok(value) => {
                // Only the running attempt sets once, so this always stores `value`
                let value = self.once.get_or_init(|| value).clone();
                drop(guard);
                tracing::debug!(resolving = %self.info, attempt = number, "Resolved");
                Ok(value)
            }
            Err(error) => {
                guard.failure = Some(error.clone());
                drop(guard);
                tracing::debug!(
                    resolving = %self.info,
                    attempt = number,
                    "Resolution failed - the next call will retry"
                );
                Err(error)
            }
        }
    }

    fn info(&self) -> TypeInfo {
        self.info
    }
}

/// Finishes the running attempt and wakes up waiters - also when the supplier panics
struct AttemptGuard<'a, S, T, E> {
    memoize: &'a Memoize<S, T, E>,
    failure: Option<E>,
}
impl<S, T, E> Drop for AttemptGuard<'_, S, T, E> {
    fn drop(&mut self) {
        let mut attempt = self.memoize.lock();
        attempt.running = None;
        attempt.finished += 1;
        attempt.failure = self.failure.take();
        drop(attempt);

        self.memoize.attempt_finished.notify_all();
    }
}
