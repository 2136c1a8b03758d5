use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
    time::Duration,
};

use tracing_subscriber::EnvFilter;
use wrapp_proxy::{forward, lazy_proxy, Proxy, ResolveError};

const THREADS: usize = 16;

forward! {
    pub trait Service: Send + Sync {
        fn instance(&self) -> Result<usize, ResolveError>;
    }
}

struct Numbered(usize);
impl Service for Numbered {
    fn instance(&self) -> Result<usize, ResolveError> {
        Ok(self.0)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("wrapp_proxy=trace"))
        .with_test_writer()
        .try_init();
}

/// Calls `service.instance()` from [THREADS] threads at once
fn call_concurrently(service: &Proxy<Arc<Numbered>, ResolveError>) -> Vec<Result<usize, ResolveError>> {
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    service.instance()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("caller panicked"))
            .collect()
    })
}

#[test]
fn concurrent_first_use_builds_once() {
    init_tracing();
    let built = Arc::new(AtomicUsize::new(0));
    let service: Proxy<Arc<Numbered>, ResolveError> = lazy_proxy({
        let built = built.clone();
        move || {
            let number = built.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(100));
            Ok(Arc::new(Numbered(number)))
        }
    });

    let results = call_concurrently(&service);

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(results.len(), THREADS);
    assert!(results.iter().all(|result| matches!(result, Ok(0))));
}

#[test]
fn concurrent_first_use_shares_failure() {
    init_tracing();
    let built = Arc::new(AtomicUsize::new(0));
    let service: Proxy<Arc<Numbered>, ResolveError> = lazy_proxy({
        let built = built.clone();
        move || {
            let attempt = built.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(100));
            if attempt == 0 {
                Err(ResolveError::failed::<Numbered>(format!("attempt {attempt}")))
            } else {
                Ok(Arc::new(Numbered(attempt)))
            }
        }
    });

    let results = call_concurrently(&service);

    assert_eq!(built.load(Ordering::SeqCst), 1);
    for result in &results {
        let Err(ResolveError::Failed { error, .. }) = result else {
            panic!("expected the shared failure, got {result:?}");
        };
        assert_eq!(error.to_string(), "attempt 0");
    }

    // The failure was not cached - the next use builds the service
    assert_eq!(service.instance().unwrap(), 1);
    assert_eq!(service.instance().unwrap(), 1);
    assert_eq!(built.load(Ordering::SeqCst), 2);
}
