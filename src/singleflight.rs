//! Single-flight request coalescing.
//!
//! At most one in-flight operation per logical key; callers that arrive while
//! an operation is pending await the same shared future and observe its result
//! instead of issuing a duplicate. Once the operation settles, the key is free
//! again and a later call starts fresh.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

pub struct SingleFlight<T: Clone> {
    in_flight: Mutex<HashMap<&'static str, Shared<BoxFuture<'static, T>>>>,
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Run `make()` under `key`, or join the operation already in flight for it
    pub async fn run<F, Fut>(&self, key: &'static str, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut map = self.in_flight.lock().unwrap();
            match map.get(key) {
                Some(existing) => existing.clone(),
                None => {
                    let fut = make().boxed().shared();
                    map.insert(key, fut.clone());
                    fut
                }
            }
        };

        let result = shared.clone().await;

        // Clear the slot, but only if it still holds this operation; a call
        // that lost the race to a fresh entry must not evict it.
        let mut map = self.in_flight.lock().unwrap();
        if map.get(key).is_some_and(|f| f.ptr_eq(&shared)) {
            map.remove(key);
        }

        result
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
