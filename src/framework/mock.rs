//! # Mock Remote & Testing Guide
//!
//! `MockRemote<T>` implements [`RemoteSource<T>`] entirely in memory. You queue
//! the calls you expect and the envelopes they should return, then drive a real
//! [`CacheActor`](crate::framework::CacheActor) on top of it. That keeps cache
//! tests fast and deterministic while still exercising the actual actor.
//!
//! ## When to use the Mock vs the HTTP client
//!
//! | Feature | MockRemote | RestaurantApi |
//! |---------|------------|---------------|
//! | **Speed** | Instant (in-memory) | Needs a server |
//! | **Call counting** | `calls()` records every call | Not observable |
//! | **Timing control** | `held(&gate)` parks a call until released | Not controllable |
//! | **Error injection** | `return_err("...")` | Requires a misbehaving server |
//!
//! ## Example
//!
//! ```rust
//! use restaurant_list::framework::mock::MockRemote;
//! use restaurant_list::framework::CacheActor;
//! use restaurant_list::model::RestaurantRecord;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockRemote::<RestaurantRecord>::new();
//!     mock.expect_list().return_ok(vec![]);
//!
//!     let (actor, client) = CacheActor::new(mock.clone(), 8);
//!     tokio::spawn(actor.run());
//!
//!     assert!(client.list().await.unwrap().is_empty());
//!     // Served from the snapshot, no second call.
//!     assert!(client.list().await.unwrap().is_empty());
//!     assert_eq!(mock.calls(), vec!["list"]);
//!     mock.verify();
//! }
//! ```
//!
//! ## Holding a call open
//!
//! A [`Gate`] parks a remote call until the test releases it, which is how the
//! tests observe "loading" and "pending" states or race an invalidation
//! against a fetch:
//!
//! ```rust,ignore
//! let gate = Gate::new();
//! mock.expect_delete(RestaurantId(3)).held(&gate).return_ok(());
//! let handle = client.spawn_delete(RestaurantId(3));
//! assert!(handle.is_pending());
//! gate.release();
//! handle.outcome().await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

use crate::framework::{ApiResponse, RemoteSource, Resource};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected remote call and the envelope to answer it with.
enum Expectation<T: Resource> {
    List { response: ApiResponse<Vec<T>> },
    Get { id: T::Id, response: ApiResponse<T> },
    Create { response: ApiResponse<T> },
    Update { id: T::Id, response: ApiResponse<T> },
    Delete { id: T::Id, response: ApiResponse<()> },
}

struct Queued<T: Resource> {
    expectation: Expectation<T>,
    gate: Option<Gate>,
}

struct MockState<T: Resource> {
    expectations: VecDeque<Queued<T>>,
    calls: Vec<String>,
    mismatches: Vec<String>,
}

/// Parks held calls until [`release`](Gate::release) is called.
#[derive(Clone, Default)]
pub struct Gate {
    released: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.released.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

/// An in-memory [`RemoteSource`] with expectation tracking.
///
/// Calls must arrive in the order they were queued. A call that doesn't match
/// the head of the queue is answered with a failure envelope and reported by
/// [`verify`](MockRemote::verify).
pub struct MockRemote<T: Resource> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: Resource> Clone for MockRemote<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Resource> Default for MockRemote<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockRemote<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                calls: Vec::new(),
                mismatches: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn builder<V>(
        &self,
        wrap: impl FnOnce(ApiResponse<V>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, V> {
        ExpectationBuilder {
            state: Arc::clone(&self.state),
            gate: None,
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_list(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_get(&self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Labels of every call received so far, e.g. `["list", "delete 3"]`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Panics if expectations are left over or an unexpected call arrived.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.mismatches.is_empty() {
            panic!("Unexpected calls: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    /// Records `call` and pops the next expectation.
    fn next(&self, call: String) -> (String, Option<Queued<T>>) {
        let mut state = self.lock();
        state.calls.push(call.clone());
        let queued = state.expectations.pop_front();
        (call, queued)
    }

    fn mismatch<V>(&self, call: String) -> ApiResponse<V> {
        let message = format!("Unexpected call: {call}");
        self.lock().mismatches.push(call);
        ApiResponse::failure(message)
    }
}

/// Fluent builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: Resource, V> {
    state: Arc<Mutex<MockState<T>>>,
    gate: Option<Gate>,
    wrap: Box<dyn FnOnce(ApiResponse<V>) -> Expectation<T> + Send>,
}

impl<T: Resource, V> ExpectationBuilder<T, V> {
    /// The call waits on `gate` before answering.
    pub fn held(mut self, gate: &Gate) -> Self {
        self.gate = Some(gate.clone());
        self
    }

    pub fn return_ok(self, value: V) {
        self.return_response(ApiResponse::ok(value));
    }

    pub fn return_err(self, message: impl Into<String>) {
        self.return_response(ApiResponse::failure(message));
    }

    pub fn return_response(self, response: ApiResponse<V>) {
        let queued = Queued {
            expectation: (self.wrap)(response),
            gate: self.gate,
        };
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .expectations
            .push_back(queued);
    }
}

#[async_trait]
impl<T: Resource> RemoteSource<T> for MockRemote<T> {
    async fn list_all(&self) -> ApiResponse<Vec<T>> {
        let (call, queued) = self.next("list".to_string());
        match queued {
            Some(Queued {
                expectation: Expectation::List { response },
                gate,
            }) => {
                if let Some(gate) = gate {
                    gate.wait().await;
                }
                response
            }
            _ => self.mismatch(call),
        }
    }

    async fn get_one(&self, id: T::Id) -> ApiResponse<T> {
        let (call, queued) = self.next(format!("get {id}"));
        match queued {
            Some(Queued {
                expectation: Expectation::Get { id: expected, response },
                gate,
            }) if expected == id => {
                if let Some(gate) = gate {
                    gate.wait().await;
                }
                response
            }
            _ => self.mismatch(call),
        }
    }

    async fn create(&self, _params: T::Create) -> ApiResponse<T> {
        let (call, queued) = self.next("create".to_string());
        match queued {
            Some(Queued {
                expectation: Expectation::Create { response },
                gate,
            }) => {
                if let Some(gate) = gate {
                    gate.wait().await;
                }
                response
            }
            _ => self.mismatch(call),
        }
    }

    async fn update(&self, id: T::Id, _update: T::Update) -> ApiResponse<T> {
        let (call, queued) = self.next(format!("update {id}"));
        match queued {
            Some(Queued {
                expectation: Expectation::Update { id: expected, response },
                gate,
            }) if expected == id => {
                if let Some(gate) = gate {
                    gate.wait().await;
                }
                response
            }
            _ => self.mismatch(call),
        }
    }

    async fn delete(&self, id: T::Id) -> ApiResponse<()> {
        let (call, queued) = self.next(format!("delete {id}"));
        match queued {
            Some(Queued {
                expectation: Expectation::Delete { id: expected, response },
                gate,
            }) if expected == id => {
                if let Some(gate) = gate {
                    gate.wait().await;
                }
                response
            }
            _ => self.mismatch(call),
        }
    }
}
