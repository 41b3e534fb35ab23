//! In-memory doubles for the storage and transport capabilities
//!
//! - [`InMemoryKeyValueStore`]: `HashMap`-backed key-value storage
//! - [`MockTransport`]: scripted API responses with request recording
//! - [`ResponseGate`]: releases a deferred response, to control completion order

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use pawfetch_catalog::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use pawfetch_core::environment::{KeyValueStore, StorageError};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::oneshot;

/// In-memory key-value storage for fast, deterministic tests
///
/// Clones share the same data, so a test can keep a handle and inspect what
/// the code under test persisted.
///
/// # Example
///
/// ```
/// use pawfetch_testing::InMemoryKeyValueStore;
/// use pawfetch_core::environment::KeyValueStore;
///
/// let storage = InMemoryKeyValueStore::new();
/// storage.set("user", "{}").unwrap();
/// assert_eq!(storage.get("user").unwrap().as_deref(), Some("{}"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryKeyValueStore {
    data: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut data = store.data.write().unwrap();
            for (key, value) in entries {
                data.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    /// Make every subsequent `set`/`remove` fail with [`StorageError::Io`]
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap() = fail;
    }

    /// Whether `key` holds a value
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.read().unwrap().contains_key(key)
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if *self.fail_writes.read().unwrap() {
            return Err(StorageError::Io("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.data.write().unwrap().remove(key);
        Ok(())
    }
}

type Reply = Result<ApiResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct MockState {
    queued: HashMap<(Method, String), VecDeque<Scripted>>,
    standing: HashMap<(Method, String), Reply>,
    requests: Vec<ApiRequest>,
}

/// Scripted [`Transport`] for tests
///
/// Replies are looked up by method and path. Queued replies are consumed in
/// order; once a route's queue is empty its standing reply (if any) answers
/// every further request. Unscripted routes answer 404.
///
/// # Example
///
/// ```
/// use pawfetch_testing::MockTransport;
/// use pawfetch_catalog::Method;
///
/// let transport = MockTransport::new();
/// transport.respond(Method::Get, "/dogs/breeds", 200, r#"["Beagle"]"#);
/// let gate = transport.defer(Method::Post, "/dogs");
/// // ... later, complete the request on the test's schedule
/// gate.release(200, "[]");
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a transport with no scripted routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to a route with `status` and `body`
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .standing
            .insert((method, path.to_string()), Ok(ApiResponse::new(status, body)));
    }

    /// Answer every request to a route with a transport failure
    pub fn fail(&self, method: Method, path: &str, error: TransportError) {
        self.state
            .lock()
            .unwrap()
            .standing
            .insert((method, path.to_string()), Err(error));
    }

    /// Answer the next unanswered request to a route with `status` and `body`
    pub fn enqueue(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.push(
            method,
            path,
            Scripted::Ready(Ok(ApiResponse::new(status, body))),
        );
    }

    /// Hold the next unanswered request to a route until the gate is released
    #[must_use]
    pub fn defer(&self, method: Method, path: &str) -> ResponseGate {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Deferred(rx));
        ResponseGate { sender: tx }
    }

    /// Every request received so far, in arrival order
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests received for `path`, in arrival order
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }

    fn push(&self, method: Method, path: &str, reply: Scripted) {
        self.state
            .lock()
            .unwrap()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Reply> + Send {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            let route = (request.method, request.path.clone());
            state.requests.push(request);

            match state.queued.get_mut(&route).and_then(VecDeque::pop_front) {
                Some(scripted) => scripted,
                None => Scripted::Ready(
                    state
                        .standing
                        .get(&route)
                        .cloned()
                        .unwrap_or_else(|| Ok(ApiResponse::new(404, "Not Found"))),
                ),
            }
        };

        async move {
            match scripted {
                Scripted::Ready(reply) => reply,
                Scripted::Deferred(receiver) => receiver.await.unwrap_or_else(|_| {
                    Err(TransportError::Request("deferred response dropped".to_string()))
                }),
            }
        }
    }
}

/// Releases one deferred response
#[derive(Debug)]
pub struct ResponseGate {
    sender: oneshot::Sender<Reply>,
}

impl ResponseGate {
    /// Complete the held request with `status` and `body`
    pub fn release(self, status: u16, body: impl Into<String>) {
        let _ = self.sender.send(Ok(ApiResponse::new(status, body)));
    }

    /// Complete the held request with a transport failure
    pub fn fail(self, error: TransportError) {
        let _ = self.sender.send(Err(error));
    }
}
