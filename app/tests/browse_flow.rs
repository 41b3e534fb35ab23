//! End-to-end tests of the application store over a scripted catalog
//!
//! Responses are held back with deferred gates so completion order can be
//! chosen independently of the order the queries were issued in.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use pawfetch::coordinator::FetchStatus;
use pawfetch::storage::{favorites_key, USER_KEY};
use pawfetch::{build_store, AppAction, AppEnvironment, AppStore, MatchStatus, SessionStatus, User};
use pawfetch_catalog::{DogId, Method};
use pawfetch_core::environment::KeyValueStore;
use pawfetch_runtime::EffectHandle;
use pawfetch_testing::{fixtures, init_test_tracing, InMemoryKeyValueStore, MockTransport};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

struct Harness {
    store: AppStore<MockTransport>,
    transport: MockTransport,
    storage: InMemoryKeyValueStore,
}

impl Harness {
    fn new(storage: InMemoryKeyValueStore) -> Self {
        init_test_tracing();
        let transport = MockTransport::new();
        transport.respond(Method::Get, "/dogs/breeds", 200, fixtures::breeds_body(&["Akita", "Beagle"]));
        let store = build_store(
            AppEnvironment::new(transport.clone(), Arc::new(storage.clone())),
            10,
        );
        Self {
            store,
            transport,
            storage,
        }
    }

    /// Sign in as Ada with a first page holding one dog
    async fn signed_in() -> Self {
        let harness = Self::new(InMemoryKeyValueStore::new());
        harness.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&["d0"], 1));
        harness.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("d0", "First")]));
        harness
            .settle(AppAction::LoginSucceeded {
                user: User::new("Ada", "ada@example.com"),
            })
            .await;
        harness
    }

    async fn send(&self, action: AppAction) -> EffectHandle {
        self.store.send(action).await.unwrap()
    }

    async fn settle(&self, action: AppAction) {
        let mut handle = self.store.send_cascading(action).await.unwrap();
        handle.wait_with_timeout(WAIT).await.unwrap();
    }

    async fn wait_for_requests(&self, path: &str, count: usize) {
        tokio::time::timeout(WAIT, async {
            while self.transport.requests_to(path).len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("request never arrived");
    }

    async fn dog_names(&self) -> Vec<String> {
        self.store
            .state(|s| s.results.dogs().iter().map(|d| d.name.clone()).collect())
            .await
    }
}

fn query_value(request: &pawfetch_catalog::ApiRequest, key: &str) -> Option<String> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

#[tokio::test]
async fn newer_query_wins_when_older_response_arrives_last() {
    let h = Harness::signed_in().await;
    assert_eq!(h.dog_names().await, vec!["First"]);

    let older_gate = h.transport.defer(Method::Get, "/dogs/search");
    let newer_gate = h.transport.defer(Method::Get, "/dogs/search");

    let mut older = h.send(AppAction::ToggleBreed { breed: "Akita".to_string() }).await;
    h.wait_for_requests("/dogs/search", 2).await;
    let mut newer = h.send(AppAction::ToggleBreed { breed: "Boxer".to_string() }).await;
    h.wait_for_requests("/dogs/search", 3).await;

    // Newer completes first
    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("b", "Bo")]));
    newer_gate.release(200, fixtures::search_body(&["b"], 1));
    newer.wait_with_timeout(WAIT).await.unwrap();
    assert_eq!(h.dog_names().await, vec!["Bo"]);

    // Older completes afterwards and must not overwrite
    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("a", "Ace")]));
    older_gate.release(200, fixtures::search_body(&["a"], 1));
    older.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(h.dog_names().await, vec!["Bo"]);
    let breeds = h.store.state(|s| s.query.breeds().clone()).await;
    assert!(breeds.contains("Akita") && breeds.contains("Boxer"));
}

#[tokio::test]
async fn newer_query_wins_when_older_response_arrives_first() {
    let h = Harness::signed_in().await;

    let older_gate = h.transport.defer(Method::Get, "/dogs/search");
    let newer_gate = h.transport.defer(Method::Get, "/dogs/search");

    let mut older = h.send(AppAction::NextPage).await;
    h.wait_for_requests("/dogs/search", 2).await;
    let mut newer = h.send(AppAction::NextPage).await;
    h.wait_for_requests("/dogs/search", 3).await;

    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("p2", "PageTwo")]));
    older_gate.release(200, fixtures::search_body(&["p2"], 30));
    older.wait_with_timeout(WAIT).await.unwrap();

    // Still loading: the result on screen belongs to nobody yet
    assert!(h.store.state(|s| s.results.is_loading()).await);

    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("p3", "PageThree")]));
    newer_gate.release(200, fixtures::search_body(&["p3"], 30));
    newer.wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(h.dog_names().await, vec!["PageThree"]);
    assert_eq!(h.store.state(|s| s.query.page()).await, 3);
}

#[tokio::test]
async fn stale_failure_does_not_replace_newer_page() {
    let h = Harness::signed_in().await;

    let older_gate = h.transport.defer(Method::Get, "/dogs/search");
    let mut older = h.send(AppAction::ToggleSortField { field: pawfetch_catalog::SortField::Age }).await;
    h.wait_for_requests("/dogs/search", 2).await;

    h.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&[], 0));
    h.settle(AppAction::Refresh).await;

    older_gate.release(500, "boom");
    older.wait_with_timeout(WAIT).await.unwrap();

    let status = h.store.state(|s| s.results.status().clone()).await;
    assert_eq!(status, FetchStatus::Loaded(pawfetch_catalog::DogPage::default()));
    assert_eq!(h.store.state(|s| s.notification.clone()).await, None);
}

#[tokio::test]
async fn next_from_first_page_requests_offset_of_one_page() {
    let h = Harness::signed_in().await;
    h.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&[], 25));

    h.settle(AppAction::PreviousPage).await;
    assert_eq!(h.store.state(|s| s.query.page()).await, 1);
    assert_eq!(h.transport.requests_to("/dogs/search").len(), 1);

    h.settle(AppAction::NextPage).await;

    let requests = h.transport.requests_to("/dogs/search");
    let last = requests.last().unwrap();
    assert_eq!(query_value(last, "page").as_deref(), Some("2"));
    assert_eq!(query_value(last, "from").as_deref(), Some("10"));
    assert_eq!(query_value(last, "size").as_deref(), Some("10"));

    // Past the end is an empty page, not an error
    let status = h.store.state(|s| s.results.status().clone()).await;
    assert!(matches!(status, FetchStatus::Loaded(page) if page.dogs.is_empty() && page.total == 25));
}

#[tokio::test]
async fn match_shows_the_matched_dog() {
    let h = Harness::signed_in().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("d1") }).await;
    h.settle(AppAction::AddFavorite { id: DogId::new("d2") }).await;

    h.transport.enqueue(Method::Post, "/dogs/match", 200, fixtures::match_body("d1"));
    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("d1", "Rex")]));
    h.settle(AppAction::RequestMatch).await;

    let matched = h.store.state(|s| s.matched_dog().map(|d| d.name.clone())).await;
    assert_eq!(matched.as_deref(), Some("Rex"));

    let match_request = &h.transport.requests_to("/dogs/match")[0];
    assert_eq!(match_request.body, Some(serde_json::json!(["d1", "d2"])));
}

#[tokio::test]
async fn match_rejection_notifies_without_a_match() {
    let h = Harness::signed_in().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("d1") }).await;

    h.transport.enqueue(Method::Post, "/dogs/match", 500, "");
    h.settle(AppAction::RequestMatch).await;

    let (matching, notification) = h
        .store
        .state(|s| (s.matching.clone(), s.notification.clone()))
        .await;
    assert_eq!(matching, MatchStatus::Idle);
    assert!(notification.unwrap().starts_with("Failed to find a match"));
}

#[tokio::test]
async fn unauthorized_fetch_signs_out() {
    let h = Harness::signed_in().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("d1") }).await;
    assert!(h.storage.contains(USER_KEY));

    h.transport.enqueue(Method::Get, "/dogs/search", 401, "Unauthorized");
    h.settle(AppAction::NextPage).await;

    let (session, status, favorites) = h
        .store
        .state(|s| (s.session.clone(), s.results.status().clone(), s.favorites.current_set().len()))
        .await;
    assert_eq!(session, SessionStatus::SignedOut);
    assert_eq!(status, FetchStatus::Idle);
    assert_eq!(favorites, 0);
    assert!(!h.storage.contains(USER_KEY));

    // Favorites remain stored for the next sign-in
    assert!(h.storage.contains(&favorites_key("ada@example.com")));
}

#[tokio::test]
async fn favorites_are_isolated_per_identity() {
    let h = Harness::signed_in().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("a1") }).await;

    h.transport.enqueue(Method::Post, "/auth/logout", 200, "OK");
    h.settle(AppAction::Logout).await;
    assert_eq!(h.store.state(|s| s.session.clone()).await, SessionStatus::SignedOut);

    h.transport.enqueue(Method::Post, "/auth/login", 200, "OK");
    h.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&[], 0));
    h.settle(AppAction::Login {
        name: "Bea".to_string(),
        email: "bea@example.com".to_string(),
    })
    .await;

    assert!(h.store.state(|s| s.favorites.current_set().is_empty()).await);
    h.settle(AppAction::AddFavorite { id: DogId::new("b1") }).await;

    assert_eq!(
        h.storage.get(&favorites_key("ada@example.com")).unwrap().as_deref(),
        Some(r#"["a1"]"#)
    );
    assert_eq!(
        h.storage.get(&favorites_key("bea@example.com")).unwrap().as_deref(),
        Some(r#"["b1"]"#)
    );
    assert_eq!(
        h.storage.get(USER_KEY).unwrap(),
        Some(fixtures::user_json("Bea", "bea@example.com"))
    );
}

#[tokio::test]
async fn logout_failure_keeps_session() {
    let h = Harness::signed_in().await;

    h.transport.enqueue(Method::Post, "/auth/logout", 500, "");
    h.settle(AppAction::Logout).await;

    let session = h.store.state(|s| s.session.clone()).await;
    assert!(session.is_signed_in());
    assert!(h.storage.contains(USER_KEY));
}

#[tokio::test]
async fn restore_without_stored_user_makes_no_requests() {
    let h = Harness::new(InMemoryKeyValueStore::new());

    h.settle(AppAction::RestoreSession).await;

    assert_eq!(h.store.state(|s| s.session.clone()).await, SessionStatus::SignedOut);
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn restore_with_valid_session_loads_breeds_and_first_page() {
    let storage = InMemoryKeyValueStore::with_entries([
        (USER_KEY, r#"{"name":"Ada","email":"ada@example.com"}"#),
        ("favorites_ada@example.com", r#"["d7"]"#),
    ]);
    let h = Harness::new(storage);
    h.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&["d7"], 1));
    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("d7", "Lucky")]));

    h.settle(AppAction::RestoreSession).await;

    let (session, breeds, favorite) = h
        .store
        .state(|s| (s.session.clone(), s.breeds.clone(), s.favorites.contains(&DogId::new("d7"))))
        .await;
    assert!(session.is_signed_in());
    assert_eq!(breeds, vec!["Akita", "Beagle"]);
    assert!(favorite);
    assert_eq!(h.dog_names().await, vec!["Lucky"]);
}

#[tokio::test]
async fn restore_with_expired_session_removes_stored_user() {
    let storage = InMemoryKeyValueStore::with_entries([(USER_KEY, r#"{"name":"Ada","email":"ada@example.com"}"#)]);
    let h = Harness::new(storage);
    h.transport.enqueue(Method::Get, "/dogs/breeds", 401, "");

    h.settle(AppAction::RestoreSession).await;

    assert_eq!(h.store.state(|s| s.session.clone()).await, SessionStatus::SignedOut);
    assert!(!h.storage.contains(USER_KEY));
    assert!(h.transport.requests_to("/dogs/search").is_empty());
}

impl Harness {
    /// Log out, then sign in as Bea with an empty first page
    async fn switch_to_bea(&self) {
        self.transport.enqueue(Method::Post, "/auth/logout", 200, "OK");
        self.settle(AppAction::Logout).await;

        self.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&[], 0));
        self.settle(AppAction::LoginSucceeded {
            user: User::new("Bea", "bea@example.com"),
        })
        .await;
    }
}

#[tokio::test]
async fn late_unauthorized_from_previous_session_is_ignored() {
    let h = Harness::signed_in().await;

    let ada_gate = h.transport.defer(Method::Get, "/dogs/search");
    let mut ada_fetch = h.send(AppAction::NextPage).await;
    h.wait_for_requests("/dogs/search", 2).await;

    h.switch_to_bea().await;
    assert_eq!(h.transport.requests_to("/dogs/search").len(), 3);

    ada_gate.release(401, "Unauthorized");
    ada_fetch.wait_with_timeout(WAIT).await.unwrap();

    let (session, status, notification) = h
        .store
        .state(|s| (s.session.clone(), s.results.status().clone(), s.notification.clone()))
        .await;
    assert_eq!(session, SessionStatus::SignedIn(User::new("Bea", "bea@example.com")));
    assert_eq!(status, FetchStatus::Loaded(pawfetch_catalog::DogPage::default()));
    assert_eq!(notification, None);
    assert_eq!(
        h.storage.get(USER_KEY).unwrap(),
        Some(fixtures::user_json("Bea", "bea@example.com"))
    );
}

#[tokio::test]
async fn late_unauthorized_within_session_after_newer_success_is_ignored() {
    let h = Harness::signed_in().await;

    let older_gate = h.transport.defer(Method::Get, "/dogs/search");
    let mut older = h.send(AppAction::NextPage).await;
    h.wait_for_requests("/dogs/search", 2).await;

    h.transport.enqueue(Method::Get, "/dogs/search", 200, fixtures::search_body(&[], 0));
    h.settle(AppAction::Refresh).await;

    older_gate.release(401, "");
    older.wait_with_timeout(WAIT).await.unwrap();

    assert!(h.store.state(|s| s.session.is_signed_in()).await);
    assert!(h.storage.contains(USER_KEY));
}

#[tokio::test]
async fn match_from_previous_session_never_reaches_next_user() {
    let h = Harness::signed_in().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("a1") }).await;

    let ada_gate = h.transport.defer(Method::Post, "/dogs/match");
    let mut ada_match = h.send(AppAction::RequestMatch).await;
    h.wait_for_requests("/dogs/match", 1).await;

    h.switch_to_bea().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("b1") }).await;

    let bea_gate = h.transport.defer(Method::Post, "/dogs/match");
    let mut bea_match = h.send(AppAction::RequestMatch).await;
    h.wait_for_requests("/dogs/match", 2).await;

    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("a1", "AdasDog")]));
    ada_gate.release(200, fixtures::match_body("a1"));
    ada_match.wait_with_timeout(WAIT).await.unwrap();

    let (matched, pending) = h
        .store
        .state(|s| (s.matched_dog().cloned(), s.matching.pending_request()))
        .await;
    assert_eq!(matched, None);
    assert!(pending.is_some());

    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("b1", "BeasDog")]));
    bea_gate.release(200, fixtures::match_body("b1"));
    bea_match.wait_with_timeout(WAIT).await.unwrap();

    let matched = h.store.state(|s| s.matched_dog().map(|d| d.name.clone())).await;
    assert_eq!(matched.as_deref(), Some("BeasDog"));
}

#[tokio::test]
async fn match_dismissed_then_requested_again_shows_only_the_new_result() {
    let h = Harness::signed_in().await;
    h.settle(AppAction::AddFavorite { id: DogId::new("d1") }).await;
    h.settle(AppAction::AddFavorite { id: DogId::new("d2") }).await;

    let first_gate = h.transport.defer(Method::Post, "/dogs/match");
    let mut first = h.send(AppAction::RequestMatch).await;
    h.wait_for_requests("/dogs/match", 1).await;

    h.settle(AppAction::DismissMatch).await;

    let second_gate = h.transport.defer(Method::Post, "/dogs/match");
    let mut second = h.send(AppAction::RequestMatch).await;
    h.wait_for_requests("/dogs/match", 2).await;

    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("d1", "Old")]));
    first_gate.release(200, fixtures::match_body("d1"));
    first.wait_with_timeout(WAIT).await.unwrap();
    assert_eq!(h.store.state(|s| s.matched_dog().cloned()).await, None);

    h.transport.enqueue(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("d2", "New")]));
    second_gate.release(200, fixtures::match_body("d2"));
    second.wait_with_timeout(WAIT).await.unwrap();

    let matched = h.store.state(|s| s.matched_dog().map(|d| d.name.clone())).await;
    assert_eq!(matched.as_deref(), Some("New"));
}
