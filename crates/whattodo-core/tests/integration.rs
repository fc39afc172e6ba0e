//! End-to-end tests of the client crate against the in-memory mock backend.
//!
//! Each test boots its own server on an ephemeral port, so tests stay
//! independent and can inspect the server's request log for exact
//! request-shape assertions.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::net::TcpListener;

use whattodo_core::api::{
    ApiClient, AuthClient, SocialClient, StatsClient, TasksClient, TimelineClient,
};
use whattodo_core::auth::{AuthSession, MemoryTokenStore, SessionState, TokenStore};
use whattodo_core::config::ClientConfig;
use whattodo_core::models::{PrivacyLevel, TaskCreate, TaskUpdate, User, UserCreate};
use whattodo_mock_server::{serve, ServerState};

struct TestServer {
    state: Arc<ServerState>,
    base_url: String,
}

async fn start_server() -> TestServer {
    let state = Arc::new(ServerState::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(listener, state.clone()));
    TestServer { state, base_url }
}

fn client(server: &TestServer) -> ApiClient {
    ApiClient::new(
        ClientConfig::new(server.base_url.clone()),
        Arc::new(MemoryTokenStore::new()),
    )
    .unwrap()
}

fn client_with_store(server: &TestServer, store: Arc<dyn TokenStore>) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.base_url.clone()), store).unwrap()
}

/// Register a fresh account, log in, and leave the token in the store.
async fn signed_in(server: &TestServer, username: &str) -> (ApiClient, User) {
    let api = client(server);
    let auth = AuthClient::new(&api);
    auth.register(&UserCreate::new(
        format!("{username}@example.com"),
        username,
        "secret",
    ))
    .await
    .unwrap();

    let token = auth.login(username, "secret").await.unwrap();
    api.token_store().set(&token.access_token).unwrap();
    let user = auth.current_user().await.unwrap();
    (api, user)
}

// --- session restore ---

#[tokio::test]
async fn restore_without_token_makes_no_profile_request() {
    let server = start_server().await;
    let api = client(&server);
    let session = AuthSession::new(&api);

    assert_eq!(session.restore().await, SessionState::Unauthenticated);
    assert!(session.last_error().is_none());
    assert_eq!(server.state.request_count("GET", "/api/v1/users/me"), 0);
}

#[tokio::test]
async fn restore_with_stale_token_clears_it() {
    let server = start_server().await;
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("stale-token"));
    let api = client_with_store(&server, store.clone());
    let session = AuthSession::new(&api);

    assert_eq!(session.restore().await, SessionState::Unauthenticated);
    assert_eq!(store.get().unwrap(), None);
    assert_eq!(server.state.request_count("GET", "/api/v1/users/me"), 1);
}

#[tokio::test]
async fn restore_with_valid_token_authenticates() {
    let server = start_server().await;
    let (api, user) = signed_in(&server, "alice").await;

    // A second session sharing the same store picks the token up.
    let session = AuthSession::new(&api);
    let state = session.restore().await;
    assert_eq!(state, SessionState::Authenticated(user));
    assert!(session.is_authenticated());
}

// --- login ---

#[tokio::test]
async fn login_persists_token_and_authenticates() {
    let server = start_server().await;
    let api = client(&server);
    let auth = AuthClient::new(&api);
    auth.register(&UserCreate::new("alice@example.com", "alice", "secret"))
        .await
        .unwrap();

    let session = AuthSession::new(&api);
    session.restore().await;

    assert!(session.login("alice", "secret").await);
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().username, "alice");
    assert!(session.last_error().is_none());

    let stored = api.token_store().get().unwrap();
    assert!(stored.unwrap().starts_with("mock-token-"));
}

#[tokio::test]
async fn login_with_wrong_password_reports_backend_detail() {
    let server = start_server().await;
    let api = client(&server);
    let auth = AuthClient::new(&api);
    auth.register(&UserCreate::new("alice@example.com", "alice", "secret"))
        .await
        .unwrap();

    let session = AuthSession::new(&api);
    session.restore().await;

    assert!(!session.login("alice", "wrong").await);
    assert_eq!(
        session.last_error().as_deref(),
        Some("Incorrect username or password")
    );
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(api.token_store().get().unwrap(), None);
}

#[tokio::test]
async fn login_clears_previous_error_on_success() {
    let server = start_server().await;
    let api = client(&server);
    let auth = AuthClient::new(&api);
    auth.register(&UserCreate::new("alice@example.com", "alice", "secret"))
        .await
        .unwrap();

    let session = AuthSession::new(&api);
    session.restore().await;

    assert!(!session.login("alice", "wrong").await);
    assert!(session.last_error().is_some());

    assert!(session.login("alice", "secret").await);
    assert!(session.last_error().is_none());
}

// --- register ---

#[tokio::test]
async fn register_does_not_log_in() {
    let server = start_server().await;
    let api = client(&server);
    let session = AuthSession::new(&api);
    session.restore().await;

    let user = UserCreate::new("carol@example.com", "carol", "pw");
    assert!(session.register(&user).await);

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(api.token_store().get().unwrap(), None);
    assert_eq!(
        server.state.request_count("POST", "/api/v1/login/access-token"),
        0
    );
}

#[tokio::test]
async fn register_duplicate_reports_backend_detail() {
    let server = start_server().await;
    let api = client(&server);
    let session = AuthSession::new(&api);
    session.restore().await;

    let user = UserCreate::new("carol@example.com", "carol", "pw");
    assert!(session.register(&user).await);
    assert!(!session.register(&user).await);
    assert_eq!(
        session.last_error().as_deref(),
        Some("A user with this email already exists")
    );
}

// --- logout ---

#[tokio::test]
async fn logout_clears_token_and_state() {
    let server = start_server().await;
    let api = client(&server);
    let auth = AuthClient::new(&api);
    auth.register(&UserCreate::new("alice@example.com", "alice", "secret"))
        .await
        .unwrap();

    let session = AuthSession::new(&api);
    session.restore().await;
    assert!(session.login("alice", "secret").await);

    session.logout().await;
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(api.token_store().get().unwrap(), None);
}

// --- tasks ---

#[tokio::test]
async fn create_then_list_round_trips() {
    let server = start_server().await;
    let (api, user) = signed_in(&server, "alice").await;
    let tasks = TasksClient::new(&api);

    let first = tasks.create(&TaskCreate::new("First")).await.unwrap();
    let second = tasks
        .create(&TaskCreate {
            title: "Second".to_string(),
            description: Some("with details".to_string()),
            privacy_level: PrivacyLevel::Public,
            ..TaskCreate::default()
        })
        .await
        .unwrap();

    assert_eq!(first.owner_id, user.id);
    assert_eq!(first.privacy_level, PrivacyLevel::Followers);
    assert_eq!(second.description.as_deref(), Some("with details"));

    let all = tasks.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].title, "Second");
}

#[tokio::test]
async fn update_sends_exactly_one_put_with_only_set_fields() {
    let server = start_server().await;
    let (api, _) = signed_in(&server, "alice").await;
    let tasks = TasksClient::new(&api);

    let created = tasks.create(&TaskCreate::new("Write tests")).await.unwrap();
    let updated = tasks
        .update(created.id, &TaskUpdate::completed(true))
        .await
        .unwrap();

    assert!(updated.is_completed);
    assert_eq!(updated.title, "Write tests");

    let path = format!("/api/v1/tasks/{}", created.id);
    assert_eq!(server.state.request_count("PUT", &path), 1);
    let puts: Vec<_> = server
        .state
        .requests()
        .into_iter()
        .filter(|r| r.method == "PUT")
        .collect();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body, r#"{"is_completed":true}"#);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let server = start_server().await;
    let (api, _) = signed_in(&server, "alice").await;
    let tasks = TasksClient::new(&api);

    let created = tasks.create(&TaskCreate::new("Ephemeral")).await.unwrap();
    tasks.delete(created.id).await.unwrap();

    let err = tasks.get(created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.detail().as_deref(), Some("Task not found"));
}

#[tokio::test]
async fn list_without_token_is_an_auth_failure() {
    let server = start_server().await;
    let api = client(&server);

    let err = TasksClient::new(&api).list().await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.detail().as_deref(), Some("Not authenticated"));
}

// --- timeline and social ---

#[tokio::test]
async fn timeline_respects_follows_and_privacy() {
    let server = start_server().await;
    let (alice_api, _) = signed_in(&server, "alice").await;
    let (bob_api, bob) = signed_in(&server, "bob").await;

    let bob_tasks = TasksClient::new(&bob_api);
    for (title, privacy) in [
        ("Bob public", PrivacyLevel::Public),
        ("Bob followers", PrivacyLevel::Followers),
        ("Bob private", PrivacyLevel::Private),
    ] {
        bob_tasks
            .create(&TaskCreate {
                title: title.to_string(),
                privacy_level: privacy,
                ..TaskCreate::default()
            })
            .await
            .unwrap();
    }

    let timeline = TimelineClient::new(&alice_api);
    assert!(timeline.timeline().await.unwrap().is_empty());

    SocialClient::new(&alice_api).follow(bob.id).await.unwrap();

    let items = timeline.timeline().await.unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert!(titles.contains(&"Bob public"));
    assert!(titles.contains(&"Bob followers"));
    assert!(!titles.contains(&"Bob private"));
    assert_eq!(items[0].owner.username, "bob");
    assert_eq!(items[0].likes_count, 0);
    assert!(!items[0].liked_by_me);

    let explore: Vec<String> = timeline
        .explore()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.title)
        .collect();
    assert_eq!(explore, vec!["Bob public"]);
}

#[tokio::test]
async fn likes_show_up_in_the_timeline() {
    let server = start_server().await;
    let (alice_api, alice) = signed_in(&server, "alice").await;
    let (bob_api, bob) = signed_in(&server, "bob").await;

    let task = TasksClient::new(&bob_api)
        .create(&TaskCreate {
            title: "Likeable".to_string(),
            privacy_level: PrivacyLevel::Public,
            ..TaskCreate::default()
        })
        .await
        .unwrap();

    let social = SocialClient::new(&alice_api);
    social.follow(bob.id).await.unwrap();
    social.like(task.id).await.unwrap();

    assert_eq!(social.likes_count(task.id).await.unwrap(), 1);
    assert_eq!(social.liked_user_ids(task.id).await.unwrap(), vec![alice.id]);

    let items = TimelineClient::new(&alice_api).timeline().await.unwrap();
    assert_eq!(items[0].likes_count, 1);
    assert!(items[0].liked_by_me);

    social.unlike(task.id).await.unwrap();
    assert_eq!(social.likes_count(task.id).await.unwrap(), 0);

    let err = social.unlike(task.id).await.unwrap_err();
    assert_eq!(err.detail().as_deref(), Some("Task not liked"));
}

#[tokio::test]
async fn follow_lists_work_both_ways() {
    let server = start_server().await;
    let (alice_api, alice) = signed_in(&server, "alice").await;
    let (bob_api, bob) = signed_in(&server, "bob").await;

    let alice_social = SocialClient::new(&alice_api);
    alice_social.follow(bob.id).await.unwrap();

    let following = alice_social.following().await.unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].username, "bob");

    let followers = SocialClient::new(&bob_api).followers().await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, alice.id);

    let err = alice_social.follow(bob.id).await.unwrap_err();
    assert_eq!(err.detail().as_deref(), Some("Already following this user"));

    alice_social.unfollow(bob.id).await.unwrap();
    assert!(alice_social.following().await.unwrap().is_empty());
}

// --- stats ---

#[tokio::test]
async fn stats_reflect_created_tasks() {
    let server = start_server().await;
    let (api, _) = signed_in(&server, "alice").await;
    let tasks = TasksClient::new(&api);

    for (title, done) in [("One", true), ("Two", true), ("Three", false)] {
        tasks
            .create(&TaskCreate {
                title: title.to_string(),
                is_completed: done,
                ..TaskCreate::default()
            })
            .await
            .unwrap();
    }

    let stats = StatsClient::new(&api);
    let overview = stats.overview().await.unwrap();
    assert_eq!(overview.total_tasks, 3);
    assert_eq!(overview.completed_tasks, 2);
    assert!((overview.completion_rate - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(overview.daily_stats.len(), 7);

    let streak = stats.streak().await.unwrap();
    assert_eq!(streak.current_streak, 1);
    assert!(streak.last_completed_date.is_some());
}

// --- configuration ---

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = start_server().await;
    let api = ApiClient::new(
        ClientConfig::new(format!("{}/", server.base_url)),
        Arc::new(MemoryTokenStore::new()),
    )
    .unwrap();
    let auth = AuthClient::new(&api);

    let user = auth
        .register(&UserCreate::new("dot@example.com", "dot", "pw"))
        .await
        .unwrap();
    assert_eq!(user.username, "dot");
}
