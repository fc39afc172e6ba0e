//! In-memory WhatToDo backend.
//!
//! Implements the `/api/v1` wire contract the real service exposes: multipart
//! credential exchange, registration, task CRUD with partial updates,
//! timeline/explore feeds with privacy filtering, likes, follows, and
//! completion stats. State lives in process memory behind an `Arc` so tests
//! can seed and inspect it, and a middleware records every request (method,
//! path, body) for exact request-shape assertions.
//!
//! Wire types are defined here independently of the client crate; the
//! integration tests catch schema drift between the two.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Body;
use axum::extract::{Multipart, Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::debug;

pub type SharedState = Arc<ServerState>;

type ApiResult<T> = Result<T, Response>;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskOut {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub privacy_level: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_privacy")]
    pub privacy_level: String,
}

/// Absent fields stay untouched, like the real backend's
/// exclude-unset partial update.
#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub privacy_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenOut {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct MessageOut {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineItemOut {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub privacy_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: i64,
    pub owner: UserOut,
    pub likes_count: i64,
    pub liked_by_me: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakInfoOut {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_completed_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DailyStatsOut {
    pub date: NaiveDate,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct PeriodStatsOut {
    pub period: String,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct OverallStatsOut {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: f64,
    pub streak_info: StreakInfoOut,
    pub daily_stats: Vec<DailyStatsOut>,
    pub weekly_stats: Vec<PeriodStatsOut>,
    pub monthly_stats: Vec<PeriodStatsOut>,
}

fn default_true() -> bool {
    true
}

fn default_privacy() -> String {
    "followers".to_string()
}

#[derive(Debug, Clone)]
struct StoredUser {
    id: i64,
    email: String,
    username: String,
    password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl StoredUser {
    fn out(&self) -> UserOut {
        UserOut {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: String,
    pub path: String,
    pub body: String,
}

// ============================================================================
// State
// ============================================================================

pub struct ServerState {
    users: RwLock<HashMap<i64, StoredUser>>,
    tasks: RwLock<HashMap<i64, TaskOut>>,
    /// (task_id, user_id)
    likes: RwLock<HashSet<(i64, i64)>>,
    /// (follower_id, followed_id)
    follows: RwLock<HashSet<(i64, i64)>>,
    tokens: RwLock<HashMap<String, i64>>,
    next_user_id: AtomicI64,
    next_task_id: AtomicI64,
    next_token: AtomicI64,
    requests: Mutex<Vec<RequestRecord>>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            likes: RwLock::new(HashSet::new()),
            follows: RwLock::new(HashSet::new()),
            tokens: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
            next_task_id: AtomicI64::new(1),
            next_token: AtomicI64::new(1),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ServerState {
    fn record(&self, record: RequestRecord) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Everything the server has received, in arrival order.
    pub fn requests(&self) -> Vec<RequestRecord> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many received requests match a method and exact path.
    pub fn request_count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    async fn collect_timeline<F>(&self, me_id: i64, keep: F) -> Vec<TimelineItemOut>
    where
        F: Fn(&TaskOut) -> bool,
    {
        let tasks = self.tasks.read().await;
        let users = self.users.read().await;
        let likes = self.likes.read().await;

        let mut selected: Vec<&TaskOut> = tasks.values().filter(|t| keep(t)).collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        selected
            .into_iter()
            .filter_map(|task| {
                let owner = users.get(&task.owner_id)?;
                Some(TimelineItemOut {
                    id: task.id,
                    title: task.title.clone(),
                    description: task.description.clone(),
                    is_completed: task.is_completed,
                    due_date: task.due_date,
                    privacy_level: task.privacy_level.clone(),
                    created_at: task.created_at,
                    updated_at: task.updated_at,
                    owner_id: task.owner_id,
                    owner: owner.out(),
                    likes_count: likes.iter().filter(|(tid, _)| *tid == task.id).count() as i64,
                    liked_by_me: likes.contains(&(task.id, me_id)),
                })
            })
            .collect()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn app() -> Router {
    app_with_state(Arc::new(ServerState::default()))
}

pub fn app_with_state(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/login/access-token", post(login))
        .route("/api/v1/users/", post(register))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/users/followers", get(followers))
        .route("/api/v1/users/following", get(following))
        .route(
            "/api/v1/users/{user_id}/follow",
            post(follow_user).delete(unfollow_user),
        )
        .route("/api/v1/tasks/", get(list_tasks).post(create_task))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/api/v1/tasks/{id}/like",
            post(like_task).delete(unlike_task),
        )
        .route("/api/v1/tasks/{id}/likes", get(likes_count))
        .route("/api/v1/tasks/{id}/likes/users", get(likes_users))
        .route("/api/v1/timeline/", get(timeline))
        .route("/api/v1/timeline/explore", get(explore))
        .route("/api/v1/stats/overview", get(stats_overview))
        .route("/api/v1/stats/streak", get(stats_streak))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            record_request,
        ))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Buffer each request body into the log, then hand the request on intact.
async fn record_request(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return detail(StatusCode::BAD_REQUEST, "Unreadable request body"),
    };

    state.record(RequestRecord {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });
    debug!(method = %parts.method, path = %parts.uri.path(), "Request received");

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": message }))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn authed_user(state: &ServerState, headers: &HeaderMap) -> ApiResult<StoredUser> {
    let Some(token) = bearer_token(headers) else {
        return Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    let user_id = match state.tokens.read().await.get(token) {
        Some(id) => *id,
        None => {
            return Err(detail(
                StatusCode::UNAUTHORIZED,
                "Could not validate credentials",
            ))
        }
    };
    state
        .users
        .read()
        .await
        .get(&user_id)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

// ============================================================================
// Auth handlers
// ============================================================================

async fn login(
    State(state): State<SharedState>,
    mut form: Multipart,
) -> ApiResult<Json<TokenOut>> {
    let mut username = String::new();
    let mut password = String::new();

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|_| detail(StatusCode::BAD_REQUEST, "Malformed form data"))?
    {
        let name = field.name().map(str::to_string);
        let value = field
            .text()
            .await
            .map_err(|_| detail(StatusCode::BAD_REQUEST, "Malformed form data"))?;
        match name.as_deref() {
            Some("username") => username = value,
            Some("password") => password = value,
            _ => {}
        }
    }

    let user = {
        let users = state.users.read().await;
        users
            .values()
            .find(|u| (u.username == username || u.email == username) && u.password == password)
            .cloned()
    };
    let user = user.ok_or_else(|| {
        detail(StatusCode::BAD_REQUEST, "Incorrect username or password")
    })?;

    let token = format!(
        "mock-token-{}-{}",
        user.id,
        state.next_token.fetch_add(1, Ordering::SeqCst)
    );
    state.tokens.write().await.insert(token.clone(), user.id);

    Ok(Json(TokenOut {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

async fn register(
    State(state): State<SharedState>,
    Json(input): Json<RegisterUser>,
) -> ApiResult<Json<UserOut>> {
    let mut users = state.users.write().await;
    if users.values().any(|u| u.email == input.email) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "A user with this email already exists",
        ));
    }
    if users.values().any(|u| u.username == input.username) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "A user with this username already exists",
        ));
    }

    let id = state.next_user_id.fetch_add(1, Ordering::SeqCst);
    let user = StoredUser {
        id,
        email: input.email,
        username: input.username,
        password: input.password,
        is_active: input.is_active,
        created_at: Utc::now(),
    };
    users.insert(id, user.clone());
    Ok(Json(user.out()))
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> ApiResult<Json<UserOut>> {
    let user = authed_user(&state, &headers).await?;
    Ok(Json(user.out()))
}

// ============================================================================
// Task handlers
// ============================================================================

async fn list_tasks(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TaskOut>>> {
    let user = authed_user(&state, &headers).await?;
    let tasks = state.tasks.read().await;
    let mut mine: Vec<TaskOut> = tasks
        .values()
        .filter(|t| t.owner_id == user.id)
        .cloned()
        .collect();
    mine.sort_by_key(|t| t.id);
    Ok(Json(mine))
}

async fn create_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<CreateTask>,
) -> ApiResult<Json<TaskOut>> {
    let user = authed_user(&state, &headers).await?;
    let now = Utc::now();
    let task = TaskOut {
        id: state.next_task_id.fetch_add(1, Ordering::SeqCst),
        title: input.title,
        description: input.description,
        is_completed: input.is_completed,
        due_date: input.due_date,
        privacy_level: input.privacy_level,
        owner_id: user.id,
        created_at: now,
        updated_at: now,
    };
    state.tasks.write().await.insert(task.id, task.clone());
    Ok(Json(task))
}

async fn get_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskOut>> {
    let user = authed_user(&state, &headers).await?;
    let tasks = state.tasks.read().await;
    tasks
        .get(&id)
        .filter(|t| t.owner_id == user.id)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Task not found"))
}

async fn update_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTask>,
) -> ApiResult<Json<TaskOut>> {
    let user = authed_user(&state, &headers).await?;
    let mut tasks = state.tasks.write().await;
    let task = tasks
        .get_mut(&id)
        .filter(|t| t.owner_id == user.id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Task not found"))?;

    if let Some(title) = input.title {
        task.title = title;
    }
    if let Some(description) = input.description {
        task.description = Some(description);
    }
    if let Some(is_completed) = input.is_completed {
        task.is_completed = is_completed;
    }
    if let Some(due_date) = input.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(privacy_level) = input.privacy_level {
        task.privacy_level = privacy_level;
    }
    task.updated_at = Utc::now();

    Ok(Json(task.clone()))
}

async fn delete_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let user = authed_user(&state, &headers).await?;
    let mut tasks = state.tasks.write().await;
    let removed = tasks
        .get(&id)
        .filter(|t| t.owner_id == user.id)
        .is_some();
    if !removed {
        return Err(detail(StatusCode::NOT_FOUND, "Task not found"));
    }
    tasks.remove(&id);
    state.likes.write().await.retain(|(tid, _)| *tid != id);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Like handlers
// ============================================================================

async fn task_exists(state: &ServerState, id: i64) -> ApiResult<()> {
    if state.tasks.read().await.contains_key(&id) {
        Ok(())
    } else {
        Err(detail(StatusCode::NOT_FOUND, "Task not found"))
    }
}

async fn like_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageOut>> {
    let user = authed_user(&state, &headers).await?;
    task_exists(&state, id).await?;

    let mut likes = state.likes.write().await;
    if !likes.insert((id, user.id)) {
        return Err(detail(StatusCode::BAD_REQUEST, "Already liked this task"));
    }
    Ok(Json(MessageOut {
        message: format!("Liked task {id}"),
    }))
}

async fn unlike_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageOut>> {
    let user = authed_user(&state, &headers).await?;
    task_exists(&state, id).await?;

    let mut likes = state.likes.write().await;
    if !likes.remove(&(id, user.id)) {
        return Err(detail(StatusCode::BAD_REQUEST, "Task not liked"));
    }
    Ok(Json(MessageOut {
        message: format!("Unliked task {id}"),
    }))
}

async fn likes_count(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<i64>> {
    task_exists(&state, id).await?;
    let likes = state.likes.read().await;
    Ok(Json(likes.iter().filter(|(tid, _)| *tid == id).count() as i64))
}

async fn likes_users(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<i64>>> {
    task_exists(&state, id).await?;
    let likes = state.likes.read().await;
    let mut user_ids: Vec<i64> = likes
        .iter()
        .filter(|(tid, _)| *tid == id)
        .map(|(_, uid)| *uid)
        .collect();
    user_ids.sort_unstable();
    Ok(Json(user_ids))
}

// ============================================================================
// Follow handlers
// ============================================================================

async fn follow_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<MessageOut>> {
    let me = authed_user(&state, &headers).await?;
    if user_id == me.id {
        return Err(detail(StatusCode::BAD_REQUEST, "You cannot follow yourself"));
    }
    if !state.users.read().await.contains_key(&user_id) {
        return Err(detail(StatusCode::NOT_FOUND, "User not found"));
    }

    let mut follows = state.follows.write().await;
    if !follows.insert((me.id, user_id)) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Already following this user",
        ));
    }
    Ok(Json(MessageOut {
        message: format!("Now following user {user_id}"),
    }))
}

async fn unfollow_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<MessageOut>> {
    let me = authed_user(&state, &headers).await?;
    if !state.users.read().await.contains_key(&user_id) {
        return Err(detail(StatusCode::NOT_FOUND, "User not found"));
    }

    let mut follows = state.follows.write().await;
    if !follows.remove(&(me.id, user_id)) {
        return Err(detail(StatusCode::BAD_REQUEST, "Not following this user"));
    }
    Ok(Json(MessageOut {
        message: format!("Unfollowed user {user_id}"),
    }))
}

async fn followers(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<UserOut>>> {
    let me = authed_user(&state, &headers).await?;
    let follows = state.follows.read().await;
    let users = state.users.read().await;
    let mut list: Vec<UserOut> = follows
        .iter()
        .filter(|(_, followed)| *followed == me.id)
        .filter_map(|(follower, _)| users.get(follower).map(StoredUser::out))
        .collect();
    list.sort_by_key(|u| u.id);
    Ok(Json(list))
}

async fn following(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<UserOut>>> {
    let me = authed_user(&state, &headers).await?;
    let follows = state.follows.read().await;
    let users = state.users.read().await;
    let mut list: Vec<UserOut> = follows
        .iter()
        .filter(|(follower, _)| *follower == me.id)
        .filter_map(|(_, followed)| users.get(followed).map(StoredUser::out))
        .collect();
    list.sort_by_key(|u| u.id);
    Ok(Json(list))
}

// ============================================================================
// Timeline handlers
// ============================================================================

async fn timeline(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TimelineItemOut>>> {
    let me = authed_user(&state, &headers).await?;

    let mut owner_ids: HashSet<i64> = {
        let follows = state.follows.read().await;
        follows
            .iter()
            .filter(|(follower, _)| *follower == me.id)
            .map(|(_, followed)| *followed)
            .collect()
    };
    owner_ids.insert(me.id);

    let items = state
        .collect_timeline(me.id, |task| {
            owner_ids.contains(&task.owner_id)
                && matches!(task.privacy_level.as_str(), "public" | "followers")
        })
        .await;
    Ok(Json(items))
}

async fn explore(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TimelineItemOut>>> {
    let me = authed_user(&state, &headers).await?;
    let items = state
        .collect_timeline(me.id, |task| task.privacy_level == "public")
        .await;
    Ok(Json(items))
}

// ============================================================================
// Stats handlers
// ============================================================================

async fn stats_overview(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<OverallStatsOut>> {
    let me = authed_user(&state, &headers).await?;
    let tasks = state.tasks.read().await;
    let mine: Vec<&TaskOut> = tasks.values().filter(|t| t.owner_id == me.id).collect();

    let total = mine.len() as i64;
    let completed = mine.iter().filter(|t| t.is_completed).count() as i64;
    let rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let streak = streak_from_dates(&completion_dates(&mine));

    let today = Utc::now().date_naive();
    let daily_stats = (0..7)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let day_total = mine
                .iter()
                .filter(|t| t.created_at.date_naive() <= day)
                .count() as i64;
            let day_completed = mine
                .iter()
                .filter(|t| t.is_completed && t.updated_at.date_naive() == day)
                .count() as i64;
            DailyStatsOut {
                date: day,
                total_tasks: day_total,
                completed_tasks: day_completed,
                completion_rate: if day_total > 0 {
                    day_completed as f64 / day_total as f64 * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    Ok(Json(OverallStatsOut {
        total_tasks: total,
        completed_tasks: completed,
        completion_rate: rate,
        streak_info: streak,
        daily_stats,
        weekly_stats: Vec::new(),
        monthly_stats: Vec::new(),
    }))
}

async fn stats_streak(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<StreakInfoOut>> {
    let me = authed_user(&state, &headers).await?;
    let tasks = state.tasks.read().await;
    let mine: Vec<&TaskOut> = tasks.values().filter(|t| t.owner_id == me.id).collect();
    Ok(Json(streak_from_dates(&completion_dates(&mine))))
}

/// Distinct days (ascending) on which the user completed a task.
fn completion_dates(tasks: &[&TaskOut]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = tasks
        .iter()
        .filter(|t| t.is_completed)
        .map(|t| t.updated_at.date_naive())
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Current streak counts consecutive days ending today or yesterday; the
/// longest streak is the longest consecutive run anywhere in the history.
fn streak_from_dates(dates: &[NaiveDate]) -> StreakInfoOut {
    let Some(&last) = dates.last() else {
        return StreakInfoOut {
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
        };
    };

    let today = Utc::now().date_naive();
    let mut current = 0i64;
    if (today - last).num_days() <= 1 {
        current = 1;
        let mut cursor = last;
        for &day in dates.iter().rev().skip(1) {
            if (cursor - day).num_days() == 1 {
                current += 1;
                cursor = day;
            } else {
                break;
            }
        }
    }

    let mut longest = 1i64;
    let mut run = 1i64;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
    }
    longest = longest.max(run);

    StreakInfoOut {
        current_streak: current,
        longest_streak: longest,
        last_completed_date: Some(last),
    }
}
