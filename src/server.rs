use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::admin::{
    self, AdminDish, AdminOverview, AdminUser, DishDraft, DishFilter, DishStats, UserDraft,
    UserStats,
};
use crate::auth::{self, Registration, User};
use crate::config::Config;
use crate::dishes::{DishLibrary, DishRecord};
use crate::error::{AdminError, AuthError, KitchenError, RecipeError, StorageError};
use crate::generator::{build_generator, search_online, OnlineRecipe, RecipeGenerator};
use crate::kitchen::{Kitchen, Vote};
use crate::recipe::{
    improve_recipe, scale_servings, Recipe, ScaledServings, SearchMode, IMPROVEMENT_SUGGESTIONS,
};
use crate::storage::{KitchenState, KitchenStats, SqliteStore};

#[derive(Clone)]
struct ApiState {
    config: Config,
    generator: Arc<dyn RecipeGenerator>,
    db_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error: impl std::fmt::Display) -> Self {
        Self {
            status,
            message: error.to_string(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        Self::internal(error)
    }
}

impl From<RecipeError> for ApiError {
    fn from(error: RecipeError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

impl From<KitchenError> for ApiError {
    fn from(error: KitchenError) -> Self {
        let status = match &error {
            KitchenError::MissingInput(_) | KitchenError::Recipe(_) => StatusCode::BAD_REQUEST,
            KitchenError::HistoryIndex { .. } | KitchenError::FavoriteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            KitchenError::Generation(_) | KitchenError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let status = match &error {
            AuthError::InvalidCredentials | AuthError::NotSignedIn => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::MissingField(_) | AuthError::EmailTaken(_) => StatusCode::BAD_REQUEST,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, error)
    }
}

impl From<AdminError> for ApiError {
    fn from(error: AdminError) -> Self {
        match error {
            AdminError::Auth(auth) => auth.into(),
            AdminError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, error),
            AdminError::Invalid(_) => Self::new(StatusCode::BAD_REQUEST, error),
            AdminError::Storage(_) => Self::internal(error),
        }
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Deserialize)]
struct GenerateRequest {
    #[serde(default = "default_mode")]
    mode: SearchMode,
    input: String,
    #[serde(default)]
    save: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ImproveRequest {
    favorite_id: Option<String>,
    recipe: Option<Recipe>,
    feedback: String,
    #[serde(default)]
    save: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ScaleRequest {
    favorite_id: Option<String>,
    original_servings: Option<u32>,
    servings: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OnlineRequest {
    dish: String,
    /// 1-based result number.
    #[serde(default)]
    import: Option<usize>,
    #[serde(default)]
    save: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct FeedbackRequest {
    vote: Vote,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct UserSearchQuery {
    #[serde(default)]
    search: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    generator: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    recipe: Recipe,
    saved: bool,
}

#[derive(Debug, Serialize)]
struct ScaleResponse {
    scaled: ScaledServings,
}

#[derive(Debug, Serialize)]
struct OnlineResponse {
    results: Vec<OnlineRecipe>,
    imported: Option<Recipe>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    mode: SearchMode,
    entries: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FeedbackResponse {
    vote: Vote,
    count: u64,
}

#[derive(Debug, Serialize)]
struct UsersResponse {
    users: Vec<AdminUser>,
    stats: UserStats,
}

#[derive(Debug, Serialize)]
struct DishesResponse {
    dishes: Vec<AdminDish>,
    stats: DishStats,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let state = ApiState {
        db_path: config.resolved_db_path(),
        generator: build_generator(&config.generator),
        config,
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/generate", post(generate))
        .route("/v1/improve", post(improve))
        .route("/v1/improve/suggestions", get(improve_suggestions))
        .route("/v1/scale", post(scale))
        .route("/v1/dishes/search", get(search_dishes))
        .route("/v1/dishes/suggestions", get(dish_suggestions))
        .route("/v1/dishes/:key", get(dish_detail))
        .route("/v1/cuisines", get(cuisines))
        .route("/v1/online", post(online))
        .route("/v1/favorites", get(list_favorites).post(add_favorite))
        .route(
            "/v1/favorites/:id",
            get(get_favorite).delete(remove_favorite),
        )
        .route("/v1/history/:mode", get(history).delete(clear_history))
        .route("/v1/history/:mode/:index", axum::routing::delete(remove_history))
        .route("/v1/feedback", post(feedback))
        .route("/v1/stats", get(stats))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/me", get(me))
        .route("/v1/admin/overview", get(admin_overview))
        .route("/v1/admin/users", get(admin_users).post(admin_create_user))
        .route(
            "/v1/admin/users/:id",
            axum::routing::put(admin_update_user).delete(admin_delete_user),
        )
        .route("/v1/admin/users/:id/toggle-active", post(admin_toggle_user))
        .route("/v1/admin/dishes", get(admin_dishes).post(admin_create_dish))
        .route(
            "/v1/admin/dishes/:id",
            axum::routing::put(admin_update_dish).delete(admin_delete_dish),
        )
        .route(
            "/v1/admin/dishes/:id/toggle-active",
            post(admin_toggle_dish_active),
        )
        .route(
            "/v1/admin/dishes/:id/toggle-featured",
            post(admin_toggle_dish_featured),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        generator: state.generator.name().to_string(),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn generate(
    State(state): State<ApiState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<GenerateResponse> {
    let mut kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    let recipe = kitchen.generate(request.mode, &request.input).await?;
    if request.save {
        kitchen.save_favorite(recipe.clone())?;
    }
    Ok(ok(GenerateResponse {
        recipe,
        saved: request.save,
    }))
}

async fn improve(
    State(state): State<ApiState>,
    Json(request): Json<ImproveRequest>,
) -> ApiResult<Recipe> {
    let mut kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    let improved = match (request.favorite_id, request.recipe) {
        (Some(id), _) => kitchen.improve_favorite(&id, &request.feedback, request.save)?,
        (None, Some(recipe)) => {
            recipe.validate()?;
            let improved = improve_recipe(&recipe, &request.feedback)?;
            if request.save {
                kitchen.save_favorite(improved.clone())?;
            }
            improved
        }
        (None, None) => {
            return Err(ApiError::bad_request(
                "either favorite_id or recipe is required",
            ))
        }
    };
    Ok(ok(improved))
}

async fn improve_suggestions() -> Json<ApiResponse<Vec<&'static str>>> {
    ok(IMPROVEMENT_SUGGESTIONS.to_vec())
}

async fn scale(
    State(state): State<ApiState>,
    Json(request): Json<ScaleRequest>,
) -> ApiResult<ScaleResponse> {
    let scaled = match (request.favorite_id, request.original_servings) {
        (Some(id), _) => {
            let kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
            kitchen.scale_favorite(&id, request.servings)?.1
        }
        (None, Some(original)) => scale_servings(original, request.servings)?,
        (None, None) => {
            return Err(ApiError::bad_request(
                "either favorite_id or original_servings is required",
            ))
        }
    };
    Ok(ok(ScaleResponse { scaled }))
}

async fn search_dishes(Query(query): Query<SearchQuery>) -> Json<ApiResponse<Vec<DishRecord>>> {
    let hits = DishLibrary::builtin()
        .search(&query.q)
        .into_iter()
        .cloned()
        .collect();
    ok(hits)
}

async fn dish_suggestions() -> Json<ApiResponse<Vec<String>>> {
    ok(DishLibrary::builtin().suggestions())
}

async fn dish_detail(Path(key): Path<String>) -> ApiResult<DishRecord> {
    DishLibrary::builtin()
        .get(&key)
        .cloned()
        .map(ok)
        .ok_or_else(|| ApiError::not_found(format!("no dish named {key}")))
}

async fn cuisines() -> Json<ApiResponse<BTreeMap<String, Vec<String>>>> {
    ok(DishLibrary::builtin().by_cuisine())
}

async fn online(
    State(state): State<ApiState>,
    Json(request): Json<OnlineRequest>,
) -> ApiResult<OnlineResponse> {
    if request.dish.trim().is_empty() {
        return Err(ApiError::bad_request("dish is required"));
    }
    let delay = Duration::from_millis(state.config.generator.online_delay_ms);
    let results = search_online(&request.dish, delay).await;
    let imported = match request.import {
        None => None,
        Some(number) => {
            let hit = number
                .checked_sub(1)
                .and_then(|idx| results.get(idx))
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("no online result number {number}")))?;
            let recipe = hit.into_recipe(&request.dish)?;
            if request.save {
                Kitchen::new(open_state(&state)?, state.generator.clone())
                    .save_favorite(recipe.clone())?;
            }
            Some(recipe)
        }
    };
    Ok(ok(OnlineResponse { results, imported }))
}

async fn list_favorites(State(state): State<ApiState>) -> ApiResult<Vec<Recipe>> {
    Ok(ok(open_state(&state)?.favorites()?))
}

async fn add_favorite(
    State(state): State<ApiState>,
    Json(recipe): Json<Recipe>,
) -> ApiResult<Recipe> {
    let mut kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    kitchen.save_favorite(recipe.clone())?;
    Ok(ok(recipe))
}

async fn get_favorite(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult<Recipe> {
    let kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    Ok(ok(kitchen.favorite(&id)?))
}

async fn remove_favorite(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Recipe> {
    let mut kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    Ok(ok(kitchen.remove_favorite(&id)?))
}

async fn history(
    State(state): State<ApiState>,
    Path(mode): Path<String>,
) -> ApiResult<HistoryResponse> {
    let mode = parse_mode(&mode)?;
    let entries = open_state(&state)?.history(mode)?;
    Ok(ok(HistoryResponse { mode, entries }))
}

async fn clear_history(
    State(state): State<ApiState>,
    Path(mode): Path<String>,
) -> ApiResult<HistoryResponse> {
    let mode = parse_mode(&mode)?;
    open_state(&state)?.clear_history(mode)?;
    Ok(ok(HistoryResponse {
        mode,
        entries: Vec::new(),
    }))
}

async fn remove_history(
    State(state): State<ApiState>,
    Path((mode, index)): Path<(String, usize)>,
) -> ApiResult<HistoryResponse> {
    let mode = parse_mode(&mode)?;
    let mut kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    kitchen.remove_history(mode, index)?;
    Ok(ok(HistoryResponse {
        mode,
        entries: kitchen.history(mode)?,
    }))
}

async fn feedback(
    State(state): State<ApiState>,
    Json(request): Json<FeedbackRequest>,
) -> ApiResult<FeedbackResponse> {
    let mut kitchen = Kitchen::new(open_state(&state)?, state.generator.clone());
    let count = kitchen.feedback(request.vote)?;
    Ok(ok(FeedbackResponse {
        vote: request.vote,
        count,
    }))
}

async fn stats(State(state): State<ApiState>) -> ApiResult<KitchenStats> {
    Ok(ok(open_state(&state)?.stats()?))
}

async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<User> {
    let mut kitchen_state = open_state(&state)?;
    Ok(ok(auth::login(
        &mut kitchen_state,
        &request.email,
        &request.password,
    )?))
}

async fn logout(State(state): State<ApiState>) -> ApiResult<bool> {
    auth::logout(&mut open_state(&state)?)?;
    Ok(ok(true))
}

async fn register(
    State(state): State<ApiState>,
    Json(registration): Json<Registration>,
) -> ApiResult<User> {
    Ok(ok(auth::register(&mut open_state(&state)?, &registration)?))
}

async fn me(State(state): State<ApiState>) -> ApiResult<User> {
    Ok(ok(auth::require_user(&open_state(&state)?)?))
}

async fn admin_overview(State(state): State<ApiState>) -> ApiResult<AdminOverview> {
    Ok(ok(admin::overview(&open_state(&state)?)?))
}

async fn admin_users(
    State(state): State<ApiState>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<UsersResponse> {
    let (_, catalog) = admin::user_catalog(&open_state(&state)?)?;
    let users = catalog.search(&query.search).into_iter().cloned().collect();
    Ok(ok(UsersResponse {
        users,
        stats: catalog.stats(),
    }))
}

async fn admin_create_user(
    State(state): State<ApiState>,
    Json(draft): Json<UserDraft>,
) -> ApiResult<AdminUser> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::user_catalog(&kitchen_state)?;
    let user = catalog.create(draft)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(user))
}

async fn admin_update_user(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
    Json(draft): Json<UserDraft>,
) -> ApiResult<AdminUser> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::user_catalog(&kitchen_state)?;
    let user = catalog.update(id, draft)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(user))
}

async fn admin_delete_user(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
) -> ApiResult<AdminUser> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::user_catalog(&kitchen_state)?;
    let user = catalog.delete(id)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(user))
}

async fn admin_toggle_user(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
) -> ApiResult<AdminUser> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::user_catalog(&kitchen_state)?;
    let user = catalog.toggle_active(id)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(user))
}

async fn admin_dishes(
    State(state): State<ApiState>,
    Query(filter): Query<DishFilter>,
) -> ApiResult<DishesResponse> {
    let (_, catalog) = admin::dish_catalog(&open_state(&state)?)?;
    let dishes = catalog.filter(&filter).into_iter().cloned().collect();
    Ok(ok(DishesResponse {
        dishes,
        stats: catalog.stats(),
    }))
}

async fn admin_create_dish(
    State(state): State<ApiState>,
    Json(draft): Json<DishDraft>,
) -> ApiResult<AdminDish> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::dish_catalog(&kitchen_state)?;
    let dish = catalog.create(draft)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(dish))
}

async fn admin_update_dish(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
    Json(draft): Json<DishDraft>,
) -> ApiResult<AdminDish> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::dish_catalog(&kitchen_state)?;
    let dish = catalog.update(id, draft)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(dish))
}

async fn admin_delete_dish(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
) -> ApiResult<AdminDish> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::dish_catalog(&kitchen_state)?;
    let dish = catalog.delete(id)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(dish))
}

async fn admin_toggle_dish_active(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
) -> ApiResult<AdminDish> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::dish_catalog(&kitchen_state)?;
    let dish = catalog.toggle_active(id)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(dish))
}

async fn admin_toggle_dish_featured(
    State(state): State<ApiState>,
    Path(id): Path<u32>,
) -> ApiResult<AdminDish> {
    let mut kitchen_state = open_state(&state)?;
    let (_, mut catalog) = admin::dish_catalog(&kitchen_state)?;
    let dish = catalog.toggle_featured(id)?;
    catalog.save(&mut kitchen_state)?;
    Ok(ok(dish))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn open_state(state: &ApiState) -> std::result::Result<KitchenState<SqliteStore>, ApiError> {
    let store = SqliteStore::open(&state.db_path)?;
    Ok(KitchenState::new(store).with_history_limit(state.config.history.limit))
}

fn parse_mode(raw: &str) -> std::result::Result<SearchMode, ApiError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ingredients" | "ingredient" => Ok(SearchMode::Ingredients),
        "dish" | "dishes" => Ok(SearchMode::Dish),
        other => Err(ApiError::bad_request(format!("unknown history mode: {other}"))),
    }
}

fn default_mode() -> SearchMode {
    SearchMode::Ingredients
}
