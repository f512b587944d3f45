use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use server_api::{
    claim_item, create_item, list_items, parse_item_id, ApiContext, INVALID_ID_MESSAGE,
    ITEM_CLAIMED_MESSAGE, ITEM_SAVED_MESSAGE, MISSING_FIELDS_MESSAGE,
};
use shared::{
    domain::Item,
    error::{ApiError, ErrorCode},
    protocol::{
        ClaimItemForm, CreateItemForm, MutationResponse, PingResponse, CLAIM_ROUTE, ITEMS_ROUTE,
        PING_ROUTE,
    },
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

const MAX_FORM_BYTES: usize = 64 * 1024;

type MutationReply = (StatusCode, Json<MutationResponse>);
type MutationResult = Result<MutationReply, MutationReply>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; check the parent directory and its permissions"
        );
        error
    })?;
    let api = ApiContext {
        storage,
        list_limit: settings.list_limit,
    };
    let allowed_origin = HeaderValue::from_str(&settings.allowed_origin)?;

    let app = build_router(Arc::new(AppState { api }), allowed_origin);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, origin = %settings.allowed_origin, "lost & found backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route(PING_ROUTE, get(ping))
        .route(ITEMS_ROUTE, get(http_list_items).post(http_create_item))
        .route(CLAIM_ROUTE, post(http_claim_item))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(cors)
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        warn!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "Lost & Found backend is alive".to_string(),
    })
}

async fn http_list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Item>>, (StatusCode, Json<ApiError>)> {
    let items = list_items(&state.api)
        .await
        .map_err(|e| (status_for(e.code), Json(e)))?;
    Ok(Json(items))
}

async fn http_create_item(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CreateItemForm>, FormRejection>,
) -> MutationResult {
    let Form(form) = form.map_err(|rejection| {
        warn!(%rejection, "rejected create item body");
        failure(ApiError::validation(MISSING_FIELDS_MESSAGE))
    })?;

    let item = create_item(&state.api, &form).await.map_err(failure)?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created(ITEM_SAVED_MESSAGE, item)),
    ))
}

async fn http_claim_item(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ClaimItemForm>, FormRejection>,
) -> MutationResult {
    let Form(form) = form.map_err(|rejection| {
        warn!(%rejection, "rejected claim body");
        failure(ApiError::validation(INVALID_ID_MESSAGE))
    })?;

    let item_id = parse_item_id(form.id.as_deref()).map_err(failure)?;
    claim_item(&state.api, item_id).await.map_err(failure)?;
    Ok((
        StatusCode::OK,
        Json(MutationResponse::ok(ITEM_CLAIMED_MESSAGE)),
    ))
}

fn failure(err: ApiError) -> MutationReply {
    (status_for(err.code), Json(MutationResponse::failed(err.message)))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
