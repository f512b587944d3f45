use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use shared::domain::{ItemStatus, ItemType};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct StubState {
    received_reports: Arc<Mutex<Vec<CreateItemForm>>>,
    received_claims: Arc<Mutex<Vec<Option<String>>>>,
}

fn stub_item() -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "title": "Wallet",
        "description": "",
        "type": "LOST",
        "location": "",
        "contactName": "Jo",
        "contactPhone": "555-1234",
        "status": "OPEN",
        "dateReported": "2025-03-01T09:00:00Z"
    })
}

async fn stub_list() -> Json<serde_json::Value> {
    Json(serde_json::json!([stub_item()]))
}

async fn stub_create(
    State(state): State<StubState>,
    Form(form): Form<CreateItemForm>,
) -> (StatusCode, Json<serde_json::Value>) {
    let title_missing = form.title.as_deref().unwrap_or_default().is_empty();
    state.received_reports.lock().await.push(form);
    if title_missing {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "success": false, "message": "Missing required fields" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Item saved successfully",
            "item": stub_item()
        })),
    )
}

async fn stub_claim(
    State(state): State<StubState>,
    Form(form): Form<ClaimItemForm>,
) -> Json<serde_json::Value> {
    state.received_claims.lock().await.push(form.id);
    Json(serde_json::json!({ "success": true, "message": "Item marked as claimed" }))
}

async fn stub_ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "message": "Lost & Found backend is alive" }))
}

async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn start_stub() -> (String, StubState) {
    let state = StubState::default();
    let router = Router::new()
        .route(ITEMS_ROUTE, get(stub_list).post(stub_create))
        .route(CLAIM_ROUTE, post(stub_claim))
        .route(PING_ROUTE, get(stub_ping))
        .with_state(state.clone());
    (spawn_stub(router).await, state)
}

fn wallet_report(title: &str) -> NewItemReport {
    NewItemReport {
        title: title.to_string(),
        description: String::new(),
        item_type: ItemType::Lost,
        location: String::new(),
        contact_name: "Jo".to_string(),
        contact_phone: "555-1234".to_string(),
    }
}

#[test]
fn base_url_gains_trailing_slash_so_routes_nest() {
    let service = HttpPortalService::new("http://campus.test/portal").expect("url");
    assert_eq!(service.base_url().as_str(), "http://campus.test/portal/");
    assert_eq!(
        service.endpoint(ITEMS_ROUTE).expect("endpoint").as_str(),
        "http://campus.test/portal/api/items"
    );
    assert!(HttpPortalService::new("not a url").is_err());
}

#[tokio::test]
async fn lists_items_from_service() {
    let (server_url, _state) = start_stub().await;
    let service = HttpPortalService::new(&server_url).expect("url");

    let items = service.list_items().await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ItemId(7));
    assert_eq!(items[0].item_type, ItemType::Lost);
    assert_eq!(items[0].status, ItemStatus::Open);
}

#[tokio::test]
async fn create_sends_all_six_fields_form_encoded() {
    let (server_url, state) = start_stub().await;
    let service = HttpPortalService::new(&server_url).expect("url");

    let response = service
        .create_item(&wallet_report("Wallet"))
        .await
        .expect("create");
    assert!(response.success);
    assert_eq!(response.item.map(|item| item.id), Some(ItemId(7)));

    let received = state.received_reports.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].title.as_deref(), Some("Wallet"));
    assert_eq!(received[0].item_type.as_deref(), Some("LOST"));
    assert_eq!(received[0].description.as_deref(), Some(""));
    assert_eq!(received[0].location.as_deref(), Some(""));
    assert_eq!(received[0].contact_name.as_deref(), Some("Jo"));
    assert_eq!(received[0].contact_phone.as_deref(), Some("555-1234"));
}

#[tokio::test]
async fn create_reads_failure_body_from_error_status() {
    let (server_url, _state) = start_stub().await;
    let service = HttpPortalService::new(&server_url).expect("url");

    let response = service
        .create_item(&wallet_report(""))
        .await
        .expect("service answered");
    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Missing required fields"));
}

#[tokio::test]
async fn claim_posts_item_id() {
    let (server_url, state) = start_stub().await;
    let service = HttpPortalService::new(&server_url).expect("url");

    let response = service.claim_item(ItemId(7)).await.expect("claim");
    assert!(response.success);
    assert_eq!(
        state.received_claims.lock().await.as_slice(),
        &[Some("7".to_string())]
    );
}

#[tokio::test]
async fn ping_reads_liveness_payload() {
    let (server_url, _state) = start_stub().await;
    let service = HttpPortalService::new(&server_url).expect("url");
    let ping = service.ping().await.expect("ping");
    assert_eq!(ping.status, "ok");
}

#[tokio::test]
async fn list_error_status_is_a_transport_error() {
    let router = Router::new().route(
        ITEMS_ROUTE,
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let server_url = spawn_stub(router).await;
    let service = HttpPortalService::new(&server_url).expect("url");
    assert!(service.list_items().await.is_err());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpPortalService::new(&format!("http://{addr}")).expect("url");
    assert!(service.list_items().await.is_err());
    assert!(service.create_item(&wallet_report("Wallet")).await.is_err());
    assert!(service.claim_item(ItemId(1)).await.is_err());
}
