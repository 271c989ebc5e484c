//! End-to-end store tests: dispatch against a wiremock backend and assert the
//! lifecycle status plus result slots the UI would observe.

use perkcard_promo::{PromoClient, PromoStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PromoClient {
    PromoClient::with_base_url(base_url, "test-key", 30)
        .expect("client construction should not fail")
}

fn success_body() -> serde_json::Value {
    serde_json::json!({
        "type": "success",
        "data": {
            "promo": {
                "custom_promo": [
                    {
                        "client_name": "jane DOE",
                        "bus_name": "subs + more",
                        "promo_name": "50%_off",
                        "date_valid_from": "2024-03-01",
                        "date_valid_to": "2024-03-21"
                    }
                ]
            }
        }
    })
}

fn error_body() -> serde_json::Value {
    serde_json::json!({ "type": "error", "message": "db unavailable" })
}

#[tokio::test]
async fn fetch_promo_for_card_success_populates_normalized_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-customer-promo-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = PromoStore::new();
    store.fetch_promo_for_card(&client, "card-42", "jwt-abc").await;

    let state = store.snapshot().await;
    assert!(state.single_promo_status.succeeded);
    assert!(!state.single_promo_status.pending);
    assert!(!state.single_promo_status.failed);
    assert!(state.single_promo_status.last_error.is_empty());

    let record = &state.single_promo["custom_promo"][0];
    assert_eq!(record.client_name, "Jane Doe");
    assert_eq!(record.bus_name, "Subs + More");
    assert_eq!(
        record.bus_image.as_deref(),
        Some("./business-logos/SUBS_PLUS_MORE.png")
    );
    assert_eq!(
        record.promo_image.as_deref(),
        Some("./business-promos/50_PERCENT_off.png")
    );
    assert_eq!(record.promo_name, "50% Off");
    assert_eq!(
        record.date_validity_simplified.as_deref(),
        Some("Mar, 1st - 21st")
    );
}

#[tokio::test]
async fn fetch_all_promo_success_stores_raw_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-all-promo-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = PromoStore::new();
    store.fetch_all_promo(&client, 10, "jwt-abc").await;

    let state = store.snapshot().await;
    assert!(state.all_promo_status.succeeded);

    // The catalog slot is raw: no title-casing, no derived paths.
    let record = &state.all_promo["custom_promo"][0];
    assert_eq!(record.client_name, "jane DOE");
    assert_eq!(record.promo_name, "50%_off");
    assert_eq!(record.bus_image, None);
}

#[tokio::test]
async fn fetch_promo_on_scan_success_populates_normalized_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-customer-promo-info-on-scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = PromoStore::new();
    store
        .fetch_promo_on_scan(&client, "card-42", "123", "bus-7")
        .await;

    let state = store.snapshot().await;
    assert!(state.promo_on_scan_status.succeeded);
    assert_eq!(
        state.promo_on_scan["custom_promo"][0].client_name,
        "Jane Doe"
    );
}

#[tokio::test]
async fn backend_error_sets_failed_with_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-customer-promo-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-all-promo-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = PromoStore::new();
    store.fetch_promo_for_card(&client, "card-42", "jwt-abc").await;
    store.fetch_all_promo(&client, 10, "jwt-abc").await;

    let state = store.snapshot().await;
    assert!(state.single_promo_status.failed);
    assert!(!state.single_promo_status.pending);
    assert!(!state.single_promo_status.succeeded);
    assert_eq!(
        state.single_promo_status.last_error,
        "customer promo on scan not extracted from db"
    );
    assert!(state.all_promo_status.failed);
    assert_eq!(
        state.all_promo_status.last_error,
        "promo not extracted from db"
    );
}

#[tokio::test]
async fn transport_failure_sets_failed_with_error_message() {
    // Nothing is listening on this port; the connection is refused.
    let client = test_client("http://127.0.0.1:9");
    let store = PromoStore::new();
    store.fetch_all_promo(&client, 10, "jwt-abc").await;

    let state = store.snapshot().await;
    assert!(state.all_promo_status.failed);
    assert!(!state.all_promo_status.pending);
    assert!(!state.all_promo_status.succeeded);
    assert!(
        !state.all_promo_status.last_error.is_empty(),
        "transport failures should record their own message"
    );
}

#[tokio::test]
async fn scan_error_resets_scan_slot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-customer-promo-info-on-scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-customer-promo-info-on-scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = PromoStore::new();

    store
        .fetch_promo_on_scan(&client, "card-42", "123", "bus-7")
        .await;
    assert!(!store.snapshot().await.promo_on_scan.is_empty());

    store
        .fetch_promo_on_scan(&client, "card-42", "123", "bus-7")
        .await;
    let state = store.snapshot().await;
    assert!(state.promo_on_scan_status.failed);
    assert_eq!(
        state.promo_on_scan_status.last_error,
        "customer promo on scan not extracted from db"
    );
    assert!(
        state.promo_on_scan.is_empty(),
        "a failed scan must not leave stale promos visible"
    );
}

#[tokio::test]
async fn redispatch_after_failure_can_succeed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-all-promo-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-all-promo-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = PromoStore::new();

    store.fetch_all_promo(&client, 10, "jwt-abc").await;
    assert!(store.snapshot().await.all_promo_status.failed);

    store.fetch_all_promo(&client, 10, "jwt-abc").await;
    let state = store.snapshot().await;
    assert!(state.all_promo_status.succeeded);
    assert!(state.all_promo_status.last_error.is_empty());
    assert!(!state.all_promo.is_empty());
}
