use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use stockmaster_client::api::ApiClient;
use stockmaster_client::errors::ServiceError;
use stockmaster_client::events::{self, Event, EventSender};
use stockmaster_client::models::AdjustmentDirection;
use stockmaster_client::notifications::NotificationBus;
use stockmaster_client::services::StockService;
use tokio::sync::mpsc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stock_rows() -> serde_json::Value {
    json!([
        {
            "productId": "p1",
            "warehouseId": 1,
            "warehouseName": "WH/Stock1",
            "quantity": 5,
            "reserved": 2
        },
        {
            "productId": "p1",
            "warehouseId": 2,
            "warehouseName": "WH/Stock2",
            "quantity": 3,
            "reserved": 8
        },
        {
            "productId": "p2",
            "warehouseId": 1,
            "warehouseName": "WH/Stock1",
            "quantity": 10,
            "reserved": 0
        }
    ])
}

async fn service_against(
    server: &MockServer,
) -> (StockService, mpsc::Receiver<Event>, NotificationBus) {
    let client = Arc::new(ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap());
    let (sender, rx): (EventSender, _) = events::channel(16);
    let bus = NotificationBus::new();
    let service = StockService::new(client, bus.clone(), sender);
    (service, rx, bus)
}

async fn mount_stocks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/stocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stock_rows()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_mirrors_all_rows() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    let (service, _rx, _bus) = service_against(&server).await;

    assert_eq!(service.load().await.unwrap(), 3);
    let rows = service.snapshot();
    assert_eq!(rows[0].product_id, "p1");
    assert_eq!(rows[0].free_to_use(), dec!(3));
}

#[tokio::test]
async fn load_failure_keeps_the_previous_snapshot() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    let (service, _rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();
    let before = service.snapshot();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/stocks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let result = service.load().await;
    assert!(matches!(result, Err(ServiceError::Api { .. })));
    assert_eq!(service.snapshot(), before);
}

#[tokio::test]
async fn add_adjustment_posts_refreshes_and_records_the_movement() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    Mock::given(method("POST"))
        .and(path("/stocks/adjust"))
        .and(body_partial_json(json!({
            "productId": "p2",
            "warehouseId": 1,
            "operation": "add"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let (service, mut rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();

    let applied = service
        .adjust("p2", 1, dec!(4), AdjustmentDirection::Add)
        .await
        .unwrap();
    assert_eq!(applied, dec!(4));

    let ledger = service.ledger();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].quantity_change, dec!(4));
    assert_eq!(ledger[0].reference, "ADJ/1/p2");

    match rx.recv().await.unwrap() {
        Event::StockAdjusted {
            product_id,
            warehouse_id,
            quantity_change,
        } => {
            assert_eq!(product_id, "p2");
            assert_eq!(warehouse_id, 1);
            assert_eq!(quantity_change, dec!(4));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn confirmed_adjustment_survives_a_failed_refresh() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    let (service, mut rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();
    let before = service.snapshot();

    // The adjustment lands, but the follow-up GET /stocks is down.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/stocks/adjust"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stocks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
        .mount(&server)
        .await;

    let applied = service
        .adjust("p2", 1, dec!(4), AdjustmentDirection::Add)
        .await
        .unwrap();
    assert_eq!(applied, dec!(4));

    // The movement is committed: ledger entry and event are recorded,
    // and the snapshot is stale but intact.
    let ledger = service.ledger();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].quantity_change, dec!(4));
    assert!(matches!(
        rx.recv().await.unwrap(),
        Event::StockAdjusted { .. }
    ));
    assert_eq!(service.snapshot(), before);
}

#[tokio::test]
async fn adjustment_commits_even_with_no_event_listener() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    Mock::given(method("POST"))
        .and(path("/stocks/adjust"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let (service, rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();
    drop(rx);

    let applied = service
        .adjust("p2", 1, dec!(4), AdjustmentDirection::Add)
        .await
        .unwrap();
    assert_eq!(applied, dec!(4));
    assert_eq!(service.ledger().len(), 1);
}

#[tokio::test]
async fn removal_is_clamped_to_on_hand_stock() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    // p1 in warehouse 1 has 5 on hand; requesting 8 must send 5.
    Mock::given(method("POST"))
        .and(path("/stocks/adjust"))
        .and(body_partial_json(json!({
            "productId": "p1",
            "quantity": "5",
            "operation": "remove"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let (service, _rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();

    let applied = service
        .adjust("p1", 1, dec!(8), AdjustmentDirection::Remove)
        .await
        .unwrap();
    assert_eq!(applied, dec!(5));
    assert_eq!(service.ledger()[0].quantity_change, dec!(-5));
}

#[tokio::test]
async fn removal_without_a_cached_record_fails_before_any_request() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    Mock::given(method("POST"))
        .and(path("/stocks/adjust"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let (service, _rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();

    let result = service
        .adjust("missing", 1, dec!(2), AdjustmentDirection::Remove)
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
    assert!(service.ledger().is_empty());
}

#[tokio::test]
async fn removal_clamped_to_zero_is_a_local_noop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "productId": "p1",
            "warehouseId": 1,
            "warehouseName": "WH/Stock1",
            "quantity": 0,
            "reserved": 0
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/stocks/adjust"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;
    let (service, _rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();

    let applied = service
        .adjust("p1", 1, dec!(3), AdjustmentDirection::Remove)
        .await
        .unwrap();
    assert_eq!(applied, Decimal::ZERO);
    assert!(service.ledger().is_empty());
}

#[tokio::test]
async fn non_positive_quantities_are_rejected_locally() {
    let server = MockServer::start().await;
    let (service, _rx, _bus) = service_against(&server).await;

    let result = service
        .adjust("p1", 1, dec!(0), AdjustmentDirection::Add)
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));

    let result = service
        .adjust("p1", 1, dec!(-2), AdjustmentDirection::Add)
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn summaries_aggregate_per_product_with_per_row_clamping() {
    let server = MockServer::start().await;
    mount_stocks(&server).await;
    let (service, _rx, _bus) = service_against(&server).await;
    service.load().await.unwrap();

    let summaries = service.summarize();
    assert_eq!(summaries.len(), 2);

    // p1: 5/2 in warehouse 1 and 3/8 in warehouse 2. The second row's
    // free count clamps at zero instead of going negative.
    let p1 = &summaries[0];
    assert_eq!(p1.product_id, "p1");
    assert_eq!(p1.total_on_hand, dec!(8));
    assert_eq!(p1.total_reserved, dec!(10));
    assert_eq!(p1.total_free, dec!(3));
    assert_eq!(p1.warehouse_count, 2);

    let p2 = &summaries[1];
    assert_eq!(p2.total_free, dec!(10));
    assert_eq!(p2.warehouse_count, 1);
}
