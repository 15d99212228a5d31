use chrono::NaiveDate;
use rstest::rstest;
use stockmaster_client::errors::ServiceError;
use stockmaster_client::events::{self, Event};
use stockmaster_client::models::{DeliveryOrder, DeliveryStatus};
use stockmaster_client::notifications::{NotificationBus, NotificationLevel};
use stockmaster_client::services::DeliveryService;
use tokio::sync::mpsc;

fn order(id: i64, reference: &str, contact: &str, status: DeliveryStatus) -> DeliveryOrder {
    DeliveryOrder {
        id,
        reference: reference.to_string(),
        origin: "WH/Stock".to_string(),
        destination: "Customers".to_string(),
        contact: contact.to_string(),
        scheduled_date: NaiveDate::from_ymd_opt(2025, 11, 25).unwrap(),
        status,
        notes: None,
        lines: vec![],
    }
}

fn service_with(
    orders: Vec<DeliveryOrder>,
) -> (DeliveryService, NotificationBus, mpsc::Receiver<Event>) {
    let (sender, rx) = events::channel(16);
    let bus = NotificationBus::new();
    let service = DeliveryService::new(bus.clone(), sender);
    service.replace_all(orders);
    (service, bus, rx)
}

#[rstest]
#[case(DeliveryStatus::Draft, DeliveryStatus::Waiting)]
#[case(DeliveryStatus::Waiting, DeliveryStatus::Ready)]
#[case(DeliveryStatus::Ready, DeliveryStatus::Done)]
#[tokio::test]
async fn advance_moves_one_step_along_the_path(
    #[case] from: DeliveryStatus,
    #[case] to: DeliveryStatus,
) {
    let (service, _bus, mut rx) = service_with(vec![order(1, "WH/OUT/0001", "Azure Interior", from)]);

    let updated = service.advance(1).await.unwrap();
    assert_eq!(updated.status, to);
    assert_eq!(service.get(1).unwrap().status, to);

    match rx.recv().await.unwrap() {
        Event::DeliveryStatusChanged {
            order_id,
            old_status,
            new_status,
        } => {
            assert_eq!(order_id, 1);
            assert_eq!(old_status, from);
            assert_eq!(new_status, to);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[rstest]
#[case(DeliveryStatus::Done)]
#[case(DeliveryStatus::Canceled)]
#[tokio::test]
async fn advance_from_terminal_status_fails_and_leaves_cache_untouched(
    #[case] terminal: DeliveryStatus,
) {
    let (service, _bus, _rx) =
        service_with(vec![order(1, "WH/OUT/0001", "Azure Interior", terminal)]);

    let result = service.advance(1).await;
    assert!(matches!(result, Err(ServiceError::InvalidStatus(_))));
    assert_eq!(service.get(1).unwrap().status, terminal);
}

#[tokio::test]
async fn validate_confirms_a_ready_order() {
    let (service, _bus, _rx) = service_with(vec![order(
        1,
        "WH/OUT/0001",
        "Azure Interior",
        DeliveryStatus::Ready,
    )]);

    let updated = service.validate(1).await.unwrap();
    assert_eq!(updated.status, DeliveryStatus::Done);
}

#[rstest]
#[case(DeliveryStatus::Draft)]
#[case(DeliveryStatus::Waiting)]
#[case(DeliveryStatus::Done)]
#[case(DeliveryStatus::Canceled)]
#[tokio::test]
async fn validate_refuses_anything_but_ready(#[case] status: DeliveryStatus) {
    let (service, _bus, _rx) = service_with(vec![order(1, "WH/OUT/0001", "Azure", status)]);

    let result = service.validate(1).await;
    assert!(matches!(result, Err(ServiceError::InvalidStatus(_))));
    assert_eq!(service.get(1).unwrap().status, status);
}

#[rstest]
#[case(DeliveryStatus::Draft)]
#[case(DeliveryStatus::Waiting)]
#[case(DeliveryStatus::Ready)]
#[tokio::test]
async fn cancel_is_allowed_from_any_active_status(#[case] status: DeliveryStatus) {
    let (service, _bus, _rx) = service_with(vec![order(1, "WH/OUT/0001", "Azure", status)]);

    let updated = service.cancel(1).await.unwrap();
    assert_eq!(updated.status, DeliveryStatus::Canceled);
}

#[tokio::test]
async fn cancel_of_a_done_order_fails() {
    let (service, _bus, _rx) =
        service_with(vec![order(1, "WH/OUT/0001", "Azure", DeliveryStatus::Done)]);

    let result = service.cancel(1).await;
    assert!(matches!(result, Err(ServiceError::InvalidStatus(_))));
    assert_eq!(service.get(1).unwrap().status, DeliveryStatus::Done);
}

#[tokio::test]
async fn cancel_of_a_canceled_order_is_a_noop() {
    let (service, _bus, mut rx) = service_with(vec![order(
        1,
        "WH/OUT/0001",
        "Azure",
        DeliveryStatus::Canceled,
    )]);

    let unchanged = service.cancel(1).await.unwrap();
    assert_eq!(unchanged.status, DeliveryStatus::Canceled);
    // No transition happened, so no event was emitted.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn operations_on_unknown_orders_return_not_found() {
    let (service, _bus, _rx) = service_with(vec![]);

    assert!(matches!(
        service.advance(99).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.validate(99).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.cancel(99).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn transitions_raise_a_success_toast() {
    let (service, bus, _rx) = service_with(vec![order(
        1,
        "WH/OUT/0001",
        "Azure",
        DeliveryStatus::Draft,
    )]);
    let mut toasts = bus.subscribe();

    service.advance(1).await.unwrap();

    let toast = toasts.recv().await.unwrap();
    assert_eq!(toast.level, NotificationLevel::Success);
    assert!(toast.message.contains("WH/OUT/0001"));
}

#[tokio::test]
async fn transitions_commit_even_with_no_event_listener() {
    let (service, _bus, rx) = service_with(vec![order(
        1,
        "WH/OUT/0001",
        "Azure",
        DeliveryStatus::Draft,
    )]);
    drop(rx);

    let updated = service.advance(1).await.unwrap();
    assert_eq!(updated.status, DeliveryStatus::Waiting);
    assert_eq!(service.get(1).unwrap().status, DeliveryStatus::Waiting);
}

#[tokio::test]
async fn search_matches_reference_and_contact_case_insensitive() {
    let (service, _bus, _rx) = service_with(vec![
        order(1, "WH/OUT/0001", "Azure Interior", DeliveryStatus::Ready),
        order(2, "WH/OUT/0002", "Balsa Wood Co.", DeliveryStatus::Waiting),
    ]);

    let by_contact = service.search("azure");
    assert_eq!(by_contact.len(), 1);
    assert_eq!(by_contact[0].id, 1);

    let by_reference = service.search("out/0002");
    assert_eq!(by_reference.len(), 1);
    assert_eq!(by_reference[0].id, 2);

    assert_eq!(service.search("").len(), 2);
    assert!(service.search("nothing").is_empty());
}
