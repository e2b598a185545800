use todo_api::routes::items::{
    CreateItemRequest, ReadItemResponse, ReadItemsResponse, UpdateItemRequest,
};
use todo_telemetry::tracing::init_test_tracing;

use crate::support::test_app::spawn_test_app;

mod support;

#[tokio::test(flavor = "multi_thread")]
async fn an_item_can_be_created() {
    init_test_tracing();
    let app = spawn_test_app().await;

    let item = CreateItemRequest {
        title: "buy milk".to_string(),
    };
    let response = app.create_item(&item).await;

    assert_eq!(response.status(), 201);
    let response: ReadItemResponse = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(response.title, "buy milk");
}

#[tokio::test(flavor = "multi_thread")]
async fn an_item_with_an_empty_title_is_rejected() {
    init_test_tracing();
    let app = spawn_test_app().await;

    let item = CreateItemRequest {
        title: "   ".to_string(),
    };
    let response = app.create_item(&item).await;

    assert_eq!(response.status(), 400);
}

#[tokio::test(flavor = "multi_thread")]
async fn a_missing_item_returns_404() {
    init_test_tracing();
    let app = spawn_test_app().await;

    let response = app.read_item(42).await;
    assert_eq!(response.status(), 404);

    let update = UpdateItemRequest {
        title: "new title".to_string(),
    };
    let response = app.update_item(42, &update).await;
    assert_eq!(response.status(), 404);

    let response = app.delete_item(42).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn items_survive_a_full_crud_roundtrip() {
    init_test_tracing();
    let app = spawn_test_app().await;

    // Create.
    let item = CreateItemRequest {
        title: "water plants".to_string(),
    };
    let response = app.create_item(&item).await;
    assert_eq!(response.status(), 201);
    let created: ReadItemResponse = response
        .json()
        .await
        .expect("failed to deserialize response");

    // Read back, individually and in the listing.
    let response = app.read_item(created.id).await;
    assert!(response.status().is_success());
    let read: ReadItemResponse = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(read.id, created.id);
    assert_eq!(read.title, "water plants");

    let response = app.read_all_items().await;
    assert!(response.status().is_success());
    let listing: ReadItemsResponse = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert!(listing.items.iter().any(|item| item.id == created.id));

    // Update.
    let update = UpdateItemRequest {
        title: "water the plants".to_string(),
    };
    let response = app.update_item(created.id, &update).await;
    assert!(response.status().is_success());
    let updated: ReadItemResponse = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(updated.title, "water the plants");

    // Delete, then the item is gone.
    let response = app.delete_item(created.id).await;
    assert_eq!(response.status(), 204);

    let response = app.read_item(created.id).await;
    assert_eq!(response.status(), 404);
}
