//! HTTP client and full workflow against an in-process fake of the REST API.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{record, tako_draft, FakeApi};
use restaurant_list::api::RestaurantApi;
use restaurant_list::config::ClientConfig;
use restaurant_list::confirm::DialogKind;
use restaurant_list::form::FormField;
use restaurant_list::framework::RemoteSource;
use restaurant_list::lifecycle::RestaurantApp;
use restaurant_list::model::{RestaurantId, RestaurantPatch};

async fn api() -> (FakeApi, RestaurantApi) {
    let fake = FakeApi::default();
    let base_url = fake.spawn().await;
    let config = ClientConfig::new(&format!("{base_url}/")).unwrap();
    (fake, RestaurantApi::new(&config).unwrap())
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let (_fake, api) = api().await;

    let created = api.create(tako_draft()).await;
    assert!(created.success, "{:?}", created.error);
    let created = created.data.unwrap();
    assert!(created.id.0 > 0);
    assert_eq!(created.to_draft(), tako_draft());

    let all = api.list_all().await.data.unwrap();
    assert_eq!(all, vec![created]);
}

#[tokio::test]
async fn test_error_detail_is_used() {
    let (_fake, api) = api().await;
    let missing = api.get_one(RestaurantId(42)).await;
    assert!(!missing.success);
    assert_eq!(missing.error.as_deref(), Some("Restaurant not found"));
}

#[tokio::test]
async fn test_error_without_detail_uses_status_line() {
    let (fake, api) = api().await;

    fake.fail_next(StatusCode::INTERNAL_SERVER_ERROR, None);
    let failed = api.list_all().await;
    assert_eq!(failed.error.as_deref(), Some("HTTP 500: Internal Server Error"));

    // A non-string detail (validation error list) is not a message.
    fake.fail_next(StatusCode::UNPROCESSABLE_ENTITY, Some(json!({ "detail": [{ "loc": ["body"] }] })));
    let failed = api.create(tako_draft()).await;
    assert_eq!(failed.error.as_deref(), Some("HTTP 422: Unprocessable Entity"));
}

#[tokio::test]
async fn test_delete_no_content_is_success_without_data() {
    let (fake, api) = api().await;
    let id = fake.seed(&tako_draft());

    let deleted = api.delete(RestaurantId(id)).await;
    assert!(deleted.success);
    assert_eq!(deleted.data, None);

    let again = api.delete(RestaurantId(id)).await;
    assert_eq!(again.error.as_deref(), Some("Restaurant not found"));
}

#[tokio::test]
async fn test_patch_sends_only_changed_fields() {
    let (fake, api) = api().await;
    let mut draft = tako_draft();
    draft.description = Some("Octopus".into());
    let id = RestaurantId(fake.seed(&draft));

    let current = api.get_one(id).await.data.unwrap();
    let mut edited = current.to_draft();
    edited.rating = 3;
    edited.description = None;

    let updated = api
        .update(id, RestaurantPatch::between(&current, &edited))
        .await
        .data
        .unwrap();
    assert_eq!(updated.rating, 3);
    // The server keeps the cleared description as "", which reads back as absent.
    assert_eq!(fake.stored(id.0).unwrap()["description"], json!(""));
    assert_eq!(updated.description, None);
    assert_eq!(api.get_one(id).await.data.unwrap().description, None);
    assert_eq!(updated.name, "Tako");
}

#[tokio::test]
async fn test_transport_failure_is_an_envelope() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(&format!("http://{addr}")).unwrap();
    let api = RestaurantApi::new(&config).unwrap();
    let failed = api.list_all().await;
    assert!(!failed.success);
    assert!(failed.error.is_some());
}

/// Add, list, edit and delete through the orchestrator over real HTTP.
#[tokio::test]
async fn test_full_workflow_over_http() {
    let fake = FakeApi::default();
    let base_url = fake.spawn().await;
    let mut app = RestaurantApp::start(ClientConfig::new(&base_url).unwrap()).unwrap();

    app.refresh().await.unwrap();
    assert!(app.view().contains("No restaurants available. Add one to get started!"));

    // Add
    app.open_create_form();
    let tako = record(0, "Tako");
    app.set_field(FormField::Name, tako.name.clone()).unwrap();
    app.set_field(FormField::CuisineType, tako.cuisine_type.clone()).unwrap();
    app.set_field(FormField::ImageUrl, tako.image_url.clone()).unwrap();
    app.set_field(FormField::Location, tako.location.clone()).unwrap();
    app.set_field(FormField::Rating, 5).unwrap();
    app.set_field(FormField::PriceRange, "$$").unwrap();
    app.submit_form().unwrap();
    app.settle().await;

    let dialog = app.state().confirmation.dialog().unwrap().clone();
    assert_eq!(dialog.kind, DialogKind::Success);
    assert_eq!(dialog.title, "Restaurant Created!");
    app.confirm().unwrap();
    assert!(app.state().form.is_none());

    assert_eq!(app.records().len(), 1);
    let stored = app.records()[0].clone();
    assert!(stored.id.0 > 0);
    assert_eq!(stored.to_draft(), tako.to_draft());

    // Edit
    app.open_edit_form(&stored);
    app.set_field(FormField::Rating, 4).unwrap();
    app.submit_form().unwrap();
    app.settle().await;
    assert_eq!(
        app.state().confirmation.dialog().unwrap().description,
        "Tako has been successfully updated."
    );
    app.confirm().unwrap();
    assert_eq!(app.records()[0].rating, 4);

    // Delete
    app.request_delete(&stored).unwrap();
    app.confirm().unwrap();
    app.settle().await;
    assert_eq!(
        app.state().confirmation.dialog().unwrap().title,
        "Restaurant Deleted!"
    );
    assert!(app.records().is_empty());
    assert_eq!(fake.list_calls(), 4);

    app.shutdown().await.unwrap();
}
