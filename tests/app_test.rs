//! Orchestrator workflows with a mocked remote.

mod common;

use common::record;
use std::time::Duration;
use tokio::time::sleep;

use restaurant_list::clients::RestaurantClient;
use restaurant_list::confirm::{ConfirmError, Confirmation, DialogKind, Phase};
use restaurant_list::form::FormField;
use restaurant_list::framework::mock::{Gate, MockRemote};
use restaurant_list::framework::CacheActor;
use restaurant_list::lifecycle::app::{DELETE_FAILED, SAVE_FAILED};
use restaurant_list::lifecycle::{AppError, RestaurantApp};
use restaurant_list::model::{RestaurantId, RestaurantRecord};

fn fill_form(app: &mut RestaurantApp) {
    app.set_field(FormField::Name, "Tako").unwrap();
    app.set_field(FormField::CuisineType, "Japanese").unwrap();
    app.set_field(FormField::ImageUrl, "https://x/y.jpg").unwrap();
    app.set_field(FormField::Location, "Tokyo").unwrap();
    app.set_field(FormField::Rating, 5).unwrap();
    app.set_field(FormField::PriceRange, "$$").unwrap();
}

fn dialog_kind(app: &RestaurantApp) -> Option<DialogKind> {
    app.state().confirmation.dialog().map(|d| d.kind)
}

#[tokio::test]
async fn test_delete_workflow_success() {
    let tako = record(3, "Tako");
    let other = record(4, "Sushi Bar");
    let mock = MockRemote::new();
    let gate = Gate::new();
    mock.expect_list().return_ok(vec![tako.clone(), other.clone()]);
    mock.expect_delete(RestaurantId(3)).held(&gate).return_ok(());
    mock.expect_list().return_ok(vec![other.clone()]);

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.refresh().await.unwrap();

    app.request_delete(&tako).unwrap();
    match &app.state().confirmation {
        Confirmation::Open { dialog, phase } => {
            assert_eq!(*phase, Phase::Pending);
            assert_eq!(dialog.kind, DialogKind::Delete);
            assert_eq!(dialog.title, "Delete Restaurant");
            assert_eq!(dialog.description, "Are you sure you want to delete \"Tako\"?");
        }
        Confirmation::Closed => panic!("delete prompt not shown"),
    }

    app.confirm().unwrap();
    assert!(app.state().confirmation.is_loading());
    assert!(app.is_deleting());
    assert!(matches!(app.confirm(), Err(AppError::Confirm(ConfirmError::Busy))));
    assert!(matches!(
        app.cancel_confirmation(),
        Err(AppError::Confirm(ConfirmError::Busy))
    ));

    gate.release();
    app.settle().await;

    let dialog = app.state().confirmation.dialog().unwrap();
    assert_eq!(dialog.kind, DialogKind::Success);
    assert_eq!(dialog.title, "Restaurant Deleted!");
    assert!(dialog.description.contains("Tako"));
    assert_eq!(app.records(), &[other]);

    app.confirm().unwrap();
    assert!(!app.state().confirmation.is_open());

    app.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_delete_workflow_failure() {
    let tako = record(3, "Tako");
    let mock = MockRemote::new();
    mock.expect_list().return_ok(vec![tako.clone()]);
    mock.expect_delete(RestaurantId(3)).return_err("Restaurant not found");

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.refresh().await.unwrap();
    app.request_delete(&tako).unwrap();
    app.confirm().unwrap();
    app.settle().await;

    let dialog = app.state().confirmation.dialog().unwrap();
    assert_eq!(dialog.kind, DialogKind::Warning);
    assert_eq!(dialog.title, "Error");
    assert_eq!(dialog.description, DELETE_FAILED);
    assert_eq!(app.state().confirmation.confirm_label(), Some("Continue"));
    assert_eq!(app.records(), &[tako]);
    assert_eq!(mock.calls(), vec!["list", "delete 3"]);

    app.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_cancel_delete_prompt() {
    let mock = MockRemote::<RestaurantRecord>::new();
    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.request_delete(&record(3, "Tako")).unwrap();
    app.cancel_confirmation().unwrap();
    assert!(!app.state().confirmation.is_open());
    assert!(mock.calls().is_empty());
    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_create_workflow() {
    let mock = MockRemote::new();
    let gate = Gate::new();
    mock.expect_create().held(&gate).return_ok(record(1, "Tako"));
    mock.expect_list().return_ok(vec![record(1, "Tako")]);

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.open_create_form();
    fill_form(&mut app);
    app.submit_form().unwrap();

    assert!(app.is_saving());
    assert!(matches!(app.submit_form(), Err(AppError::Busy)));
    assert!(matches!(app.close_form(), Err(AppError::Busy)));
    let form = app.state().form.as_ref().unwrap();
    assert_eq!(form.submit_label(app.is_saving()), "Creating Restaurant...");

    gate.release();
    app.settle().await;
    assert!(!app.is_saving());

    let dialog = app.state().confirmation.dialog().unwrap();
    assert_eq!(dialog.title, "Restaurant Created!");
    assert_eq!(dialog.description, "Tako has been successfully added to your list.");
    assert_eq!(app.records().len(), 1);

    // Acknowledging closes the form.
    assert!(app.state().form.is_some());
    app.confirm().unwrap();
    assert!(app.state().form.is_none());

    app.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_invalid_form_makes_no_call() {
    let mock = MockRemote::<RestaurantRecord>::new();
    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.open_create_form();
    app.set_field(FormField::Name, "Tako").unwrap();

    let Err(AppError::Invalid(errors)) = app.submit_form() else {
        panic!("expected field errors");
    };
    assert!(!errors.contains_key(&FormField::Name));
    assert_eq!(
        errors.get(&FormField::ImageUrl).map(String::as_str),
        Some("Image URL is required")
    );
    assert!(!app.is_saving());
    assert!(app.state().form.as_ref().unwrap().error(FormField::Location).is_some());
    assert!(mock.calls().is_empty());
    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_workflow_and_save_failure() {
    let tako = record(3, "Tako");
    let mock = MockRemote::new();
    mock.expect_update(RestaurantId(3)).return_err("HTTP 500: Internal Server Error");
    let mut updated = tako.clone();
    updated.rating = 2;
    mock.expect_update(RestaurantId(3)).return_ok(updated.clone());
    mock.expect_list().return_ok(vec![updated]);

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.open_edit_form(&tako);
    assert_eq!(app.state().form.as_ref().unwrap().title(), "Edit Restaurant");
    app.set_field(FormField::Rating, 2).unwrap();

    app.submit_form().unwrap();
    app.settle().await;
    let dialog = app.state().confirmation.dialog().unwrap();
    assert_eq!(dialog.kind, DialogKind::Warning);
    assert_eq!(dialog.description, SAVE_FAILED);
    app.confirm().unwrap();
    // The form stays open for another try.
    assert!(app.state().form.is_some());

    app.submit_form().unwrap();
    app.settle().await;
    let dialog = app.state().confirmation.dialog().unwrap();
    assert_eq!(dialog.title, "Restaurant Updated!");
    assert_eq!(dialog.description, "Tako has been successfully updated.");
    assert_eq!(app.records()[0].rating, 2);

    app.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_refresh_failure_sets_banner() {
    let mock = MockRemote::new();
    mock.expect_list().return_err("boom");
    mock.expect_list().return_ok(vec![record(1, "Tako")]);

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    assert!(app.refresh().await.is_err());
    app.change_page(2);
    assert_eq!(app.state().banner.as_deref(), Some("boom"));
    let failed = app.view();
    assert!(failed.starts_with("Error: boom\n\nMy Restaurants\n"));
    assert!(failed.contains("No restaurants available."));
    app.change_page(1);

    app.refresh().await.unwrap();
    assert_eq!(app.state().banner, None);
    assert!(app.view().contains("Tako"));

    app.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_pages_through_seven_records() {
    let records: Vec<_> = (1..=7).map(|id| record(id, &format!("Place {id}"))).collect();
    let mock = MockRemote::new();
    mock.expect_list().return_ok(records);

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.refresh().await.unwrap();

    let first = app.view();
    assert!(first.contains("Place 3"));
    assert!(!first.contains("Place 4"));
    assert!(first.contains("Page 1 of 3"));

    app.change_page(3);
    let last = app.view();
    assert!(last.contains("Place 7"));
    assert!(!last.contains("Place 6"));

    app.change_page(4);
    assert!(!app.view().contains("Place"));
    assert_eq!(dialog_kind(&app), None);

    app.shutdown().await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_delete_is_refused_while_saving() {
    let tako = record(3, "Tako");
    let mock = MockRemote::new();
    let gate = Gate::new();
    mock.expect_create().held(&gate).return_ok(record(1, "Tako"));
    mock.expect_list().return_ok(vec![record(1, "Tako"), tako.clone()]);

    let mut app = RestaurantApp::with_remote(mock.clone(), 8);
    app.open_create_form();
    fill_form(&mut app);
    app.submit_form().unwrap();

    assert!(matches!(app.request_delete(&tako), Err(AppError::Busy)));
    assert!(!app.state().confirmation.is_open());
    assert!(matches!(
        app.confirm(),
        Err(AppError::Confirm(ConfirmError::NotOpen))
    ));

    gate.release();
    app.settle().await;
    let dialog = app.state().confirmation.dialog().unwrap();
    assert_eq!(dialog.title, "Restaurant Created!");

    // The form is still showing, so deleting stays unavailable.
    assert!(matches!(app.request_delete(&tako), Err(AppError::FormOpen)));

    app.confirm().unwrap();
    assert!(app.state().form.is_none());
    app.request_delete(&tako).unwrap();
    assert_eq!(dialog_kind(&app), Some(DialogKind::Delete));

    app.shutdown().await.unwrap();
    assert_eq!(mock.calls(), vec!["create", "list"]);
    mock.verify();
}

#[tokio::test]
async fn test_submit_is_refused_while_prompt_open() {
    let tako = record(3, "Tako");
    let mock = MockRemote::<RestaurantRecord>::new();
    let mut app = RestaurantApp::with_remote(mock.clone(), 8);

    app.request_delete(&tako).unwrap();
    app.open_create_form();
    fill_form(&mut app);
    assert!(matches!(app.submit_form(), Err(AppError::PromptOpen)));
    assert!(!app.is_saving());
    assert_eq!(dialog_kind(&app), Some(DialogKind::Delete));

    app.shutdown().await.unwrap();
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_shutdown_abandons_held_save() {
    let mock = MockRemote::new();
    let gate = Gate::new();
    mock.expect_list().return_ok(vec![]);
    mock.expect_create().held(&gate).return_ok(record(1, "Tako"));

    let (actor, client) = CacheActor::new(mock.clone(), 8);
    let actor = tokio::spawn(actor.run());
    let observer = client.clone();

    let mut app = RestaurantApp::new(RestaurantClient::new(client));
    app.refresh().await.unwrap();
    app.open_create_form();
    fill_form(&mut app);
    app.submit_form().unwrap();
    sleep(Duration::from_millis(20)).await;
    assert_eq!(observer.status().await.unwrap().pending_mutations, 1);

    // Returns without the gate ever opening.
    app.shutdown().await.unwrap();

    // The server may have applied the create, so the snapshot is stale.
    sleep(Duration::from_millis(20)).await;
    let status = observer.status().await.unwrap();
    assert_eq!(status.pending_mutations, 0);
    assert!(status.is_stale);

    drop(observer);
    actor.await.unwrap();
    assert_eq!(mock.calls(), vec!["list", "create"]);
    mock.verify();
}
