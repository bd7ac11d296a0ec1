//! Drives the real HTTP client and view controllers against the service.

use std::sync::Arc;
use std::time::Duration;

use jot_api::{app_router, AppConfig, AppState};
use jot_core::views::{CreateController, DetailController, ListController, Outcome, Route};
use jot_core::{ClientConfig, Error, HttpNotesClient, NoteDraft, NoteId, NotesApi};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let state = AppState::from_config(Arc::new(AppConfig::default()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client() -> Arc<dyn NotesApi> {
    let base_url = spawn_server().await;
    let client = HttpNotesClient::new(&ClientConfig {
        api_base_url: base_url,
        request_timeout: Duration::from_secs(5),
    })
    .unwrap();
    Arc::new(client)
}

fn always(_: &str) -> bool {
    true
}

async fn listed_ids(api: &Arc<dyn NotesApi>) -> Vec<NoteId> {
    let mut list = ListController::new(api.clone());
    assert_eq!(list.mount().await, Outcome::Applied);
    let ids = list
        .state()
        .visible_notes()
        .into_iter()
        .map(|note| note.id.clone())
        .collect();
    ids
}

#[tokio::test]
async fn create_edit_delete_round_trip() {
    let api = client().await;

    let mut create = CreateController::new(api.clone());
    create.set_title("Groceries");
    create.set_content("milk");
    assert_eq!(create.submit().await, Outcome::Navigate(Route::List));
    let created = create.state().created.clone().unwrap();
    assert!(created.created_at.is_some());
    assert_eq!(created.updated_at, None);

    let mut list = ListController::new(api.clone());
    assert_eq!(list.mount().await, Outcome::Applied);
    {
        let state = list.state();
        let listed = state.visible_notes();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].title, "Groceries");
        assert_eq!(listed[0].content, "milk");
    }
    list.unmount();

    let mut detail = DetailController::new(api.clone(), created.id.clone());
    assert_eq!(detail.mount().await, Outcome::Applied);
    detail.set_title("Groceries v2");
    assert_eq!(detail.save().await, Outcome::Applied);
    assert_eq!(
        detail.state().success_message.as_deref(),
        Some("Note updated.")
    );

    let fetched = api.get(&created.id, None).await.unwrap();
    assert_eq!(fetched.title, "Groceries v2");
    assert!(fetched.updated_at.is_some());
    assert_eq!(fetched.created_at, created.created_at);
    assert_eq!(detail.state().note.as_ref(), Some(&fetched));

    assert_eq!(
        detail.delete(&always).await,
        Outcome::Navigate(Route::List)
    );

    assert!(!listed_ids(&api).await.contains(&created.id));
    assert_eq!(
        api.get(&created.id, None).await,
        Err(Error::NotFound(created.id.to_string()))
    );
}

#[tokio::test]
async fn edited_notes_move_to_the_top_of_the_list() {
    let api = client().await;
    let older = api
        .create(&NoteDraft::new("Older", ""), None)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newer = api
        .create(&NoteDraft::new("Newer", ""), None)
        .await
        .unwrap();

    assert_eq!(listed_ids(&api).await, vec![newer.id.clone(), older.id.clone()]);

    tokio::time::sleep(Duration::from_millis(5)).await;
    api.update(&older.id, &NoteDraft::new("Older, edited", ""), None)
        .await
        .unwrap();

    assert_eq!(listed_ids(&api).await, vec![older.id, newer.id]);
}

#[tokio::test]
async fn server_side_validation_maps_to_validation_error() {
    let api = client().await;
    let result = api.create(&NoteDraft::new("   ", "body"), None).await;
    assert_eq!(result, Err(Error::Validation("Title is required.".to_string())));
}

#[tokio::test]
async fn deleting_twice_reports_not_found_in_the_view() {
    let api = client().await;
    let note = api
        .create(&NoteDraft::new("Ephemeral", ""), None)
        .await
        .unwrap();

    let mut list = ListController::new(api.clone());
    list.mount().await;
    api.delete(&note.id, None).await.unwrap();

    assert_eq!(list.delete_row(&note, &always).await, Outcome::Failed);
    let state = list.state();
    assert_eq!(state.error.as_deref(), Some(format!("Note not found: {}", note.id).as_str()));
    assert_eq!(state.visible_notes().len(), 1);
}

#[tokio::test]
async fn unknown_id_leaves_detail_view_without_a_form() {
    let api = client().await;
    let mut detail = DetailController::new(api, NoteId::from("does-not-exist"));

    assert_eq!(detail.mount().await, Outcome::Failed);
    assert!(!detail.state().shows_form());
    assert!(detail.state().error.is_some());
}
