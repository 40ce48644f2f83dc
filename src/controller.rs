//! List state and backend synchronization.
//!
//! `ListController` owns the authoritative in-memory copy of the todo list
//! and the draft currently loaded into the modal form. Every read and write
//! goes through the injected `ApiClient`, and every successful mutation is
//! followed by a full re-fetch, so the list always converges to what the
//! backend holds. The controller never renders anything; operations hand an
//! outcome back to the caller and the UI decides how to show it.

use tracing::{error, warn};

use crate::api::ApiClient;
use crate::item::{ItemDraft, TodoItem};

/// Which backend mutation an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    /// Verb for user-facing messages.
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// What happened to a submitted draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Title or description was blank after trimming. Nothing was sent and
    /// the modal stays open so the user can fix the fields.
    Rejected,
    Created,
    Updated,
    /// The backend refused the call. Already logged; the caller shows a
    /// generic notice.
    Failed(MutationKind),
}

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
}

/// Owner of the in-memory list, the active draft, and the two view booleans.
pub struct ListController {
    api: ApiClient,
    todo_list: Vec<TodoItem>,
    view_completed: bool,
    active_item: Option<ItemDraft>,
    modal_open: bool,
}

impl ListController {
    /// A controller with an empty list, showing the incomplete tab.
    pub fn new(api: ApiClient) -> Self {
        ListController {
            api,
            todo_list: Vec::new(),
            view_completed: false,
            active_item: None,
            modal_open: false,
        }
    }

    /// Re-fetch the full collection and replace the list with it.
    ///
    /// Any failure (transport, bad status, or a payload that is not an item
    /// array) clears the list and is logged, nothing more. The list is
    /// renderable when this returns, whatever happened on the wire.
    pub async fn refresh(&mut self) {
        match self.api.list().await {
            Ok(items) => self.todo_list = items,
            Err(err) => {
                warn!(error = %err, "refresh failed, showing empty list");
                self.todo_list.clear();
            }
        }
    }

    /// Validate and persist a draft, then re-fetch.
    ///
    /// Blank title or description rejects the draft before any network
    /// traffic. Otherwise the modal closes immediately and the draft's
    /// variant picks the call: `Existing` updates by id, `New` creates.
    pub async fn submit(&mut self, draft: ItemDraft) -> SubmitOutcome {
        if draft.fields().has_blank_field() {
            return SubmitOutcome::Rejected;
        }

        // Dismiss the modal before the call settles; a backend failure does
        // not reopen it.
        self.close_modal();

        let result = match &draft {
            ItemDraft::Existing { id, fields } => self
                .api
                .update(*id, fields)
                .await
                .map(|()| SubmitOutcome::Updated)
                .map_err(|err| (MutationKind::Update, err)),
            ItemDraft::New(fields) => self
                .api
                .create(fields)
                .await
                .map(|()| SubmitOutcome::Created)
                .map_err(|err| (MutationKind::Create, err)),
        };

        match result {
            Ok(outcome) => {
                self.refresh().await;
                outcome
            }
            Err((kind, err)) => {
                error!(error = %err, "failed to {} item", kind.verb());
                SubmitOutcome::Failed(kind)
            }
        }
    }

    /// Delete by id, then re-fetch. No confirmation step.
    pub async fn delete_item(&mut self, id: u64) -> DeleteOutcome {
        match self.api.delete(id).await {
            Ok(()) => {
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!(error = %err, id, "failed to delete item");
                DeleteOutcome::Failed
            }
        }
    }

    /// Load a blank draft and open the modal.
    pub fn open_for_create(&mut self) {
        self.active_item = Some(ItemDraft::blank());
        self.modal_open = true;
    }

    /// Load a copy of an existing item into the modal.
    pub fn open_for_edit(&mut self, item: &TodoItem) {
        self.active_item = Some(ItemDraft::from_item(item));
        self.modal_open = true;
    }

    /// Drop the draft and close the modal. Never touches the list.
    pub fn close_modal(&mut self) {
        self.active_item = None;
        self.modal_open = false;
    }

    /// Select which partition `visible_items` yields.
    pub fn set_filter(&mut self, show_completed: bool) {
        self.view_completed = show_completed;
    }

    pub fn view_completed(&self) -> bool {
        self.view_completed
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn active_item(&self) -> Option<&ItemDraft> {
        self.active_item.as_ref()
    }

    pub fn todo_list(&self) -> &[TodoItem] {
        &self.todo_list
    }

    /// Items whose `completed` flag matches the current filter, in backend
    /// order.
    pub fn visible_items(&self) -> impl Iterator<Item = &TodoItem> {
        let shown = self.view_completed;
        self.todo_list
            .iter()
            .filter(move |item| item.completed == shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::item::ItemFields;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn controller_for(server: &MockServer) -> ListController {
        controller_at(&server.uri())
    }

    fn controller_at(base_url: &str) -> ListController {
        let api = ApiClient::new(&ClientConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        ListController::new(api)
    }

    fn item(id: u64, title: &str, completed: bool) -> serde_json::Value {
        serde_json::json!({
            "id": id, "title": title, "description": "d", "completed": completed
        })
    }

    fn draft(title: &str, description: &str) -> ItemDraft {
        ItemDraft::New(ItemFields {
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        })
    }

    #[tokio::test]
    async fn test_visible_items_partitions_by_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                item(1, "open one", false),
                item(2, "done one", true),
                item(3, "open two", false),
            ])))
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.refresh().await;

        for visible in controller.visible_items() {
            assert!(!visible.completed);
        }
        assert_eq!(controller.visible_items().count(), 2);

        controller.set_filter(true);
        let done: Vec<_> = controller.visible_items().collect();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, 2);

        // Membership both ways: every listed item shows up under exactly one
        // filter setting.
        controller.set_filter(false);
        let shown = controller.visible_items().count();
        controller.set_filter(true);
        let hidden = controller.visible_items().count();
        assert_eq!(shown + hidden, controller.todo_list().len());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([item(1, "stable", false)])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.refresh().await;
        let first = controller.todo_list().to_vec();
        controller.refresh().await;
        assert_eq!(controller.todo_list(), first.as_slice());
    }

    #[tokio::test]
    async fn test_single_item_filter_scenario() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([item(1, "A", false)])),
            )
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.refresh().await;
        assert_eq!(controller.todo_list().len(), 1);

        controller.set_filter(false);
        assert_eq!(controller.visible_items().count(), 1);

        controller.set_filter(true);
        assert_eq!(controller.visible_items().count(), 0);
    }

    #[tokio::test]
    async fn test_blank_submit_makes_no_network_call() {
        let server = MockServer::start().await;
        for verb in ["GET", "POST", "PUT", "DELETE"] {
            Mock::given(method(verb))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;
        }

        let mut controller = controller_for(&server);
        controller.open_for_create();

        let outcome = controller.submit(draft("   ", "something")).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);

        let outcome = controller.submit(draft("something", "\t")).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);

        // Rejection leaves the modal open and the list untouched.
        assert!(controller.modal_open());
        assert!(controller.todo_list().is_empty());
    }

    #[tokio::test]
    async fn test_new_draft_posts_once_and_never_puts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/todos/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([item(1, "fresh", false)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.open_for_create();
        let outcome = controller.submit(draft("fresh", "brand new")).await;

        assert_eq!(outcome, SubmitOutcome::Created);
        assert!(!controller.modal_open());
        // The post-mutation refresh already landed.
        assert_eq!(controller.todo_list().len(), 1);
    }

    #[tokio::test]
    async fn test_existing_draft_puts_once_and_never_posts() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/todos/4/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([item(4, "renamed", true)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        let outcome = controller
            .submit(ItemDraft::Existing {
                id: 4,
                fields: ItemFields {
                    title: "renamed".to_string(),
                    description: "still here".to_string(),
                    completed: true,
                },
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Updated);
        assert_eq!(controller.todo_list()[0].title, "renamed");
    }

    #[tokio::test]
    async fn test_delete_converges_to_backend_state() {
        let server = MockServer::start().await;
        // First fetch sees the item, the post-delete fetch does not.
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([item(1, "doomed", false)])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/todos/1/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.refresh().await;
        assert_eq!(controller.todo_list().len(), 1);

        let outcome = controller.delete_item(1).await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(controller.todo_list().iter().all(|i| i.id != 1));
    }

    #[tokio::test]
    async fn test_malformed_payload_clears_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([item(1, "ok", false)])),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "detail": "surprise" })),
            )
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.refresh().await;
        assert_eq!(controller.todo_list().len(), 1);

        controller.refresh().await;
        assert!(controller.todo_list().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_clears_list() {
        // This needs a server that dies on drop; the pooled
        // `MockServer::start()` keeps listening (mocks intact) after its
        // handle is dropped, so build an unpooled one.
        let server = MockServer::builder().start().await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([item(1, "ok", false)])),
            )
            .mount(&server)
            .await;

        let address = *server.address();
        let mut controller = controller_for(&server);
        controller.refresh().await;
        assert_eq!(controller.todo_list().len(), 1);

        drop(server);
        // Shutdown is graceful and runs on the server's own thread; wait for
        // the port to actually close so the refresh meets a dead server.
        for _ in 0..40 {
            if std::net::TcpStream::connect_timeout(&address, Duration::from_millis(25)).is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        controller.refresh().await;
        assert!(controller.todo_list().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejection_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/todos/"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;
        // No refresh after a failed mutation.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.open_for_create();
        let outcome = controller.submit(draft("valid", "also valid")).await;

        assert_eq!(outcome, SubmitOutcome::Failed(MutationKind::Create));
        // The modal was dismissed before the call and stays dismissed.
        assert!(!controller.modal_open());
    }

    #[tokio::test]
    async fn test_update_rejection_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/todos/2/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        let outcome = controller
            .submit(ItemDraft::Existing {
                id: 2,
                fields: ItemFields {
                    title: "t".to_string(),
                    description: "d".to_string(),
                    completed: false,
                },
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed(MutationKind::Update));
    }

    #[tokio::test]
    async fn test_delete_failure_reports_and_keeps_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/todos/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([item(7, "sticky", false)])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/todos/7/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut controller = controller_for(&server);
        controller.refresh().await;

        let outcome = controller.delete_item(7).await;
        assert_eq!(outcome, DeleteOutcome::Failed);
        // Failure skips the re-fetch, so the last known list stands.
        assert_eq!(controller.todo_list().len(), 1);
    }

    #[test]
    fn test_modal_lifecycle_is_pure_state() {
        let mut controller = controller_at("http://127.0.0.1:1");

        controller.open_for_create();
        assert!(controller.modal_open());
        let active = controller.active_item().unwrap();
        assert_eq!(active.existing_id(), None);
        assert!(active.fields().title.is_empty());
        assert!(!active.fields().completed);

        controller.close_modal();
        assert!(!controller.modal_open());
        assert!(controller.active_item().is_none());

        let existing = TodoItem {
            id: 11,
            title: "edit me".to_string(),
            description: "d".to_string(),
            completed: true,
        };
        controller.open_for_edit(&existing);
        let active = controller.active_item().unwrap();
        assert_eq!(active.existing_id(), Some(11));
        assert_eq!(active.fields().title, "edit me");
    }
}
