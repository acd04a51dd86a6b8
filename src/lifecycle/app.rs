use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::RestaurantApi;
use crate::clients::{CachedClient, RestaurantClient};
use crate::config::{ClientConfig, ConfigError};
use crate::confirm::{ConfirmError, Confirmation, DialogKind, PendingAction};
use crate::form::{FieldErrors, FormField, RestaurantForm};
use crate::framework::{CacheActor, CacheError, MutationHandle, RemoteSource};
use crate::list::ListView;
use crate::model::{RestaurantId, RestaurantPatch, RestaurantRecord};

pub const SAVE_FAILED: &str = "Failed to save restaurant. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete restaurant. Please try again.";

/// Errors returned by [`RestaurantApp`] actions.
#[derive(Debug, Error)]
pub enum AppError {
    /// A save or delete is still pending; the controls are disabled.
    #[error("Another change is still in progress")]
    Busy,
    #[error("No form is open")]
    NoForm,
    /// Deleting is only offered from the list, not over the form.
    #[error("Close the form first")]
    FormOpen,
    #[error("A confirmation is still open")]
    PromptOpen,
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error(transparent)]
    Confirm(#[from] ConfirmError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Cache actor failed: {0}")]
    ActorFailed(String),
}

/// Everything the screen shows besides the records themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// The add/edit form, when visible.
    pub form: Option<RestaurantForm>,
    /// The record the form is editing.
    pub editing: Option<RestaurantRecord>,
    /// 1-based.
    pub current_page: usize,
    pub confirmation: Confirmation,
    /// Inline error shown above the list when loading it failed.
    pub banner: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            form: None,
            editing: None,
            current_page: 1,
            confirmation: Confirmation::default(),
            banner: None,
        }
    }
}

enum PendingSave {
    Create {
        name: String,
        handle: MutationHandle<RestaurantRecord>,
    },
    Update {
        name: String,
        handle: MutationHandle<RestaurantRecord>,
    },
}

struct PendingDelete {
    name: String,
    handle: MutationHandle<RestaurantId>,
}

/// The root orchestrator of the restaurant list.
///
/// `RestaurantApp` is responsible for:
/// - **Lifecycle Management**: starting the cache actor and shutting it down
/// - **UI State**: one [`UiState`], changed only through the named actions below
/// - **Workflow**: routing form submits to create/update and chaining the
///   delete confirmation into its result notice
///
/// # Example
///
/// ```ignore
/// let mut app = RestaurantApp::start(ClientConfig::from_env()?)?;
/// app.refresh().await?;
/// println!("{}", app.view());
///
/// app.request_delete(&record)?;
/// app.confirm()?;          // dialog is now "Loading..."
/// app.settle().await;      // dialog now reads "Restaurant Deleted!"
/// app.shutdown().await?;
/// ```
pub struct RestaurantApp {
    client: RestaurantClient,
    state: UiState,
    records: Arc<Vec<RestaurantRecord>>,
    saving: Option<PendingSave>,
    deleting: Option<PendingDelete>,
    cancel: CancellationToken,
    actor: Option<JoinHandle<()>>,
}

impl RestaurantApp {
    /// Starts the cache actor over the HTTP API described by `config`.
    pub fn start(config: ClientConfig) -> Result<Self, AppError> {
        let api = RestaurantApi::new(&config)?;
        info!(endpoint = api.endpoint(), "Starting restaurant app");
        Ok(Self::with_remote(api, config.buffer_size))
    }

    /// Starts the cache actor over any remote source.
    pub fn with_remote<R>(remote: R, buffer_size: usize) -> Self
    where
        R: RemoteSource<RestaurantRecord>,
    {
        let (actor, client) = CacheActor::new(remote, buffer_size);
        let handle = tokio::spawn(actor.run());
        let mut app = Self::new(RestaurantClient::new(client));
        app.actor = Some(handle);
        app
    }

    /// Wraps an existing client; the caller owns the actor.
    pub fn new(client: RestaurantClient) -> Self {
        let cancel = CancellationToken::new();
        Self {
            client: client.with_cancellation(cancel.clone()),
            state: UiState::default(),
            records: Arc::default(),
            saving: None,
            deleting: None,
            cancel,
            actor: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// The last loaded snapshot.
    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn client(&self) -> &RestaurantClient {
        &self.client
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_some()
    }

    // =========================================================================
    // Form
    // =========================================================================

    pub fn open_create_form(&mut self) {
        debug!("Opening create form");
        self.state.form = Some(RestaurantForm::new());
        self.state.editing = None;
    }

    pub fn open_edit_form(&mut self, record: &RestaurantRecord) {
        debug!(id = %record.id, "Opening edit form");
        self.state.form = Some(RestaurantForm::for_record(record));
        self.state.editing = Some(record.clone());
    }

    pub fn close_form(&mut self) -> Result<(), AppError> {
        if self.is_saving() {
            return Err(AppError::Busy);
        }
        debug!("Closing form");
        self.state.form = None;
        self.state.editing = None;
        Ok(())
    }

    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<serde_json::Value>,
    ) -> Result<(), AppError> {
        if self.is_saving() {
            return Err(AppError::Busy);
        }
        let form = self.state.form.as_mut().ok_or(AppError::NoForm)?;
        form.set(field, value);
        Ok(())
    }

    /// Validates the form and starts the create or update in the background.
    /// Call [`settle`](Self::settle) to collect the outcome.
    pub fn submit_form(&mut self) -> Result<(), AppError> {
        if self.is_saving() {
            return Err(AppError::Busy);
        }
        if self.state.confirmation.is_open() {
            return Err(AppError::PromptOpen);
        }
        let form = self.state.form.as_mut().ok_or(AppError::NoForm)?;
        let draft = form.submit().map_err(|errors| AppError::Invalid(errors.clone()))?;

        let pending = match &self.state.editing {
            Some(record) => {
                let patch = RestaurantPatch::between(record, &draft);
                debug!(id = %record.id, ?patch, "Submitting update");
                PendingSave::Update {
                    name: record.name.clone(),
                    handle: self.client.spawn_update(record.id, patch),
                }
            }
            None => {
                debug!(name = %draft.name, "Submitting create");
                PendingSave::Create {
                    name: draft.name.clone(),
                    handle: self.client.spawn_create(draft),
                }
            }
        };
        self.saving = Some(pending);
        Ok(())
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Opens the delete prompt. Refused while a save or delete is pending or
    /// the form is showing.
    pub fn request_delete(&mut self, record: &RestaurantRecord) -> Result<(), AppError> {
        if self.is_saving() || self.state.confirmation.is_loading() {
            return Err(AppError::Busy);
        }
        if self.state.form.is_some() {
            return Err(AppError::FormOpen);
        }
        debug!(id = %record.id, "Requesting delete");
        self.state.confirmation.request(
            DialogKind::Delete,
            "Delete Restaurant",
            format!("Are you sure you want to delete \"{}\"?", record.name),
            PendingAction::DeleteRestaurant {
                id: record.id,
                name: record.name.clone(),
            },
        );
        Ok(())
    }

    /// Runs the open prompt's action. A delete is started in the background
    /// and leaves the prompt loading until [`settle`](Self::settle).
    pub fn confirm(&mut self) -> Result<(), AppError> {
        match self.state.confirmation.confirm()? {
            PendingAction::Acknowledge => {}
            PendingAction::CloseForm => {
                self.state.form = None;
                self.state.editing = None;
            }
            PendingAction::DeleteRestaurant { id, name } => {
                debug!(%id, "Starting delete");
                self.deleting = Some(PendingDelete {
                    name,
                    handle: self.client.spawn_delete(id),
                });
            }
        }
        Ok(())
    }

    pub fn cancel_confirmation(&mut self) -> Result<(), AppError> {
        Ok(self.state.confirmation.cancel()?)
    }

    /// Waits for pending mutations and shows their result notices.
    pub async fn settle(&mut self) {
        let mut changed = false;

        if let Some(save) = self.saving.take() {
            let (result, title, description) = match save {
                PendingSave::Create { name, handle } => (
                    handle.outcome().await,
                    "Restaurant Created!",
                    format!("{name} has been successfully added to your list."),
                ),
                PendingSave::Update { name, handle } => (
                    handle.outcome().await,
                    "Restaurant Updated!",
                    format!("{name} has been successfully updated."),
                ),
            };
            let notice = match result {
                Ok(record) => {
                    info!(id = %record.id, "Restaurant saved");
                    changed = true;
                    (DialogKind::Success, title, description, PendingAction::CloseForm)
                }
                Err(e) => {
                    warn!(error = %e, "Error saving restaurant");
                    (
                        DialogKind::Warning,
                        "Error",
                        SAVE_FAILED.to_string(),
                        PendingAction::Acknowledge,
                    )
                }
            };
            // A loading prompt belongs to a running delete; never cover it.
            if self.state.confirmation.is_loading() {
                warn!(title = notice.1, "Save notice dropped over a loading prompt");
            } else {
                let (kind, title, description, action) = notice;
                self.state.confirmation.request(kind, title, description, action);
            }
        }

        if let Some(PendingDelete { name, handle }) = self.deleting.take() {
            let resolved = match handle.outcome().await {
                Ok(id) => {
                    info!(%id, "Restaurant deleted");
                    changed = true;
                    self.state.confirmation.resolve(
                        DialogKind::Success,
                        "Restaurant Deleted!",
                        format!("{name} has been successfully removed from your list."),
                    )
                }
                Err(e) => {
                    warn!(error = %e, "Error deleting restaurant");
                    self.state
                        .confirmation
                        .resolve(DialogKind::Warning, "Error", DELETE_FAILED)
                }
            };
            if let Err(e) = resolved {
                warn!(error = %e, "Delete result had no prompt to show in");
            }
        }

        if changed {
            // The banner carries any failure.
            let _ = self.refresh().await;
        }
    }

    // =========================================================================
    // List
    // =========================================================================

    pub fn change_page(&mut self, page: usize) {
        debug!(page, "Changing page");
        self.state.current_page = page.max(1);
    }

    /// Loads the snapshot; a failure is kept as the banner and returned.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        match self.client.list().await {
            Ok(records) => {
                debug!(size = records.len(), "Refreshed");
                self.records = records;
                self.state.banner = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load restaurants");
                self.state.banner = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// The screen as text: banner, current page of cards, open prompt.
    pub fn view(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = &self.state.banner {
            out.push_str(&format!("Error: {banner}\n\n"));
        }
        out.push_str(&ListView::new(&self.records, self.state.current_page).to_string());
        if self.state.confirmation.is_open() {
            out.push('\n');
            out.push_str(&self.state.confirmation.to_string());
        }
        out
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Cancels outstanding work, closes the channel and waits for the actor.
    pub async fn shutdown(self) -> Result<(), AppError> {
        info!("Shutting down...");
        self.cancel.cancel();

        let Self {
            client,
            saving,
            deleting,
            actor,
            ..
        } = self;
        drop(client);
        if let Some(save) = saving {
            let handle = match save {
                PendingSave::Create { handle, .. } | PendingSave::Update { handle, .. } => handle,
            };
            let _ = handle.outcome().await;
        }
        if let Some(delete) = deleting {
            let _ = delete.handle.outcome().await;
        }

        if let Some(actor) = actor {
            if let Err(e) = actor.await {
                error!("Actor task failed: {:?}", e);
                return Err(AppError::ActorFailed(e.to_string()));
            }
        }
        info!("Shutdown complete.");
        Ok(())
    }
}
