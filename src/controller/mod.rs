mod handlers;

pub use self::handlers::{COMMENT_PROMPT, DELETE_CONFIRMATION, PREVIOUS_COMMENT_ATTR};

use std::sync::Arc;

use maud::html;
use thiserror::Error;
use tracing::debug;

use crate::client::CollectionClient;
use crate::config::SiteConfig;
use crate::events::{Action, Key, KeyBindings};
use crate::modal::form::{Grade, ModalRequest};
use crate::modal::pictures::PictureFile;
use crate::modal::render::render_modal;
use crate::modal::Modal;
use crate::page::{NodeId, Page};
use crate::prompt::Prompter;
use crate::reply::{Failure, Outcome, GENERIC_ERROR_MESSAGE};
use crate::transport::Transport;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no item form is open")]
    NoModal,
    #[error("page has no element matching `{selector}`")]
    MissingElement { selector: String },
    #[error("no picture `{name}` is waiting for upload")]
    NoPendingUpload { name: String },
    #[error("no picture at position {index}")]
    UnknownPicture { index: usize },
}

/// What a handler did to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    Applied,
    /// The user dismissed a confirmation or prompt; nothing was sent.
    Cancelled,
    SessionExpired,
    Failed,
    /// The server accepted the call but there was nothing to repaint.
    Ignored,
}

impl<T> From<&Outcome<T>> for HandlerOutcome {
    fn from(outcome: &Outcome<T>) -> Self {
        match outcome {
            Outcome::Done(_) => Self::Applied,
            Outcome::SessionExpired => Self::SessionExpired,
            Outcome::Failed(_) => Self::Failed,
        }
    }
}

impl HandlerOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Cancelled => "cancelled",
            Self::SessionExpired => "session_expired",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
        }
    }
}

/// Drives one collection page: owns the document, the open item form and
/// the key listeners, and runs every handler against them. Handlers take
/// `&mut self`, so at most one runs at a time.
pub struct Controller<T: Transport, P: Prompter> {
    page: Page,
    client: CollectionClient<T>,
    prompter: P,
    site: Arc<SiteConfig>,
    keys: KeyBindings,
    modal: Option<Modal>,
}

impl<T: Transport, P: Prompter> Controller<T, P> {
    pub fn new(page: Page, transport: T, prompter: P, site: Arc<SiteConfig>) -> Self {
        Self {
            page,
            client: CollectionClient::new(transport),
            prompter,
            site,
            keys: KeyBindings::new(),
            modal: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn client(&self) -> &CollectionClient<T> {
        &self.client
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.keys
    }

    /// Builds the item form for `req`, attaches it to the page and starts
    /// listening for Escape. An already open form is closed first.
    pub fn open_modal(&mut self, req: ModalRequest) -> Result<NodeId, ControllerError> {
        if self.modal.is_some() {
            self.close_modal();
        }
        let (form, pictures) = Modal::preview(req, &self.site);
        let markup = render_modal(&form, &pictures, &self.site).into_string();
        let body = self.page.body();
        let node = self
            .page
            .append_markup(body, &markup)
            .first()
            .copied()
            .ok_or_else(|| ControllerError::MissingElement {
                selector: "section.modal".to_string(),
            })?;
        let escape = self.keys.subscribe(Key::Escape, Action::CloseModal);
        debug!(coin = form.coin_id, mode = ?form.mode, "item form opened");
        self.modal = Some(Modal::attach(form, pictures, node, escape));
        Ok(node)
    }

    /// Removes every `.modal` node and releases the Escape listener.
    /// Returns whether a form was open.
    pub fn close_modal(&mut self) -> bool {
        for node in self.page.with_class("modal") {
            self.page.remove(node);
        }
        match self.modal.take() {
            Some(modal) => {
                self.keys.unsubscribe(modal.escape_subscription());
                debug!("item form closed");
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        for action in self.keys.dispatch(key) {
            match action {
                Action::CloseModal => {
                    self.close_modal();
                }
            }
        }
    }

    /// Click on a grade radio. Clicking the checked grade clears the group.
    pub fn click_grade(&mut self, grade: Grade) -> Result<Option<Grade>, ControllerError> {
        let modal = self.modal.as_mut().ok_or(ControllerError::NoModal)?;
        let checked = modal.click_grade(grade);
        for g in Grade::ALL {
            if let Some(radio) = self
                .page
                .node_by_id_mut(&format!("collec_form_grade_{}", g.code()))
            {
                radio.checked = checked == Some(g);
            }
        }
        Ok(checked)
    }

    /// Reveals the rows of a collectible whose version is unknown.
    pub fn show_undetermined_line(&mut self, coin: u32) {
        for line in self.page.with_class(&format!("undetermined_line{coin}")) {
            if let Some(node) = self.page.get_mut(line) {
                node.display = None;
            }
            for d in self.page.descendants(line) {
                if let Some(button) = self.page.get_mut(d).filter(|n| n.tag == "button") {
                    button.tabindex = Some("0".to_string());
                }
            }
        }
        for filler in self.page.with_class(&format!("undetermined_filler{coin}")) {
            self.page.remove(filler);
        }
    }

    /// Adds a local file to the form's upload queue. Submitting is blocked
    /// until the queue drains.
    pub fn queue_upload(&mut self, name: &str) -> Result<usize, ControllerError> {
        let modal = self.modal.as_mut().ok_or(ControllerError::NoModal)?;
        let index = modal.pictures.add_file(name);
        let modal_node = modal.node();
        if let Some(zone) = self.page.by_id("collec_form_dropzone") {
            for hint in self.page.descendants(zone) {
                if self.page.get(hint).is_some_and(|n| n.has_class("dz-message")) {
                    self.page.remove(hint);
                }
            }
            let preview = html! { div.dz-preview data-name=(name) { span.dz-filename { (name) } } };
            self.page.append_markup(zone, &preview.into_string());
        }
        self.set_submit_disabled(modal_node, true);
        Ok(index)
    }

    /// Sends a queued file. A refusal is shown to the user as the server
    /// worded it.
    pub async fn send_upload(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<HandlerOutcome, ControllerError> {
        self.modal
            .as_ref()
            .and_then(|m| m.pictures.pending_index(name))
            .ok_or_else(|| ControllerError::NoPendingUpload {
                name: name.to_string(),
            })?;
        let outcome = self.client.upload_picture(name, bytes).await;

        let modal = self.modal.as_mut().ok_or(ControllerError::NoModal)?;
        let index = modal
            .pictures
            .pending_index(name)
            .ok_or_else(|| ControllerError::NoPendingUpload {
                name: name.to_string(),
            })?;
        let modal_node = modal.node();
        match &outcome {
            Outcome::Done(server_name) => {
                let accepted = modal.pictures.accept(index, server_name).cloned();
                if let Some(file) = accepted {
                    self.show_accepted(index, &file);
                }
            }
            // Upload replies carry no session marker; anything but a file
            // name is shown as is.
            rejected => {
                modal.pictures.reject(index);
                self.remove_preview(index);
                let message = match rejected {
                    Outcome::Failed(Failure::Rejected(message)) => message.as_str(),
                    _ => GENERIC_ERROR_MESSAGE,
                };
                self.prompter.alert(message);
            }
        }
        let drained = self.modal.as_ref().is_some_and(|m| !m.pictures.is_uploading());
        if drained {
            self.set_submit_disabled(modal_node, false);
        }
        Ok(HandlerOutcome::from(&outcome))
    }

    pub async fn upload_picture(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<HandlerOutcome, ControllerError> {
        self.queue_upload(name)?;
        self.send_upload(name, bytes).await
    }

    /// Removes a picture from the upload widget and deselects it in the
    /// submitted list.
    pub fn remove_picture(&mut self, index: usize) -> Result<PictureFile, ControllerError> {
        let modal = self.modal.as_mut().ok_or(ControllerError::NoModal)?;
        let file = modal
            .pictures
            .remove_file(index)
            .ok_or(ControllerError::UnknownPicture { index })?;
        self.remove_preview(index);
        if let (Some(select), Some(server_name)) =
            (self.page.by_id("collec_form_pictures"), file.server_name.as_deref())
        {
            for option in self.page.descendants(select) {
                if let Some(node) = self
                    .page
                    .get_mut(option)
                    .filter(|n| n.tag == "option" && n.value == server_name)
                {
                    node.selected = false;
                }
            }
        }
        Ok(file)
    }

    fn previews(&self) -> Vec<NodeId> {
        match self.page.by_id("collec_form_dropzone") {
            Some(zone) => self
                .page
                .descendants(zone)
                .into_iter()
                .filter(|n| self.page.get(*n).is_some_and(|n| n.has_class("dz-preview")))
                .collect(),
            None => Vec::new(),
        }
    }

    fn remove_preview(&mut self, index: usize) {
        if let Some(preview) = self.previews().get(index).copied() {
            self.page.remove(preview);
        }
    }

    fn show_accepted(&mut self, index: usize, file: &PictureFile) {
        let server_name = file.server_name.as_deref().unwrap_or(&file.name);
        if let Some(select) = self.page.by_id("collec_form_pictures") {
            let option = html! { option value=(server_name) selected { (server_name) } };
            self.page.append_markup(select, &option.into_string());
        }
        if let (Some(preview), Some(thumbnail)) =
            (self.previews().get(index).copied(), file.thumbnail.as_deref())
        {
            let img = html! { img.dz-thumbnail src=(thumbnail) alt=(file.name); };
            self.page.append_markup(preview, &img.into_string());
        }
    }

    fn submit_inputs(&self, modal_node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for area in self.page.descendants(modal_node) {
            if self
                .page
                .get(area)
                .is_some_and(|n| n.has_class("collec_form_submit"))
            {
                out.extend(
                    self.page
                        .descendants(area)
                        .into_iter()
                        .filter(|n| self.page.get(*n).is_some_and(|n| n.tag == "input")),
                );
            }
        }
        out
    }

    fn set_submit_disabled(&mut self, modal_node: NodeId, disabled: bool) {
        let inputs = self.submit_inputs(modal_node);
        self.set_disabled(&inputs, disabled);
    }

    fn set_disabled(&mut self, nodes: &[NodeId], disabled: bool) {
        for node in nodes {
            if let Some(n) = self.page.get_mut(*node) {
                n.disabled = disabled;
            }
        }
    }

    fn alert_failure<R>(&mut self, outcome: &Outcome<R>) {
        if let Some(message) = outcome.alert_message() {
            self.prompter.alert(message);
        }
    }
}
