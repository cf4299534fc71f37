use serde::Serialize;
use tracing::{debug, info, warn};

use crate::modal::form::{Grade, ModalForm};
use crate::modal::pictures;
use crate::reply::{self, CommentSaved, Failure, Outcome};
use crate::transport::{Endpoint, Transport, TransportError};
use crate::utils;

/// Fields posted when an item is created or edited.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SaveItemRequest {
    pub coin_id: u32,
    pub version: Option<u32>,
    pub item: Option<u32>,
    pub quantity: u32,
    pub grade: Option<Grade>,
    pub value: Option<f64>,
    pub comment: String,
    pub for_swap: bool,
    pub swap_comment: String,
    pub section: u32,
    pub pictures: Vec<String>,
}

impl SaveItemRequest {
    pub fn from_form(form: &ModalForm, pictures: Vec<String>) -> Self {
        Self {
            coin_id: form.coin_id,
            version: form.version,
            item: form.item,
            quantity: form.quantity,
            grade: form.grade,
            value: form.value,
            comment: form.comment.clone(),
            for_swap: form.for_swap,
            swap_comment: form.swap_comment.clone(),
            section: form.section,
            pictures,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("coinId", self.coin_id.to_string()),
            (
                "version",
                self.version.map(|v| v.to_string()).unwrap_or_default(),
            ),
            (
                "item",
                self.item.map(|i| i.to_string()).unwrap_or_default(),
            ),
            ("quantity", self.quantity.to_string()),
            (
                "value",
                self.value.map(utils::format_amount).unwrap_or_default(),
            ),
            ("comment", self.comment.clone()),
            ("forSwap", if self.for_swap { "1" } else { "0" }.to_string()),
            ("swapComment", self.swap_comment.clone()),
            ("section", self.section.to_string()),
        ];
        // An unchecked radio group is not part of the submitted form.
        if let Some(grade) = self.grade {
            out.push(("grade", grade.code().to_string()));
        }
        for picture in &self.pictures {
            out.push(("pictures[]", picture.clone()));
        }
        out
    }
}

fn transport_failure<T>(endpoint: Endpoint, e: TransportError) -> Outcome<T> {
    warn!(endpoint = endpoint.path(), error = %e, "request failed");
    Outcome::Failed(Failure::Transport(e.to_string()))
}

fn log_outcome<T>(endpoint: Endpoint, outcome: &Outcome<T>) {
    match outcome {
        Outcome::Done(_) => debug!(endpoint = endpoint.path(), "request succeeded"),
        Outcome::SessionExpired => warn!(endpoint = endpoint.path(), "session expired"),
        Outcome::Failed(f) => {
            warn!(endpoint = endpoint.path(), reply = %f.detail(), "request rejected")
        }
    }
}

/// Typed calls to the collection endpoints. Every call returns an
/// [`Outcome`]; transport errors are folded into `Outcome::Failed` since
/// the user sees them the same way as a refusal from the server.
#[derive(Clone, Debug)]
pub struct CollectionClient<T: Transport> {
    transport: T,
}

impl<T: Transport> CollectionClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn exchange(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<String, Outcome<()>> {
        self.transport
            .send(endpoint, params)
            .await
            .map_err(|e| transport_failure(endpoint, e))
    }

    /// Creates or updates an item. Success carries the new markup of the
    /// item's row.
    pub async fn save_item(&self, req: &SaveItemRequest) -> Outcome<String> {
        let endpoint = Endpoint::SaveItem;
        let outcome = match self.exchange(endpoint, &req.params()).await {
            Ok(body) => reply::classify_markup(body),
            Err(failed) => failed.map(|_| String::new()),
        };
        log_outcome(endpoint, &outcome);
        if outcome.is_done() {
            info!(coin = req.coin_id, item = ?req.item, "collection item saved");
        }
        outcome
    }

    pub async fn remove_item(
        &self,
        item: u32,
        version: Option<u32>,
        collectible: u32,
    ) -> Outcome<String> {
        let endpoint = Endpoint::RemoveItem;
        let params = [
            ("item", item.to_string()),
            ("version", version.map(|v| v.to_string()).unwrap_or_default()),
            ("collectible", collectible.to_string()),
        ];
        let outcome = match self.exchange(endpoint, &params).await {
            Ok(body) => reply::classify_markup(body),
            Err(failed) => failed.map(|_| String::new()),
        };
        log_outcome(endpoint, &outcome);
        if outcome.is_done() {
            info!(item, collectible, "collection item removed");
        }
        outcome
    }

    /// Sets the want / don't-want flags of a collectible type on the wish list.
    pub async fn set_wishes(&self, type_tag: &str, wants: bool, unwanted: bool) -> Outcome<()> {
        let endpoint = Endpoint::ModifyWishes;
        let params = [
            ("type", type_tag.to_string()),
            ("veux", utils::bool_param(wants).to_string()),
            ("veux_pas", utils::bool_param(unwanted).to_string()),
        ];
        let outcome = match self.exchange(endpoint, &params).await {
            Ok(body) => reply::classify_status(&body),
            Err(failed) => failed,
        };
        log_outcome(endpoint, &outcome);
        outcome
    }

    pub async fn save_quantity(&self, piece: u32, status: &str, quantity: &str) -> Outcome<()> {
        let endpoint = Endpoint::SaveQuantity;
        let params = [
            ("piece", piece.to_string()),
            ("etat", status.to_string()),
            ("quantite", quantity.to_string()),
        ];
        let outcome = match self.exchange(endpoint, &params).await {
            Ok(body) => reply::classify_status(&body),
            Err(failed) => failed,
        };
        log_outcome(endpoint, &outcome);
        outcome
    }

    pub async fn save_comment(&self, piece: u32, text: &str) -> Outcome<CommentSaved> {
        let endpoint = Endpoint::SaveComment;
        let params = [("piece", piece.to_string()), ("texte", text.to_string())];
        let outcome = match self.exchange(endpoint, &params).await {
            Ok(body) => reply::classify_comment(&body),
            Err(failed) => failed.map(|_| CommentSaved::Saved),
        };
        if outcome == Outcome::Done(CommentSaved::NoItems) {
            debug!(piece, "comment not stored: piece has no items");
        }
        log_outcome(endpoint, &outcome);
        outcome
    }

    /// Uploads one picture. Success carries the server-side filename; a
    /// refusal carries the server's message, meant to be shown as is.
    pub async fn upload_picture(&self, file_name: &str, bytes: Vec<u8>) -> Outcome<String> {
        let endpoint = Endpoint::UploadPicture;
        if !pictures::is_accepted(file_name) {
            return Outcome::Failed(Failure::Rejected(
                pictures::INVALID_TYPE_MESSAGE.to_string(),
            ));
        }
        let outcome = match self.transport.upload(file_name, bytes).await {
            Ok(body) => reply::classify_upload(&body),
            Err(e) => transport_failure(endpoint, e),
        };
        log_outcome(endpoint, &outcome);
        outcome
    }
}
