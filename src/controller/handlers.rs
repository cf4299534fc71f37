use tracing::{debug, info};

use super::{Controller, ControllerError, HandlerOutcome};
use crate::client::SaveItemRequest;
use crate::counts;
use crate::page::NodeId;
use crate::prompt::Prompter;
use crate::reply::{CommentSaved, Outcome};
use crate::transport::Transport;
use crate::utils;

pub const DELETE_CONFIRMATION: &str = "Do you wish to remove this item from your collection?";
pub const COMMENT_PROMPT: &str = "Enter your personal comment.\nYou may register varieties, errors...";

/// Attribute of `#lien_comm<piece>` holding the text the next comment
/// prompt starts from.
pub const PREVIOUS_COMMENT_ATTR: &str = "data-previous";

pub(super) fn row_id(version: Option<u32>, coin: u32) -> String {
    match version {
        Some(v) => format!("collec_line{v}"),
        None => format!("collec_line0_{coin}"),
    }
}

impl<T: Transport, P: Prompter> Controller<T, P> {
    fn modal_buttons(&self) -> Vec<NodeId> {
        self.page
            .with_class("modal")
            .into_iter()
            .flat_map(|m| self.page.descendants(m))
            .filter(|n| self.page.get(*n).is_some_and(|n| n.has_class("button")))
            .collect()
    }

    fn replace_row(&mut self, version: Option<u32>, coin: u32, markup: &str) {
        let id = row_id(version, coin);
        match self.page.by_id(&id) {
            Some(row) => self.page.set_inner_html(row, markup),
            None => debug!(row = %id, "row not on page, nothing to repaint"),
        }
    }

    /// Submits the open item form. On success the item row is repainted,
    /// counts are refreshed and the form closes; with `add_again` a fresh
    /// creation form for the same collectible and version opens right after.
    pub async fn save_collection(
        &mut self,
        add_again: bool,
    ) -> Result<HandlerOutcome, ControllerError> {
        let modal = self.modal.as_ref().ok_or(ControllerError::NoModal)?;
        let req = SaveItemRequest::from_form(&modal.form, modal.pictures.selected());
        let reopen = modal
            .form
            .is_create()
            .then(|| modal.form.reopen_request(req.version));

        let buttons = self.modal_buttons();
        self.set_disabled(&buttons, true);

        let outcome = self.client.save_item(&req).await;
        match &outcome {
            Outcome::Done(markup) => {
                self.replace_row(req.version, req.coin_id, markup);
                if req.version.is_none() {
                    self.show_undetermined_line(req.coin_id);
                }
                counts::refresh_collection_count(&mut self.page, req.coin_id);
                self.close_modal();
                if let Some(next) = reopen.filter(|_| add_again) {
                    self.open_modal(next)?;
                }
            }
            _ => {
                self.set_disabled(&buttons, false);
                self.alert_failure(&outcome);
            }
        }
        Ok(HandlerOutcome::from(&outcome))
    }

    /// Removes an item after the user confirms.
    pub async fn delete_collection_item(
        &mut self,
        item: u32,
        version: Option<u32>,
        coin: u32,
    ) -> HandlerOutcome {
        if !self.prompter.confirm(DELETE_CONFIRMATION) {
            debug!(item, "removal declined");
            return HandlerOutcome::Cancelled;
        }
        let outcome = self.client.remove_item(item, version, coin).await;
        match &outcome {
            Outcome::Done(markup) => {
                self.replace_row(version, coin, markup);
                counts::refresh_collection_count(&mut self.page, coin);
            }
            _ => self.alert_failure(&outcome),
        }
        HandlerOutcome::from(&outcome)
    }

    /// The "want" box of `type_tag` was set to `checked`. The page still
    /// shows the state from before the click.
    pub async fn veux(&mut self, type_tag: &str, checked: bool) -> HandlerOutcome {
        self.toggle_wishes(type_tag, checked, false).await
    }

    /// The "don't want" box of `type_tag` was set to `checked`.
    pub async fn veux_pas(&mut self, type_tag: &str, checked: bool) -> HandlerOutcome {
        self.toggle_wishes(type_tag, false, checked).await
    }

    async fn toggle_wishes(&mut self, type_tag: &str, wants: bool, unwanted: bool) -> HandlerOutcome {
        let want_boxes = self.page.with_class(&format!("check_veux{type_tag}"));
        let unwanted_boxes = self.page.with_class(&format!("check_veux_pas{type_tag}"));
        let before: Vec<(NodeId, bool)> = want_boxes
            .iter()
            .chain(unwanted_boxes.iter())
            .filter_map(|n| self.page.get(*n).map(|node| (*n, node.checked)))
            .collect();

        for (boxes, state) in [(&want_boxes, wants), (&unwanted_boxes, unwanted)] {
            for n in boxes.iter() {
                if let Some(node) = self.page.get_mut(*n) {
                    node.checked = state;
                    node.disabled = true;
                }
            }
        }

        let outcome = self.client.set_wishes(type_tag, wants, unwanted).await;
        let restore = !outcome.is_done();
        for (n, checked) in before {
            if let Some(node) = self.page.get_mut(n) {
                node.disabled = false;
                if restore {
                    node.checked = checked;
                }
            }
        }
        if restore {
            self.alert_failure(&outcome);
        }
        HandlerOutcome::from(&outcome)
    }

    /// Saves a legacy quantity field `#<status><piece>`. The field turns
    /// pink while the request runs and white once saved; with `type_piece`
    /// the legacy counters of that type are recomputed.
    pub async fn modifier(
        &mut self,
        piece: u32,
        status: &str,
        type_piece: Option<&str>,
    ) -> Result<HandlerOutcome, ControllerError> {
        let id = format!("{status}{piece}");
        let field = self
            .page
            .node_by_id_mut(&id)
            .ok_or_else(|| ControllerError::MissingElement {
                selector: format!("#{id}"),
            })?;
        field.background = Some("#FF99CC".to_string());
        let quantity = field.value.clone();

        let outcome = self.client.save_quantity(piece, status, &quantity).await;
        if outcome.is_done() {
            if let Some(field) = self.page.node_by_id_mut(&id) {
                field.background = Some("#FFFFFF".to_string());
            }
            if let Some(type_tag) = type_piece {
                counts::refresh_legacy_count(&mut self.page, type_tag);
            }
            info!(piece, status, quantity = %quantity, "legacy quantity saved");
        } else {
            self.alert_failure(&outcome);
        }
        Ok(HandlerOutcome::from(&outcome))
    }

    /// Text the comment prompt of `piece` starts from.
    pub fn previous_comment(&self, piece: u32) -> String {
        self.page
            .node_by_id(&format!("lien_comm{piece}"))
            .and_then(|link| link.attr(PREVIOUS_COMMENT_ATTR))
            .map(|s| s.to_string())
            .or_else(|| {
                self.page
                    .by_id(&format!("comm{piece}"))
                    .map(|n| self.page.text_content(n))
            })
            .unwrap_or_default()
    }

    /// Asks for a new personal comment and saves it.
    pub async fn comm_perso(&mut self, piece: u32) -> HandlerOutcome {
        let previous = self.previous_comment(piece);
        let Some(text) = self.prompter.prompt(COMMENT_PROMPT, &previous) else {
            return HandlerOutcome::Cancelled;
        };

        let outcome = self.client.save_comment(piece, &text).await;
        match &outcome {
            Outcome::Done(CommentSaved::Saved) => {
                if let Some(display) = self.page.by_id(&format!("comm{piece}")) {
                    self.page.set_inner_html(display, &utils::html_encode(&text));
                }
                if let Some(link) = self.page.node_by_id_mut(&format!("lien_comm{piece}")) {
                    link.attrs
                        .insert(PREVIOUS_COMMENT_ATTR.to_string(), text.clone());
                }
                HandlerOutcome::Applied
            }
            Outcome::Done(CommentSaved::NoItems) => HandlerOutcome::Ignored,
            _ => {
                self.alert_failure(&outcome);
                HandlerOutcome::from(&outcome)
            }
        }
    }
}
