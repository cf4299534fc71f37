use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::SiteConfig;
use crate::controller::{Controller, ControllerError, HandlerOutcome, COMMENT_PROMPT, DELETE_CONFIRMATION};
use crate::counts;
use crate::events::Key;
use crate::modal::form::{CollectibleType, Grade, ModalRequest};
use crate::modal::pictures::INVALID_TYPE_MESSAGE;
use crate::modal::render::render_modal;
use crate::modal::Modal;
use crate::page::{NodeId, Page};
use crate::prompt::Prompter;
use crate::reply::{DISCONNECTED_MESSAGE, GENERIC_ERROR_MESSAGE};
use crate::transport::{ApiRequest, ApiResponse, Endpoint, Transport, TransportError};


type Params = Vec<(&'static str, String)>;

/// Replies with canned bodies in order and records every request.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    sent: Mutex<Vec<(Endpoint, Params)>>,
    api_replies: Mutex<VecDeque<ApiResponse>>,
    api_sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn replying(bodies: &[&str]) -> Self {
        let transport = Self::default();
        for body in bodies {
            transport.push(Ok(body.to_string()));
        }
        transport
    }

    fn push(&self, reply: Result<String, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn next(&self, endpoint: Endpoint) -> Result<String, TransportError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Status {
                endpoint: endpoint.path(),
                status: 599,
            }))
    }

    fn sent(&self) -> Vec<(Endpoint, Params)> {
        self.sent.lock().unwrap().clone()
    }

    fn push_api(&self, status: u16, body: &str) {
        self.api_replies.lock().unwrap().push_back(ApiResponse {
            status,
            body: body.to_string(),
        });
    }

    fn api_sent(&self) -> Vec<ApiRequest> {
        self.api_sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, endpoint: Endpoint, params: &[(&'static str, String)]) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push((endpoint, params.to_vec()));
        self.next(endpoint)
    }

    async fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> Result<String, TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((Endpoint::UploadPicture, vec![("file", file_name.to_string())]));
        self.next(Endpoint::UploadPicture)
    }

    async fn api(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.api_sent.lock().unwrap().push(request.clone());
        self.api_replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(TransportError::Status {
                endpoint: "api",
                status: 599,
            })
    }
}

#[derive(Default)]
struct ScriptedPrompter {
    alerts: Vec<String>,
    confirms: Vec<String>,
    confirm_answer: bool,
    prompts: Vec<(String, String)>,
    answers: VecDeque<Option<String>>,
}

impl Prompter for ScriptedPrompter {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self.prompts.push((message.to_string(), default.to_string()));
        self.answers.pop_front().flatten()
    }
}

const PAGE: &str = r##"
<table>
  <tr id="collec_line31"><td><span class="collec_q col95">1</span></td></tr>
  <tr id="collec_line0_95" class="undetermined_line95" style="display:none"><td><button type="button" tabindex="-1">Edit</button></td></tr>
  <tr class="undetermined_filler95"><td></td></tr>
</table>
<span id="affichage_qc95">1</span>
<span id="affichage_qe_cadre95" style="display:none">(<span id="affichage_qe95">0</span>)</span>
<span id="affichage_qt95">1</span>
<input type="checkbox" class="check_veux95">
<input type="checkbox" class="check_veux_pas95" checked>
<input type="text" id="qc501" class="qc7" value="2">
<input type="text" id="qe501" class="qe7" value="0">
<input type="text" id="qc502" class="qc7" value="3">
<span id="affichage_qc7">0</span>
<span id="affichage_qe_cadre7" style="display:inline">(<span id="affichage_qe7">4</span>)</span>
<span id="comm501">old note</span><a id="lien_comm501" href="#">edit</a>
<span id="comm9">it&#039;s caf&eacute;</span>
<span id="comm10">Note <i>rare</i> variety</span>
"##;

fn controller(
    transport: ScriptedTransport,
    prompter: ScriptedPrompter,
) -> Controller<ScriptedTransport, ScriptedPrompter> {
    Controller::new(
        Page::from_markup(PAGE),
        transport,
        prompter,
        Arc::new(SiteConfig::default()),
    )
}

fn text_of(page: &Page, id: &str) -> String {
    page.by_id(id).map(|n| page.text_content(n)).unwrap_or_default()
}

fn checked(page: &Page, class: &str) -> Vec<bool> {
    page.with_class(class)
        .into_iter()
        .filter_map(|n| page.get(n).map(|n| n.checked))
        .collect()
}

fn modal_buttons(page: &Page) -> Vec<NodeId> {
    page.with_class("modal")
        .into_iter()
        .flat_map(|m| page.descendants(m))
        .filter(|n| page.get(*n).is_some_and(|n| n.has_class("button")))
        .collect()
}

fn submit_disabled(page: &Page) -> bool {
    page.with_class("collec_form_submit")
        .into_iter()
        .flat_map(|area| page.descendants(area))
        .filter_map(|n| page.get(n))
        .filter(|n| n.tag == "input")
        .all(|n| n.disabled)
}

fn param<'a>(params: &'a Params, key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn coin_request() -> ModalRequest {
    ModalRequest::new(CollectibleType::Coin, 95)
}

#[tokio::test]
async fn login_reply_on_save_changes_nothing() {
    let mut c = controller(ScriptedTransport::replying(&["LOGIN_REQUIRED"]), ScriptedPrompter::default());
    c.open_modal(coin_request().with_version(Some(31))).unwrap();

    let outcome = c.save_collection(false).await.unwrap();

    assert_eq!(outcome, HandlerOutcome::SessionExpired);
    assert_eq!(c.prompter().alerts, vec![DISCONNECTED_MESSAGE.to_string()]);
    assert_eq!(text_of(c.page(), "collec_line31"), "1");
    assert_eq!(text_of(c.page(), "affichage_qt95"), "1");
    assert!(c.modal().is_some());
    assert!(modal_buttons(c.page())
        .iter()
        .all(|b| !c.page().get(*b).unwrap().disabled));
}

#[tokio::test]
async fn err_reply_on_save_reenables_buttons() {
    let mut c = controller(ScriptedTransport::replying(&["ERR_QUANTITY"]), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();
    assert_eq!(modal_buttons(c.page()).len(), 2);

    let outcome = c.save_collection(false).await.unwrap();

    assert_eq!(outcome, HandlerOutcome::Failed);
    assert_eq!(c.prompter().alerts, vec![GENERIC_ERROR_MESSAGE.to_string()]);
    assert!(modal_buttons(c.page())
        .iter()
        .all(|b| !c.page().get(*b).unwrap().disabled));
    assert_eq!(text_of(c.page(), "collec_line0_95"), "Edit");
}

#[tokio::test]
async fn transport_failure_on_save_reads_as_generic_error() {
    let transport = ScriptedTransport::default();
    transport.push(Err(TransportError::Status {
        endpoint: Endpoint::SaveItem.path(),
        status: 502,
    }));
    let mut c = controller(transport, ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();

    assert_eq!(c.save_collection(false).await.unwrap(), HandlerOutcome::Failed);
    assert_eq!(c.prompter().alerts, vec![GENERIC_ERROR_MESSAGE.to_string()]);
    assert!(c.modal().is_some());
}

#[tokio::test]
async fn save_with_version_repaints_row_and_counts() {
    let row = r#"<td><span class="collec_q col95">3</span><span class="collec_q swa95">2</span></td>"#;
    let mut c = controller(ScriptedTransport::replying(&[row]), ScriptedPrompter::default());
    c.open_modal(
        coin_request()
            .with_version(Some(31))
            .with_quantity(5)
            .with_grade(Some(Grade::Xf)),
    )
    .unwrap();

    let outcome = c.save_collection(false).await.unwrap();

    assert_eq!(outcome, HandlerOutcome::Applied);
    assert_eq!(text_of(c.page(), "affichage_qc95"), "3");
    assert_eq!(text_of(c.page(), "affichage_qe95"), "2");
    assert_eq!(text_of(c.page(), "affichage_qt95"), "5");
    assert_eq!(
        c.page().node_by_id("affichage_qe_cadre95").unwrap().display.as_deref(),
        Some("inline")
    );
    assert!(c.page().with_class("modal").is_empty());
    assert!(c.key_bindings().is_empty());

    let sent = c.client().transport().sent();
    assert_eq!(sent.len(), 1);
    let (endpoint, params) = &sent[0];
    assert_eq!(*endpoint, Endpoint::SaveItem);
    assert_eq!(param(params, "coinId"), vec!["95"]);
    assert_eq!(param(params, "version"), vec!["31"]);
    assert_eq!(param(params, "quantity"), vec!["5"]);
    assert_eq!(param(params, "grade"), vec!["sup"]);
    assert_eq!(param(params, "forSwap"), vec!["0"]);
    assert_eq!(param(params, "section"), vec!["43707"]);
}

#[tokio::test]
async fn save_without_version_reveals_undetermined_row() {
    let row = r#"<td><span class="collec_q col95">1</span></td>"#;
    let mut c = controller(ScriptedTransport::replying(&[row]), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();

    c.save_collection(false).await.unwrap();

    let sent = c.client().transport().sent();
    assert!(param(&sent[0].1, "grade").is_empty());
    assert_eq!(param(&sent[0].1, "version"), vec![""]);
    let line = c.page().by_id("collec_line0_95").unwrap();
    assert!(!c.page().get(line).unwrap().is_hidden());
    assert!(c.page().with_class("undetermined_filler95").is_empty());
    assert_eq!(text_of(c.page(), "affichage_qc95"), "2");
    assert!(c.page().node_by_id("affichage_qe_cadre95").unwrap().is_hidden());
}

#[tokio::test]
async fn undetermined_row_buttons_become_focusable() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.show_undetermined_line(95);
    let line = c.page().by_id("collec_line0_95").unwrap();
    let button = c
        .page()
        .descendants(line)
        .into_iter()
        .find(|n| c.page().get(*n).unwrap().tag == "button")
        .unwrap();
    assert_eq!(c.page().get(button).unwrap().tabindex.as_deref(), Some("0"));
}

#[tokio::test]
async fn save_and_add_again_reopens_fresh_creation_form() {
    let row = r#"<td><span class="collec_q col95">2</span></td>"#;
    let mut c = controller(ScriptedTransport::replying(&[row]), ScriptedPrompter::default());
    c.open_modal(
        coin_request()
            .with_version(Some(31))
            .with_quantity(2)
            .with_comment("first"),
    )
    .unwrap();

    assert_eq!(c.save_collection(true).await.unwrap(), HandlerOutcome::Applied);

    assert_eq!(text_of(c.page(), "affichage_qt95"), "2");
    let modal = c.modal().expect("form reopened");
    assert!(modal.form.is_create());
    assert_eq!(modal.form.coin_id, 95);
    assert_eq!(modal.form.version, Some(31));
    assert_eq!(modal.form.quantity, 1);
    assert!(modal.form.comment.is_empty());
    assert_eq!(c.page().with_class("modal").len(), 1);
    assert_eq!(c.key_bindings().len(), 1);
}

#[tokio::test]
async fn add_again_after_edit_just_closes() {
    let mut c = controller(ScriptedTransport::replying(&["<td></td>"]), ScriptedPrompter::default());
    c.open_modal(coin_request().with_version(Some(31)).with_item(8)).unwrap();

    c.save_collection(true).await.unwrap();

    assert!(c.modal().is_none());
    assert!(c.page().with_class("modal").is_empty());
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let prompter = ScriptedPrompter {
        confirm_answer: false,
        ..Default::default()
    };
    let mut c = controller(ScriptedTransport::default(), prompter);

    let outcome = c.delete_collection_item(8, Some(31), 95).await;

    assert_eq!(outcome, HandlerOutcome::Cancelled);
    assert_eq!(c.prompter().confirms, vec![DELETE_CONFIRMATION.to_string()]);
    assert!(c.client().transport().sent().is_empty());
    assert_eq!(text_of(c.page(), "collec_line31"), "1");
}

#[tokio::test]
async fn confirmed_delete_repaints_row() {
    let prompter = ScriptedPrompter {
        confirm_answer: true,
        ..Default::default()
    };
    let mut c = controller(ScriptedTransport::replying(&["<td></td>"]), prompter);

    let outcome = c.delete_collection_item(8, Some(31), 95).await;

    assert_eq!(outcome, HandlerOutcome::Applied);
    assert_eq!(text_of(c.page(), "affichage_qc95"), "0");
    assert_eq!(text_of(c.page(), "affichage_qt95"), "0");
    let sent = c.client().transport().sent();
    assert_eq!(sent[0].0, Endpoint::RemoveItem);
    assert_eq!(param(&sent[0].1, "item"), vec!["8"]);
    assert_eq!(param(&sent[0].1, "version"), vec!["31"]);
    assert_eq!(param(&sent[0].1, "collectible"), vec!["95"]);
}

#[tokio::test]
async fn login_reply_on_delete_keeps_row() {
    let prompter = ScriptedPrompter {
        confirm_answer: true,
        ..Default::default()
    };
    let mut c = controller(ScriptedTransport::replying(&["LOGIN"]), prompter);

    assert_eq!(
        c.delete_collection_item(8, None, 95).await,
        HandlerOutcome::SessionExpired
    );
    assert_eq!(text_of(c.page(), "collec_line31"), "1");
    assert_eq!(c.prompter().alerts, vec![DISCONNECTED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn want_clears_dont_want() {
    let mut c = controller(ScriptedTransport::replying(&["OK"]), ScriptedPrompter::default());

    assert_eq!(c.veux("95", true).await, HandlerOutcome::Applied);

    assert_eq!(checked(c.page(), "check_veux95"), vec![true]);
    assert_eq!(checked(c.page(), "check_veux_pas95"), vec![false]);
    assert!(c
        .page()
        .with_class("check_veux95")
        .iter()
        .all(|n| !c.page().get(*n).unwrap().disabled));
    let sent = c.client().transport().sent();
    assert_eq!(sent[0].0, Endpoint::ModifyWishes);
    assert_eq!(param(&sent[0].1, "type"), vec!["95"]);
    assert_eq!(param(&sent[0].1, "veux"), vec!["true"]);
    assert_eq!(param(&sent[0].1, "veux_pas"), vec!["false"]);
}

#[tokio::test]
async fn dont_want_clears_want() {
    let mut c = controller(ScriptedTransport::replying(&["OK", "OK"]), ScriptedPrompter::default());
    c.veux("95", true).await;

    assert_eq!(c.veux_pas("95", true).await, HandlerOutcome::Applied);

    assert_eq!(checked(c.page(), "check_veux95"), vec![false]);
    assert_eq!(checked(c.page(), "check_veux_pas95"), vec![true]);
}

#[tokio::test]
async fn failed_toggle_restores_previous_state() {
    let mut c = controller(ScriptedTransport::replying(&["NOPE"]), ScriptedPrompter::default());

    assert_eq!(c.veux("95", true).await, HandlerOutcome::Failed);

    assert_eq!(checked(c.page(), "check_veux95"), vec![false]);
    assert_eq!(checked(c.page(), "check_veux_pas95"), vec![true]);
    assert_eq!(c.prompter().alerts, vec![GENERIC_ERROR_MESSAGE.to_string()]);
    assert!(c
        .page()
        .with_class("check_veux_pas95")
        .iter()
        .all(|n| !c.page().get(*n).unwrap().disabled));
}

#[tokio::test]
async fn expired_session_on_toggle_restores_state() {
    let mut c = controller(ScriptedTransport::replying(&["LOGIN"]), ScriptedPrompter::default());

    assert_eq!(c.veux_pas("95", false).await, HandlerOutcome::SessionExpired);

    assert_eq!(checked(c.page(), "check_veux_pas95"), vec![true]);
    assert_eq!(c.prompter().alerts, vec![DISCONNECTED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn legacy_quantity_saves_and_recounts() {
    let mut c = controller(ScriptedTransport::replying(&["OK"]), ScriptedPrompter::default());

    let outcome = c.modifier(501, "qc", Some("7")).await.unwrap();

    assert_eq!(outcome, HandlerOutcome::Applied);
    let field = c.page().node_by_id("qc501").unwrap();
    assert_eq!(field.background.as_deref(), Some("#FFFFFF"));
    assert_eq!(text_of(c.page(), "affichage_qc7"), "5");
    assert_eq!(text_of(c.page(), "affichage_qe7"), "0");
    assert!(c.page().node_by_id("affichage_qe_cadre7").unwrap().is_hidden());
    let sent = c.client().transport().sent();
    assert_eq!(sent[0].0, Endpoint::SaveQuantity);
    assert_eq!(param(&sent[0].1, "piece"), vec!["501"]);
    assert_eq!(param(&sent[0].1, "etat"), vec!["qc"]);
    assert_eq!(param(&sent[0].1, "quantite"), vec!["2"]);
}

#[tokio::test]
async fn legacy_quantity_failure_keeps_pending_color() {
    let mut c = controller(ScriptedTransport::replying(&["ERR"]), ScriptedPrompter::default());

    assert_eq!(c.modifier(501, "qc", Some("7")).await.unwrap(), HandlerOutcome::Failed);

    let field = c.page().node_by_id("qc501").unwrap();
    assert_eq!(field.background.as_deref(), Some("#FF99CC"));
    assert_eq!(text_of(c.page(), "affichage_qc7"), "0");
    assert_eq!(c.prompter().alerts, vec![GENERIC_ERROR_MESSAGE.to_string()]);
}

#[tokio::test]
async fn legacy_quantity_needs_its_field() {
    let mut c = controller(ScriptedTransport::replying(&["OK"]), ScriptedPrompter::default());

    let err = c.modifier(999, "qc", None).await.unwrap_err();

    assert!(matches!(err, ControllerError::MissingElement { .. }));
    assert!(c.client().transport().sent().is_empty());
}

#[tokio::test]
async fn comment_is_saved_and_seeds_next_edit() {
    let new_comment = r#"variety "B" <rare>"#;
    let prompter = ScriptedPrompter {
        answers: VecDeque::from([Some(new_comment.to_string()), None]),
        ..Default::default()
    };
    let mut c = controller(ScriptedTransport::replying(&["OK"]), prompter);

    assert_eq!(c.comm_perso(501).await, HandlerOutcome::Applied);
    assert_eq!(text_of(c.page(), "comm501"), new_comment);

    assert_eq!(c.comm_perso(501).await, HandlerOutcome::Cancelled);
    let prompts = &c.prompter().prompts;
    assert_eq!(prompts[0], (COMMENT_PROMPT.to_string(), "old note".to_string()));
    assert_eq!(prompts[1].1, new_comment);
    assert_eq!(c.client().transport().sent().len(), 1);
}

#[test]
fn previous_comment_is_decoded_document_text() {
    let c = controller(ScriptedTransport::default(), ScriptedPrompter::default());

    assert_eq!(c.previous_comment(9), "it's caf\u{e9}");
    assert_eq!(c.previous_comment(10), "Note rare variety");
}

#[tokio::test]
async fn comment_for_piece_without_items_is_ignored() {
    let prompter = ScriptedPrompter {
        answers: VecDeque::from([Some("new".to_string())]),
        ..Default::default()
    };
    let mut c = controller(ScriptedTransport::replying(&["NO_ITEMS"]), prompter);

    assert_eq!(c.comm_perso(501).await, HandlerOutcome::Ignored);
    assert_eq!(text_of(c.page(), "comm501"), "old note");
    assert!(c.prompter().alerts.is_empty());
}

#[tokio::test]
async fn cancelled_comment_prompt_sends_nothing() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());

    assert_eq!(c.comm_perso(501).await, HandlerOutcome::Cancelled);
    assert!(c.client().transport().sent().is_empty());
}

#[test]
fn escape_listener_does_not_pile_up() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();
    c.open_modal(coin_request().with_version(Some(31))).unwrap();
    assert_eq!(c.key_bindings().len(), 1);
    assert_eq!(c.page().with_class("modal").len(), 1);

    c.key_up(Key::Enter);
    assert!(c.modal().is_some());

    c.key_up(Key::Escape);
    assert!(c.modal().is_none());
    assert!(c.key_bindings().is_empty());
    assert!(c.page().with_class("modal").is_empty());

    c.key_up(Key::Escape);
    assert!(!c.close_modal());
}

#[test]
fn creation_form_defaults() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();
    let page = c.page();

    assert_eq!(page.node_by_id("collec_form_quantity").unwrap().value, "1");
    assert!(page.node_by_id("collec_form_swap_no").unwrap().checked);
    assert!(!page.node_by_id("collec_form_swap_yes").unwrap().checked);
    for grade in Grade::ALL {
        let id = format!("collec_form_grade_{}", grade.code());
        assert!(!page.node_by_id(&id).unwrap().checked);
    }
    let section = page.by_id("collec_form_section").unwrap();
    let selected: Vec<String> = page
        .descendants(section)
        .into_iter()
        .filter_map(|n| page.get(n))
        .filter(|n| n.selected)
        .map(|n| n.value.clone())
        .collect();
    assert_eq!(selected, vec!["43707".to_string()]);
    assert_eq!(page.node_by_id("collec_form_item").unwrap().value, "");
    assert_eq!(text_of(page, "modal_title"), "Add to my collection");
}

#[test]
fn edit_form_prefills_and_escapes() {
    let comment = r#"He said "hi" <b>twice</b>"#;
    let req = coin_request()
        .with_version(Some(31))
        .with_item(8)
        .with_quantity(3)
        .with_grade(Some(Grade::Au))
        .with_swap(true)
        .with_value(12.5)
        .with_comment(comment)
        .with_swap_comment("a > b")
        .with_section(43705);

    let site = SiteConfig::default();
    let (form, pictures) = Modal::preview(req.clone(), &site);
    let markup = render_modal(&form, &pictures, &site).into_string();
    assert!(markup.contains("He said &quot;hi&quot; &lt;b&gt;twice&lt;/b&gt;"));
    assert!(!markup.contains("<b>twice"));

    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.open_modal(req).unwrap();
    let page = c.page();
    assert_eq!(page.node_by_id("collec_form_comment").unwrap().value, comment);
    assert_eq!(page.node_by_id("collec_form_swap_comment").unwrap().value, "a > b");
    assert_eq!(page.node_by_id("collec_form_quantity").unwrap().value, "3");
    assert_eq!(page.node_by_id("collec_form_value").unwrap().value, "12.5");
    assert_eq!(page.node_by_id("collec_form_item").unwrap().value, "8");
    assert!(page.node_by_id("collec_form_grade_spl").unwrap().checked);
    assert!(page.node_by_id("collec_form_swap_yes").unwrap().checked);
    assert_eq!(text_of(page, "modal_title"), "Edit items in my collection");
    let submit_buttons = modal_buttons(page);
    assert_eq!(submit_buttons.len(), 1);
}

#[test]
fn clicking_checked_grade_clears_radio_group() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.open_modal(coin_request().with_grade(Some(Grade::Vf))).unwrap();
    assert!(c.page().node_by_id("collec_form_grade_ttb").unwrap().checked);

    assert_eq!(c.click_grade(Grade::Vf).unwrap(), None);
    assert!(!c.page().node_by_id("collec_form_grade_ttb").unwrap().checked);
    assert_eq!(c.modal().unwrap().form.grade, None);

    assert_eq!(c.click_grade(Grade::F).unwrap(), Some(Grade::F));
    assert!(c.page().node_by_id("collec_form_grade_tb").unwrap().checked);
    assert_eq!(c.modal().unwrap().grade(), Some(Grade::F));
}

#[test]
fn grade_click_without_form_is_an_error() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    assert!(matches!(c.click_grade(Grade::F), Err(ControllerError::NoModal)));
}

#[tokio::test]
async fn uploads_block_submit_until_queue_drains() {
    let mut c = controller(
        ScriptedTransport::replying(&["OKa-1.jpg", "File too large"]),
        ScriptedPrompter::default(),
    );
    c.open_modal(coin_request()).unwrap();
    assert!(!submit_disabled(c.page()));

    c.queue_upload("a.jpg").unwrap();
    c.queue_upload("b.png").unwrap();
    assert!(submit_disabled(c.page()));

    assert_eq!(c.send_upload("a.jpg", vec![1]).await.unwrap(), HandlerOutcome::Applied);
    assert!(submit_disabled(c.page()));

    assert_eq!(c.send_upload("b.png", vec![2]).await.unwrap(), HandlerOutcome::Failed);
    assert!(!submit_disabled(c.page()));
    assert_eq!(c.prompter().alerts, vec!["File too large".to_string()]);

    let modal = c.modal().unwrap();
    assert_eq!(modal.pictures.accepted_files(), vec!["a-1.jpg".to_string()]);
    assert_eq!(modal.pictures.selected(), vec!["a-1.jpg".to_string()]);

    let select = c.page().by_id("collec_form_pictures").unwrap();
    let options: Vec<(String, bool)> = c
        .page()
        .descendants(select)
        .into_iter()
        .filter_map(|n| c.page().get(n))
        .filter(|n| n.tag == "option")
        .map(|n| (n.value.clone(), n.selected))
        .collect();
    assert_eq!(options, vec![("a-1.jpg".to_string(), true)]);
}

#[tokio::test]
async fn removing_uploaded_picture_deselects_it() {
    let mut c = controller(ScriptedTransport::replying(&["OKscan-2.pdf"]), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();

    c.upload_picture("scan.pdf", vec![0]).await.unwrap();
    let file = &c.modal().unwrap().pictures.files()[0];
    assert_eq!(
        file.thumbnail.as_deref(),
        Some("https://en.numista.com/vous/pictures/237078/scan-2-360.png")
    );

    let removed = c.remove_picture(0).unwrap();
    assert_eq!(removed.server_name.as_deref(), Some("scan-2.pdf"));
    assert!(c.modal().unwrap().pictures.selected().is_empty());
    let select = c.page().by_id("collec_form_pictures").unwrap();
    assert!(c
        .page()
        .descendants(select)
        .into_iter()
        .all(|n| !c.page().get(n).unwrap().selected));
    assert!(matches!(
        c.remove_picture(0),
        Err(ControllerError::UnknownPicture { index: 0 })
    ));
}

#[tokio::test]
async fn login_reply_to_an_upload_is_shown_as_is() {
    let mut c = controller(ScriptedTransport::replying(&["LOGIN"]), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();

    let outcome = c.upload_picture("a.jpg", vec![1]).await.unwrap();

    assert_eq!(outcome, HandlerOutcome::Failed);
    assert_eq!(c.prompter().alerts, vec!["LOGIN".to_string()]);
    assert!(c.modal().unwrap().pictures.accepted_files().is_empty());
    assert!(!submit_disabled(c.page()));
}

#[tokio::test]
async fn unsupported_file_type_never_reaches_the_server() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.open_modal(coin_request()).unwrap();

    let outcome = c.upload_picture("notes.docx", vec![0]).await.unwrap();

    assert_eq!(outcome, HandlerOutcome::Failed);
    assert_eq!(c.prompter().alerts, vec![INVALID_TYPE_MESSAGE.to_string()]);
    assert!(c.client().transport().sent().is_empty());
    assert!(c.modal().unwrap().pictures.files().is_empty());
    assert!(!submit_disabled(c.page()));
}

#[test]
fn existing_pictures_are_preselected() {
    let mut c = controller(ScriptedTransport::default(), ScriptedPrompter::default());
    c.open_modal(coin_request().with_item(8).with_pictures(vec!["obv.jpg".to_string()]))
        .unwrap();
    let modal = c.modal().unwrap();
    assert_eq!(modal.pictures.selected(), vec!["obv.jpg".to_string()]);
    assert_eq!(
        modal.pictures.files()[0].thumbnail.as_deref(),
        Some("/vous/pictures/237078/obv-360.jpg")
    );
}

#[test]
fn total_is_owned_plus_swap_for_any_badges() {
    let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
        (vec![], vec![]),
        (vec!["2"], vec![]),
        (vec![], vec!["4", "1"]),
        (vec!["1", "1", "3"], vec!["2"]),
    ];
    for (owned, swap) in &cases {
        let mut markup = String::from(
            r#"<span id="affichage_qt5"></span><span id="affichage_qe_cadre5"></span><span id="affichage_qe5"></span>"#,
        );
        for o in owned {
            markup.push_str(&format!(r#"<b class="collec_q col5">{o}</b>"#));
        }
        for s in swap {
            markup.push_str(&format!(r#"<b class="collec_q swa5">{s}</b>"#));
        }
        let mut page = Page::from_markup(&markup);
        let count = counts::refresh_collection_count(&mut page, 5);
        let owned_sum: i64 = owned.iter().map(|v| v.parse::<i64>().unwrap()).sum();
        let swap_sum: i64 = swap.iter().map(|v| v.parse::<i64>().unwrap()).sum();
        assert_eq!(text_of(&page, "affichage_qt5"), (owned_sum + swap_sum).to_string());
        assert_eq!(count.total(), owned_sum + swap_sum);
        assert_eq!(
            page.node_by_id("affichage_qe_cadre5").unwrap().is_hidden(),
            swap_sum == 0
        );
    }
}
