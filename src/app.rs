use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use maud::html;
use tracing_subscriber::EnvFilter;

use crate::api::types::{ItemFields, ItemFilter, Price};
use crate::api::{ApiClient, ApiError};
use crate::cli::args::{ApiAction, ApiItemArgs, CliArgs, Command, ItemArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile, SiteConfig};
use crate::controller::{Controller, HandlerOutcome, PREVIOUS_COMMENT_ATTR};
use crate::counts;
use crate::modal::form::{CollectibleType, Grade, ModalRequest};
use crate::modal::render::render_modal;
use crate::modal::Modal;
use crate::output::{self, OutcomeRecord, OutputFormat};
use crate::page::Page;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::transport::{HttpTransport, Transport, TransportOptions, DEFAULT_API_BASE, DEFAULT_ORIGIN};

pub(crate) fn status_line(tag: &str, message: &str) {
    let colored_tag = match tag {
        "ERR" => tag.bold().red(),
        "WRN" => tag.bold().yellow(),
        _ => tag.bold().green(),
    };
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        colored_tag,
        "]".bold().white(),
        message
    );
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("numicollec={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Answers the comment prompt with a text given on the command line and
/// falls back to the terminal for everything else.
struct CliPrompter {
    terminal: TerminalPrompter,
    answer: Option<String>,
}

impl Prompter for CliPrompter {
    fn alert(&mut self, message: &str) {
        self.terminal.alert(message);
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.terminal.confirm(message)
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        match self.answer.take() {
            Some(answer) => Some(answer),
            None => self.terminal.prompt(message, default),
        }
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    command: Command,
    transport: TransportOptions,
    site: SiteConfig,
    page_path: Option<PathBuf>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
    config_path: Option<PathBuf>,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let base_url = args
        .base_url
        .or(cfg.base_url.clone())
        .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let proxy = args
        .proxy
        .or(cfg.proxy.clone())
        .filter(|p| !p.trim().is_empty());
    let session_cookie = args
        .session
        .or(cfg.session_cookie.clone())
        .filter(|c| !c.trim().is_empty());
    let api_key = args
        .api_key
        .or(cfg.api_key.clone())
        .filter(|k| !k.trim().is_empty());
    if matches!(args.command, Command::Api(_)) && api_key.is_none() {
        return Err("the api commands need an API key (--api-key or api_key in config)".to_string());
    }
    let api_base_url = args
        .api_base_url
        .or(cfg.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let output_format_raw = args
        .output_format
        .or(cfg.output_format.clone())
        .unwrap_or_else(|| "text".to_string());
    let output_format = OutputFormat::parse(&output_format_raw)
        .ok_or_else(|| format!("invalid output format '{output_format_raw}', expected text or json"))?;

    let site = SiteConfig::from_config(&cfg, &base_url)?;
    let config_path = args
        .config
        .as_deref()
        .map(config::expand_tilde)
        .or_else(config::default_config_path);

    Ok(RunConfig {
        command: args.command,
        transport: TransportOptions {
            base_url,
            session_cookie,
            timeout_seconds: timeout,
            proxy,
            api_base_url,
            api_key,
        },
        site,
        page_path: args.page,
        output_format,
        no_color,
        verbose: args.verbose,
        config_path,
    })
}

fn item_request(item: &ItemArgs) -> Result<ModalRequest, String> {
    let collectible_type = CollectibleType::parse(&item.collectible_type)
        .ok_or_else(|| format!("invalid collectible type '{}'", item.collectible_type))?;
    let grade = match item.grade.as_deref() {
        Some(raw) => Some(Grade::parse(raw).ok_or_else(|| format!("invalid grade '{raw}'"))?),
        None => None,
    };
    let mut req = ModalRequest::new(collectible_type, item.coin)
        .with_version(item.version)
        .with_grade(grade);
    if let Some(id) = item.item {
        req = req.with_item(id);
    }
    if let Some(quantity) = item.quantity {
        req = req.with_quantity(quantity);
    }
    if let Some(raw) = item.value.as_deref() {
        req = req.with_value(crate::utils::parse_amount(raw)?);
    }
    if let Some(comment) = item.comment.as_deref() {
        req = req.with_comment(comment);
    }
    if let Some(swap) = item.swap {
        req = req.with_swap(swap);
    }
    if let Some(comment) = item.swap_comment.as_deref() {
        req = req.with_swap_comment(comment);
    }
    if let Some(section) = item.section {
        req = req.with_section(section);
    }
    if let Some(raw) = item.pictures.as_deref() {
        req = req.with_pictures(crate::utils::parse_filenames_csv(raw));
    }
    Ok(req)
}

async fn load_page(path: Option<&Path>) -> Result<Page, String> {
    match path {
        Some(path) => {
            let markup = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("failed to read page '{}': {e}", path.display()))?;
            Ok(Page::from_markup(&markup))
        }
        None => Ok(Page::new()),
    }
}

/// Makes sure the legacy field `#<status><piece>` exists and holds `quantity`.
fn seed_quantity_field(page: &mut Page, piece: u32, status: &str, quantity: &str) {
    let id = format!("{status}{piece}");
    match page.node_by_id_mut(&id) {
        Some(field) => field.value = quantity.to_string(),
        None => {
            let body = page.body();
            let markup = html! { input type="text" id=(id) value=(quantity); };
            page.append_markup(body, &markup.into_string());
        }
    }
}

fn seed_comment(page: &mut Page, piece: u32, previous: Option<&str>) {
    let link_id = format!("lien_comm{piece}");
    if page.by_id(&link_id).is_none() {
        let body = page.body();
        let markup = html! {
            span id=(format!("comm{piece}")) { (previous.unwrap_or_default()) }
            a id=(link_id) href="#" { "Edit" }
        };
        page.append_markup(body, &markup.into_string());
        return;
    }
    if let (Some(previous), Some(link)) = (previous, page.node_by_id_mut(&link_id)) {
        link.attrs
            .insert(PREVIOUS_COMMENT_ATTR.to_string(), previous.to_string());
    }
}

fn record_for(
    command: &str,
    target: String,
    outcome: HandlerOutcome,
    page: &Page,
    coin: Option<u32>,
    counted: bool,
) -> OutcomeRecord {
    let record = OutcomeRecord::new(command, target, outcome.label());
    match coin {
        Some(coin) if counted && outcome == HandlerOutcome::Applied => {
            record.with_count(counts::tally(page, coin))
        }
        _ => record,
    }
}

fn item_fields(args: &ApiItemArgs) -> Result<ItemFields, String> {
    let grade = match args.grade.as_deref() {
        Some(raw) => Some(Grade::parse(raw).ok_or_else(|| format!("invalid grade '{raw}'"))?),
        None => None,
    };
    let price = match args.price.as_deref() {
        Some(raw) => Some(Price::new(
            crate::utils::parse_amount(raw)?,
            args.currency.as_deref(),
        )),
        None => None,
    };
    Ok(ItemFields {
        type_id: args.type_id,
        issue: args.issue,
        quantity: args.quantity,
        grade,
        for_swap: args.swap,
        private_comment: args.comment.clone(),
        public_comment: args.public_comment.clone(),
        price,
        collection: args.collection,
    })
}

fn api_target(user: Option<u64>, item: Option<u64>) -> String {
    let user = user.map_or_else(|| "self".to_string(), |u| format!("user {u}"));
    match item {
        Some(item) => format!("{user} item {item}"),
        None => user,
    }
}

fn api_record<R: serde::Serialize>(
    command: &str,
    target: String,
    result: Result<R, ApiError>,
) -> OutcomeRecord {
    match result {
        Ok(data) => OutcomeRecord::new(command, target, HandlerOutcome::Applied.label()).with_data(&data),
        Err(e) => OutcomeRecord::new(command, target, HandlerOutcome::Failed.label())
            .with_detail(e.to_string()),
    }
}

/// Runs one `api` subcommand and reports it as a single record. API
/// failures become a `failed` record rather than an error.
pub(crate) async fn run_api_action<T: Transport, P: Prompter>(
    client: &mut ApiClient<T>,
    user: Option<u64>,
    action: &ApiAction,
    prompter: &mut P,
) -> Result<OutcomeRecord, String> {
    let record = match action {
        ApiAction::Token => {
            let result = client.authorize_self().await;
            api_record("api token", api_target(None, None), result)
        }
        ApiAction::Collections { collectible_type } => {
            let category = collectible_type.as_deref().and_then(CollectibleType::parse);
            let result = client.user_collections(user, category).await;
            api_record("api collections", api_target(user, None), result)
        }
        ApiAction::Items {
            collectible_type,
            type_id,
            collection,
        } => {
            let filter = ItemFilter {
                category: collectible_type.as_deref().and_then(CollectibleType::parse),
                type_id: *type_id,
                collection: *collection,
            };
            let result = client.collected_items(user, &filter).await;
            api_record("api items", api_target(user, None), result)
        }
        ApiAction::Item { id } => {
            let result = client.collected_item(user, *id).await;
            api_record("api item", api_target(user, Some(*id)), result)
        }
        ApiAction::Add(fields) => {
            let fields = item_fields(fields)?;
            let result = client.add_collected_item(user, &fields).await;
            api_record("api add", api_target(user, None), result)
        }
        ApiAction::Edit { id, fields } => {
            let fields = item_fields(fields)?;
            let result = client.edit_collected_item(user, *id, &fields).await;
            api_record("api edit", api_target(user, Some(*id)), result)
        }
        ApiAction::Delete { id, .. } => {
            let target = api_target(user, Some(*id));
            if !prompter.confirm(&format!("Delete collected item {id}?")) {
                OutcomeRecord::new("api delete", target, HandlerOutcome::Cancelled.label())
            } else {
                let result = client.delete_collected_item(user, *id).await;
                api_record("api delete", target, result)
            }
        }
    };
    Ok(record)
}

fn write_records(format: OutputFormat, records: &[OutcomeRecord]) -> Result<(), String> {
    let rendered = output::render(format, records);
    std::io::stdout()
        .write_all(&rendered)
        .map_err(|e| format!("failed to write output: {e}"))?;

    let failed = records
        .iter()
        .filter(|r| r.outcome == "failed" || r.outcome == "session_expired")
        .count();
    if failed > 0 {
        return Err(format!("{failed} request(s) did not go through"));
    }
    Ok(())
}

fn upload_progress(len: u64) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new(len.max(1));
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(200));
    pb.set_style(
        ProgressStyle::with_template(
            ":: Upload: [{pos}/{len}] :: Duration: [{elapsed_precise}] :: {msg}",
        )
        .map_err(|e| format!("failed to build progress bar style: {e}"))?
        .progress_chars(r#"#>-"#),
    );
    Ok(pb)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let site = Arc::new(run.site);

    if let Command::Form(item) = &run.command {
        let (form, pictures) = Modal::preview(item_request(item)?, &site);
        println!("{}", render_modal(&form, &pictures, &site).into_string());
        return Ok(());
    }

    let transport = HttpTransport::new(&run.transport).map_err(|e| e.to_string())?;

    if let Command::Api(api) = &run.command {
        let assume_yes = matches!(api.action, ApiAction::Delete { yes: true, .. });
        let mut prompter = TerminalPrompter::new(assume_yes);
        let mut client = ApiClient::new(transport);
        let record = run_api_action(&mut client, api.user, &api.action, &mut prompter).await?;
        return write_records(run.output_format, &[record]);
    }

    let counted = run.page_path.is_some();
    let mut page = load_page(run.page_path.as_deref()).await?;

    let (assume_yes, answer) = match &run.command {
        Command::Remove { yes, .. } => (*yes, None),
        Command::Comment { text, .. } => (false, text.clone()),
        _ => (false, None),
    };
    match &run.command {
        Command::Quantity {
            piece,
            status,
            quantity,
            ..
        } => seed_quantity_field(&mut page, *piece, status, quantity),
        Command::Comment {
            piece, previous, ..
        } => seed_comment(&mut page, *piece, previous.as_deref()),
        _ => {}
    }

    let prompter = CliPrompter {
        terminal: TerminalPrompter::new(assume_yes),
        answer,
    };
    let mut controller = Controller::new(page, transport, prompter, site);
    let mut records = Vec::new();

    match run.command {
        Command::Save(item) => {
            let coin = item.coin;
            controller
                .open_modal(item_request(&item)?)
                .map_err(|e| e.to_string())?;
            let outcome = controller
                .save_collection(item.add_again)
                .await
                .map_err(|e| e.to_string())?;
            let mut record = record_for(
                "save",
                format!("coin {coin}"),
                outcome,
                controller.page(),
                Some(coin),
                counted,
            );
            if controller.modal().is_some() {
                record = record.with_detail("form reopened");
            }
            records.push(record);
        }
        Command::Remove {
            item,
            version,
            coin,
            ..
        } => {
            let outcome = controller.delete_collection_item(item, version, coin).await;
            records.push(record_for(
                "remove",
                format!("item {item}"),
                outcome,
                controller.page(),
                Some(coin),
                counted,
            ));
        }
        Command::Want { type_tag, off } => {
            let outcome = controller.veux(&type_tag, !off).await;
            records.push(OutcomeRecord::new("want", format!("type {type_tag}"), outcome.label()));
        }
        Command::DontWant { type_tag, off } => {
            let outcome = controller.veux_pas(&type_tag, !off).await;
            records.push(OutcomeRecord::new(
                "dont-want",
                format!("type {type_tag}"),
                outcome.label(),
            ));
        }
        Command::Quantity {
            piece,
            status,
            type_piece,
            ..
        } => {
            let outcome = controller
                .modifier(piece, &status, type_piece.as_deref())
                .await
                .map_err(|e| e.to_string())?;
            let mut record =
                OutcomeRecord::new("quantity", format!("piece {piece}"), outcome.label());
            if let (Some(type_tag), HandlerOutcome::Applied) = (type_piece.as_deref(), outcome) {
                record = record.with_count(counts::legacy_tally(controller.page(), type_tag));
            }
            records.push(record);
        }
        Command::Comment { piece, .. } => {
            let outcome = controller.comm_perso(piece).await;
            let mut record =
                OutcomeRecord::new("comment", format!("piece {piece}"), outcome.label());
            if outcome == HandlerOutcome::Applied {
                record = record.with_detail(controller.previous_comment(piece));
            }
            records.push(record);
        }
        Command::Upload {
            coin,
            collectible_type,
            files,
        } => {
            let collectible_type = CollectibleType::parse(&collectible_type)
                .ok_or_else(|| format!("invalid collectible type '{collectible_type}'"))?;
            controller
                .open_modal(ModalRequest::new(collectible_type, coin))
                .map_err(|e| e.to_string())?;

            let mut queued = Vec::with_capacity(files.len());
            for path in &files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| format!("invalid file path '{}'", path.display()))?;
                controller.queue_upload(&name).map_err(|e| e.to_string())?;
                queued.push((path, name));
            }

            let pb = upload_progress(queued.len() as u64)?;
            for (path, name) in queued {
                pb.set_message(name.clone());
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
                let outcome = controller
                    .send_upload(&name, bytes)
                    .await
                    .map_err(|e| e.to_string())?;
                let mut record = OutcomeRecord::new("upload", name.clone(), outcome.label());
                let server_name = controller
                    .modal()
                    .and_then(|m| m.pictures.files().iter().rev().find(|f| f.name == name))
                    .and_then(|f| f.server_name.clone());
                if let Some(server_name) = server_name {
                    record = record.with_detail(server_name);
                }
                records.push(record);
                pb.inc(1);
            }
            pb.finish_and_clear();
        }
        Command::Form(_) | Command::Api(_) | Command::InitConfig => {}
    }

    write_records(run.output_format, &records)
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{e}");
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    if let Command::InitConfig = args.command {
        let path = args
            .config
            .as_deref()
            .map(config::expand_tilde)
            .or_else(config::default_config_path)
            .ok_or_else(|| "cannot locate home directory, pass --config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            status_line("INF", &format!("wrote default config to {}", path.display()));
        } else {
            status_line("WRN", &format!("config already exists at {}", path.display()));
        }
        return Ok(());
    }

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    if let Some(path) = run.config_path.as_ref() {
        tracing::debug!(config = %path.display(), verbose = run.verbose, "configuration loaded");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn timeout_falls_back_to_config_then_default() {
        let args = CliArgs::parse_from(["numicollec", "want", "95"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.transport.timeout_seconds, 10);

        let args = CliArgs::parse_from(["numicollec", "want", "95"]);
        let cfg = ConfigFile {
            timeout: Some(3),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.transport.timeout_seconds, 3);

        let args = CliArgs::parse_from(["numicollec", "--timeout", "7", "want", "95"]);
        let cfg = ConfigFile {
            timeout: Some(3),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.transport.timeout_seconds, 7);
    }

    #[test]
    fn session_flag_overrides_config_cookie() {
        let args = CliArgs::parse_from(["numicollec", "want", "95", "--session", "PHPSESSID=cli"]);
        let cfg = ConfigFile {
            session_cookie: Some("PHPSESSID=file".to_string()),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.transport.session_cookie.as_deref(), Some("PHPSESSID=cli"));
        assert_eq!(run.transport.base_url, DEFAULT_ORIGIN);
    }

    #[test]
    fn invalid_grade_is_rejected_before_any_request() {
        let args = CliArgs::parse_from(["numicollec", "save", "--coin", "95", "--grade", "mint"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn remove_with_version_zero_is_rejected() {
        let args = CliArgs::parse_from([
            "numicollec", "remove", "--item", "4", "--coin", "95", "--version", "0",
        ]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert!(err.contains("invalid version"));

        let args = CliArgs::parse_from([
            "numicollec", "remove", "--item", "4", "--coin", "95", "--version", "31",
        ]);
        assert!(build_run_config(args, ConfigFile::default()).is_ok());
    }

    #[test]
    fn api_commands_need_a_key() {
        let args = CliArgs::parse_from(["numicollec", "api", "items"]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert!(err.contains("API key"));

        let args = CliArgs::parse_from(["numicollec", "api", "items"]);
        let cfg = ConfigFile {
            api_key: Some("k3y".to_string()),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.transport.api_key.as_deref(), Some("k3y"));
        assert_eq!(run.transport.api_base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn api_add_without_type_is_rejected() {
        let args = CliArgs::parse_from([
            "numicollec", "--api-key", "k", "api", "add", "--quantity", "2",
        ]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());
    }

    #[test]
    fn api_item_args_map_onto_fields() {
        let args = CliArgs::parse_from([
            "numicollec", "api", "--user", "7", "edit", "12", "--grade", "ttb", "--price", "3,5",
            "--currency", "eur", "--swap",
        ]);
        let Command::Api(api) = args.command else {
            panic!("expected api");
        };
        assert_eq!(api.user, Some(7));
        let ApiAction::Edit { id, fields } = api.action else {
            panic!("expected edit");
        };
        assert_eq!(id, 12);
        let fields = item_fields(&fields).unwrap();
        assert_eq!(fields.grade, Some(Grade::Vf));
        assert_eq!(fields.price, Some(Price::new(3.5, Some("EUR"))));
        assert_eq!(fields.for_swap, Some(true));
        assert!(fields.type_id.is_none());
    }

    #[test]
    fn output_format_from_config() {
        let args = CliArgs::parse_from(["numicollec", "form", "--coin", "95"]);
        let cfg = ConfigFile {
            output_format: Some("json".to_string()),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.output_format, OutputFormat::Json);
    }

    #[test]
    fn item_args_map_onto_form_request() {
        let args = CliArgs::parse_from([
            "numicollec",
            "save",
            "--coin",
            "95",
            "--type",
            "banknote",
            "--item",
            "4",
            "--grade",
            "ttb",
            "--value",
            "2,5",
            "--swap",
            "--pictures",
            "a.jpg, b.pdf",
        ]);
        let Command::Save(item) = args.command else {
            panic!("expected save");
        };
        let req = item_request(&item).unwrap();
        assert_eq!(req.collectible_type, CollectibleType::Banknote);
        assert_eq!(req.item, Some(4));
        assert_eq!(req.grade, Some(Grade::Vf));
        assert_eq!(req.value, Some(2.5));
        assert_eq!(req.for_swap, Some(true));
        assert_eq!(req.pictures, vec!["a.jpg".to_string(), "b.pdf".to_string()]);
    }

    #[test]
    fn seeded_quantity_field_is_reused() {
        let mut page = Page::from_markup(r#"<input id="qc12" class="qc7" value="1">"#);
        seed_quantity_field(&mut page, 12, "qc", "4");
        assert_eq!(page.node_by_id("qc12").unwrap().value, "4");
        assert_eq!(page.with_exact_class("input", "qc7").len(), 1);
    }
}
