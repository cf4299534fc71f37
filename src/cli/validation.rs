use crate::cli::args::{ApiAction, ApiItemArgs, CliArgs, Command, ItemArgs};
use crate::modal::form::{CollectibleType, Grade};
use crate::output::OutputFormat;

fn validate_item(item: &ItemArgs) -> Result<(), String> {
    if CollectibleType::parse(&item.collectible_type).is_none() {
        return Err(format!(
            "invalid --type '{}', expected coin, banknote or exonumia",
            item.collectible_type
        ));
    }
    if item.quantity == Some(0) {
        return Err("invalid quantity, expected positive integer".to_string());
    }
    if let Some(raw) = item.grade.as_deref() {
        if Grade::parse(raw).is_none() {
            return Err(format!(
                "invalid --grade '{raw}', expected one of g, vg, f, vf, xf, au, unc"
            ));
        }
    }
    if let Some(raw) = item.value.as_deref() {
        crate::utils::parse_amount(raw).map_err(|e| format!("invalid --value '{raw}': {e}"))?;
    }
    if let Some(version) = item.version {
        if version == 0 {
            return Err("invalid version, expected positive integer".to_string());
        }
    }
    Ok(())
}

fn validate_collectible_type(raw: Option<&str>) -> Result<(), String> {
    match raw {
        Some(raw) if CollectibleType::parse(raw).is_none() => Err(format!(
            "invalid --type '{raw}', expected coin, banknote or exonumia"
        )),
        _ => Ok(()),
    }
}

fn validate_api_item(fields: &ApiItemArgs) -> Result<(), String> {
    if fields.quantity == Some(0) {
        return Err("invalid quantity, expected positive integer".to_string());
    }
    if let Some(raw) = fields.grade.as_deref() {
        if Grade::parse(raw).is_none() {
            return Err(format!(
                "invalid --grade '{raw}', expected one of g, vg, f, vf, xf, au, unc"
            ));
        }
    }
    if let Some(raw) = fields.price.as_deref() {
        crate::utils::parse_amount(raw).map_err(|e| format!("invalid --price '{raw}': {e}"))?;
    }
    if let Some(code) = fields.currency.as_deref() {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("invalid --currency '{code}', expected a 3-letter ISO 4217 code"));
        }
    }
    Ok(())
}

fn validate_api(action: &ApiAction) -> Result<(), String> {
    match action {
        ApiAction::Token => {}
        ApiAction::Collections { collectible_type } => {
            validate_collectible_type(collectible_type.as_deref())?
        }
        ApiAction::Items {
            collectible_type, ..
        } => validate_collectible_type(collectible_type.as_deref())?,
        ApiAction::Item { id } | ApiAction::Delete { id, .. } => {
            if *id == 0 {
                return Err("invalid item id, expected positive integer".to_string());
            }
        }
        ApiAction::Add(fields) => {
            if fields.type_id.is_none() {
                return Err("adding an item needs --type-id".to_string());
            }
            validate_api_item(fields)?;
        }
        ApiAction::Edit { id, fields } => {
            if *id == 0 {
                return Err("invalid item id, expected positive integer".to_string());
            }
            validate_api_item(fields)?;
        }
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --output-format '{raw}', expected text or json"));
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --base-url '{raw}': {e}"))?;
    }
    if let Some(raw) = args.api_base_url.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --api-base-url '{raw}': {e}"))?;
    }
    match &args.command {
        Command::Save(item) | Command::Form(item) => validate_item(item)?,
        Command::Quantity { quantity, .. } => {
            if crate::utils::parse_leading_int(quantity).is_none() {
                return Err(format!("invalid --quantity '{quantity}', expected a number"));
            }
        }
        Command::Upload {
            collectible_type, ..
        } => {
            if CollectibleType::parse(collectible_type).is_none() {
                return Err(format!("invalid --type '{collectible_type}'"));
            }
        }
        Command::Want { type_tag, .. } | Command::DontWant { type_tag, .. } => {
            if type_tag.trim().is_empty() {
                return Err("type must not be empty".to_string());
            }
        }
        Command::Remove { version, .. } => {
            if *version == Some(0) {
                return Err("invalid version, expected positive integer".to_string());
            }
        }
        Command::Api(api) => validate_api(&api.action)?,
        Command::Comment { .. } | Command::InitConfig => {}
    }
    Ok(())
}
