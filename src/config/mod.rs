use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::VersionCatalog;
use crate::transport::DEFAULT_ORIGIN;

pub const DEFAULT_SECTION: u32 = 43707;
pub const DEFAULT_PICTURE_OWNER: u32 = 237078;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub id: u32,
    pub label: String,
}

impl Section {
    pub fn new(id: u32, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
        }
    }
}

pub fn default_sections() -> Vec<Section> {
    vec![
        Section::new(43709, "Misc - Non-US"),
        Section::new(43708, "Misc - US"),
        Section::new(43706, "Type - France"),
        Section::new(43705, "Type - Mexico"),
        Section::new(43707, "Type - US"),
    ]
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    #[serde(alias = "cookie")]
    pub session_cookie: Option<String>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub picture_owner: Option<u32>,
    pub default_section: Option<u32>,
    pub sections: Option<Vec<Section>>,
    pub catalog: Option<String>,
    pub no_color: Option<bool>,
    pub output_format: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
}

/// Read-only description of the site the client talks to. Handed to the
/// modal builder and the controller instead of looking anything up from
/// global state.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub origin: String,
    pub picture_owner: u32,
    pub default_section: u32,
    pub sections: Vec<Section>,
    pub catalog: VersionCatalog,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            picture_owner: DEFAULT_PICTURE_OWNER,
            default_section: DEFAULT_SECTION,
            sections: default_sections(),
            catalog: VersionCatalog::default(),
        }
    }
}

impl SiteConfig {
    /// Directory the site serves collection pictures from, relative to the origin.
    pub fn pictures_path(&self) -> String {
        format!("/vous/pictures/{}/", self.picture_owner)
    }

    pub fn pictures_url(&self) -> String {
        format!(
            "{}{}",
            self.origin.trim_end_matches('/'),
            self.pictures_path()
        )
    }

    pub fn from_config(cfg: &ConfigFile, origin: &str) -> Result<Self, String> {
        let catalog = match cfg.catalog.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(path) => VersionCatalog::load(&expand_tilde(path))?,
            None => VersionCatalog::default(),
        };
        let sections = match cfg.sections.clone() {
            Some(sections) if !sections.is_empty() => sections,
            _ => default_sections(),
        };
        Ok(Self {
            origin: origin.to_string(),
            picture_owner: cfg.picture_owner.unwrap_or(DEFAULT_PICTURE_OWNER),
            default_section: cfg.default_section.unwrap_or(DEFAULT_SECTION),
            sections,
            catalog,
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".numicollec").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

fn default_config_yaml() -> String {
    r#"# numicollec config
#
# Location (default):
#   ~/.numicollec/config.yml

# Site
base_url: https://en.numista.com
# Copy the Cookie header of a logged-in browser session.
# session_cookie: "PHPSESSID=..."
timeout: 10
# proxy: http://127.0.0.1:8080

# Pictures are served from /vous/pictures/<picture_owner>/
picture_owner: 237078

# Collection sections offered by the item form
default_section: 43707
sections:
  - { id: 43709, label: "Misc - Non-US" }
  - { id: 43708, label: "Misc - US" }
  - { id: 43706, label: "Type - France" }
  - { id: 43705, label: "Type - Mexico" }
  - { id: 43707, label: "Type - US" }

# Public API (api subcommands)
# api_key: "..."
api_base_url: https://api.numista.com/api/v3

# Version catalog exported from the collectible pages (JSON, keys "c<id>")
# catalog: ~/.numicollec/versions.json

# Output
no_color: false
output_format: text
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}
