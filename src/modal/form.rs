use serde::Serialize;

use crate::config::SiteConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleType {
    Coin,
    Banknote,
    Exonumia,
}

impl CollectibleType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "coin" | "coins" => Some(Self::Coin),
            "banknote" | "banknotes" | "note" => Some(Self::Banknote),
            "exonumia" | "exonumia_item" | "token" => Some(Self::Exonumia),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coin => "coin",
            Self::Banknote => "banknote",
            Self::Exonumia => "exonumia",
        }
    }

    pub fn version_label(self) -> &'static str {
        match self {
            Self::Coin => "Coin:",
            Self::Banknote => "Banknote:",
            Self::Exonumia => "Version:",
        }
    }
}

/// Grades offered by the item form, from worst to best. The site stores
/// them under its own codes; the public API uses the English abbreviations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    G,
    Vg,
    F,
    Vf,
    Xf,
    Au,
    Unc,
}

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::G,
        Grade::Vg,
        Grade::F,
        Grade::Vf,
        Grade::Xf,
        Grade::Au,
        Grade::Unc,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::G => "ab",
            Self::Vg => "b",
            Self::F => "tb",
            Self::Vf => "ttb",
            Self::Xf => "sup",
            Self::Au => "spl",
            Self::Unc => "fdc",
        }
    }

    pub fn api_code(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Vg => "vg",
            Self::F => "f",
            Self::Vf => "vf",
            Self::Xf => "xf",
            Self::Au => "au",
            Self::Unc => "unc",
        }
    }

    pub fn abbr(self) -> &'static str {
        match self {
            Self::G => "G",
            Self::Vg => "VG",
            Self::F => "F",
            Self::Vf => "VF",
            Self::Xf => "XF",
            Self::Au => "AU",
            Self::Unc => "UNC",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::G => "Good",
            Self::Vg => "Very good",
            Self::F => "Fine",
            Self::Vf => "Very Fine",
            Self::Xf => "Extremely Fine",
            Self::Au => "Almost Uncirculated",
            Self::Unc => "Uncirculated",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.code() == code)
    }

    /// Accepts the site code (`ttb`) or the API code (`vf`), case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.code() == lower || g.api_code() == lower)
    }
}

/// Everything the item form can be opened with. Only the collectible type
/// and id are required; anything left out takes its creation default.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalRequest {
    pub collectible_type: CollectibleType,
    pub coin_id: u32,
    pub version: Option<u32>,
    pub item: Option<u32>,
    pub quantity: Option<u32>,
    pub grade: Option<Grade>,
    pub for_swap: Option<bool>,
    pub value: Option<f64>,
    pub comment: Option<String>,
    pub swap_comment: Option<String>,
    pub section: Option<u32>,
    pub pictures: Vec<String>,
}

impl ModalRequest {
    pub fn new(collectible_type: CollectibleType, coin_id: u32) -> Self {
        Self {
            collectible_type,
            coin_id,
            version: None,
            item: None,
            quantity: None,
            grade: None,
            for_swap: None,
            value: None,
            comment: None,
            swap_comment: None,
            section: None,
            pictures: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: Option<u32>) -> Self {
        self.version = version;
        self
    }

    pub fn with_item(mut self, item: u32) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_grade(mut self, grade: Option<Grade>) -> Self {
        self.grade = grade;
        self
    }

    pub fn with_swap(mut self, for_swap: bool) -> Self {
        self.for_swap = Some(for_swap);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn with_swap_comment(mut self, comment: &str) -> Self {
        self.swap_comment = Some(comment.to_string());
        self
    }

    pub fn with_section(mut self, section: u32) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_pictures(mut self, pictures: Vec<String>) -> Self {
        self.pictures = pictures;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

/// Current field values of an open item form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModalForm {
    pub mode: FormMode,
    pub collectible_type: CollectibleType,
    pub coin_id: u32,
    pub version: Option<u32>,
    pub item: Option<u32>,
    pub quantity: u32,
    pub grade: Option<Grade>,
    pub for_swap: bool,
    pub value: Option<f64>,
    pub comment: String,
    pub swap_comment: String,
    pub section: u32,
    pub pictures: Vec<String>,
}

impl ModalForm {
    pub fn from_request(req: ModalRequest, site: &SiteConfig) -> Self {
        let mode = if req.item.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        };
        let section = match req.section {
            Some(s) if s != 0 => s,
            _ => site.default_section,
        };
        Self {
            mode,
            collectible_type: req.collectible_type,
            coin_id: req.coin_id,
            version: req.version,
            item: req.item,
            quantity: req.quantity.unwrap_or(1),
            grade: req.grade,
            for_swap: req.for_swap.unwrap_or(false),
            value: req.value,
            comment: req.comment.unwrap_or_default(),
            swap_comment: req.swap_comment.unwrap_or_default(),
            section,
            pictures: req.pictures,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add to my collection",
            FormMode::Edit => "Edit items in my collection",
        }
    }

    pub fn is_create(&self) -> bool {
        self.mode == FormMode::Create
    }

    /// Context a fresh creation form is seeded with after "save and add again".
    pub fn reopen_request(&self, version: Option<u32>) -> ModalRequest {
        ModalRequest::new(self.collectible_type, self.coin_id).with_version(version)
    }
}
