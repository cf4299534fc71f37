use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize, Serializer};

use crate::modal::form::{CollectibleType, Grade};

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    ViewCollection,
    EditCollection,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::ViewCollection, Scope::EditCollection];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewCollection => "view_collection",
            Self::EditCollection => "edit_collection",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value.trim())
    }
}

/// Comma-separated scope list; nothing requested means read access only.
pub(crate) fn scope_param(scopes: &[Scope]) -> String {
    if scopes.is_empty() {
        return Scope::ViewCollection.as_str().to_string();
    }
    scopes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grant {
    /// Token for the account owning the API key.
    ClientCredentials,
    /// Token for a user who approved the application.
    AuthorizationCode {
        code: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    },
}

impl Grant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::AuthorizationCode { .. } => "authorization_code",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenReply {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user_id: u64,
}

/// Bearer token kept in the client's cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub user_id: u64,
    pub scope: String,
    #[serde(skip)]
    pub expires_at: Instant,
}

impl Token {
    pub(crate) fn from_reply(reply: TokenReply, scope: String, now: Instant) -> Self {
        // Count the token as expired one second early.
        let lifetime = Duration::from_secs(reply.expires_in.saturating_sub(1));
        Self {
            access_token: reply.access_token,
            token_type: reply.token_type,
            user_id: reply.user_id,
            scope,
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn expires_in(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCollection {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionsReply {
    #[serde(default)]
    pub collections: Vec<UserCollection>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: f64,
    pub currency: String,
}

impl Price {
    pub fn new(value: f64, currency: Option<&str>) -> Self {
        Self {
            value,
            currency: currency
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedItem {
    pub id: u64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueRef>,
    #[serde(default)]
    pub for_swap: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<UserCollection>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedItems {
    #[serde(default)]
    pub item_count: u64,
    #[serde(default)]
    pub item_for_swap_count: u64,
    #[serde(default)]
    pub items: Vec<CollectedItem>,
}

/// Narrows a collected items listing. Unset fields are not sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<CollectibleType>,
    pub type_id: Option<u64>,
    pub collection: Option<u64>,
}

fn api_grade<S: Serializer>(grade: &Option<Grade>, serializer: S) -> Result<S::Ok, S::Error> {
    match grade {
        Some(grade) => serializer.serialize_str(grade.api_code()),
        None => serializer.serialize_none(),
    }
}

/// Body of an add or edit call. Only the fields that are set are sent, so
/// an edit leaves everything else untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ItemFields {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(serialize_with = "api_grade", skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_swap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<u64>,
}

impl ItemFields {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
