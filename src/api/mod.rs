pub mod types;

use std::collections::HashMap;
use std::time::Instant;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use self::types::{
    scope_param, CollectedItem, CollectedItems, CollectionsReply, Grant, ItemFields, ItemFilter,
    Scope, Token, TokenReply, UserCollection,
};
use crate::modal::form::CollectibleType;
use crate::transport::{ApiMethod, ApiRequest, ApiResponse, Transport, TransportError};

/// Label of the token issued to the API key's own account.
pub const SELF_TOKEN: &str = "self";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: &'static str,
        body: String,
    },

    #[error("unexpected reply from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("request body must not be empty")]
    EmptyBody,

    #[error("no token stored under label '{label}'")]
    UnknownToken { label: String },

    #[error("token '{label}' has expired")]
    ExpiredToken { label: String },
}

pub fn status_message(status: u16) -> &'static str {
    match status {
        200 => "Request successful",
        201 | 202 => "The requested operation was accepted and successful",
        204 => "The item has been deleted",
        400 => "Invalid parameter or missing mandatory parameter",
        401 => "Invalid or missing API key, or insufficient permission",
        404 => "The requested item not found, or you are not allowed to access it",
        429 => "Quota exceeded",
        501 => "No user associated to your API key",
        _ => "Unexpected response",
    }
}

fn require_item(item_id: u64) -> Result<(), ApiError> {
    if item_id == 0 {
        return Err(ApiError::MissingField { field: "item_id" });
    }
    Ok(())
}

fn item_path(user: u64, item_id: u64) -> String {
    format!("/users/{user}/collected_items/{item_id}")
}

/// Client for the collection endpoints of the public API. Tokens are cached
/// by label; the `self` token is fetched on first use and again once it
/// expires.
pub struct ApiClient<T> {
    transport: T,
    tokens: HashMap<String, Token>,
    label: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            tokens: HashMap::new(),
            label: SELF_TOKEN.to_string(),
        }
    }

    /// Makes collection calls authenticate with the token stored under `label`.
    pub fn using_token(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn stored_token(&self, label: &str) -> Option<&Token> {
        self.tokens.get(label)
    }

    async fn exchange(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        let response = self.transport.api(&request).await?;
        if !(200..300).contains(&response.status) {
            let message = status_message(response.status);
            warn!(
                method = method.as_str(),
                path = %request.path,
                status = response.status,
                "api call rejected"
            );
            return Err(ApiError::Status {
                status: response.status,
                message,
                body: response.body,
            });
        }
        debug!(method = method.as_str(), path = %request.path, status = response.status, "api call done");
        Ok(response)
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let path = request.path.clone();
        let response = self.exchange(request).await?;
        serde_json::from_str(&response.body).map_err(|source| ApiError::Decode { path, source })
    }

    /// Requests a token through `grant` and stores it under `label`.
    pub async fn authorize(
        &mut self,
        label: &str,
        grant: Grant,
        scopes: &[Scope],
        state: Option<&str>,
    ) -> Result<Token, ApiError> {
        let scope = scope_param(scopes);
        let mut request = ApiRequest::new(ApiMethod::Get, "/oauth_token")
            .param("grant_type", grant.as_str())
            .param("scope", &scope)
            .param("state", state.unwrap_or_default());
        if let Grant::AuthorizationCode {
            code,
            client_id,
            client_secret,
            redirect_uri,
        } = &grant
        {
            for (field, value) in [
                ("code", code),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("redirect_uri", redirect_uri),
            ] {
                if value.trim().is_empty() {
                    return Err(ApiError::MissingField { field });
                }
                request = request.param(field, value);
            }
        }

        let reply: TokenReply = self.call(request).await?;
        let token = Token::from_reply(reply, scope, Instant::now());
        info!(label, user = token.user_id, scope = %token.scope, "api token stored");
        self.tokens.insert(label.to_string(), token.clone());
        Ok(token)
    }

    /// Token for the API key's own account with every scope.
    pub async fn authorize_self(&mut self) -> Result<Token, ApiError> {
        self.authorize(SELF_TOKEN, Grant::ClientCredentials, &Scope::ALL, None)
            .await
    }

    /// Drops the cached `self` token and fetches a new one.
    pub async fn refresh_self(&mut self) -> Result<Token, ApiError> {
        self.tokens.remove(SELF_TOKEN);
        self.authorize_self().await
    }

    /// Token collection calls run with. Only the `self` token is fetched on
    /// demand; other labels must have been authorized first.
    pub async fn token(&mut self) -> Result<Token, ApiError> {
        let now = Instant::now();
        match self.tokens.get(&self.label) {
            Some(token) if !token.is_expired(now) => return Ok(token.clone()),
            Some(_) if self.label != SELF_TOKEN => {
                return Err(ApiError::ExpiredToken {
                    label: self.label.clone(),
                })
            }
            None if self.label != SELF_TOKEN => {
                return Err(ApiError::UnknownToken {
                    label: self.label.clone(),
                })
            }
            _ => {}
        }
        debug!("fetching self token");
        self.authorize_self().await
    }

    pub async fn my_user_id(&mut self) -> Result<u64, ApiError> {
        Ok(self.token().await?.user_id)
    }

    async fn user_and_token(&mut self, user: Option<u64>) -> Result<(u64, Token), ApiError> {
        let token = self.token().await?;
        Ok((user.unwrap_or(token.user_id), token))
    }

    pub async fn user_collections(
        &mut self,
        user: Option<u64>,
        category: Option<CollectibleType>,
    ) -> Result<Vec<UserCollection>, ApiError> {
        let (user, token) = self.user_and_token(user).await?;
        let request = ApiRequest::new(ApiMethod::Get, format!("/users/{user}/collections"))
            .param("category", category.map(|c| c.as_str()).unwrap_or_default())
            .bearer(token.access_token);
        let reply: CollectionsReply = self.call(request).await?;
        Ok(reply.collections)
    }

    pub async fn collected_items(
        &mut self,
        user: Option<u64>,
        filter: &ItemFilter,
    ) -> Result<CollectedItems, ApiError> {
        let (user, token) = self.user_and_token(user).await?;
        let request = ApiRequest::new(ApiMethod::Get, format!("/users/{user}/collected_items"))
            .param("category", filter.category.map(|c| c.as_str()).unwrap_or_default())
            .param("type", filter.type_id.map(|t| t.to_string()).unwrap_or_default())
            .param(
                "collection",
                filter.collection.map(|c| c.to_string()).unwrap_or_default(),
            )
            .bearer(token.access_token);
        self.call(request).await
    }

    pub async fn collected_item(
        &mut self,
        user: Option<u64>,
        item_id: u64,
    ) -> Result<CollectedItem, ApiError> {
        require_item(item_id)?;
        let (user, token) = self.user_and_token(user).await?;
        let request =
            ApiRequest::new(ApiMethod::Get, item_path(user, item_id)).bearer(token.access_token);
        self.call(request).await
    }

    pub async fn add_collected_item(
        &mut self,
        user: Option<u64>,
        fields: &ItemFields,
    ) -> Result<CollectedItem, ApiError> {
        if fields.is_empty() {
            return Err(ApiError::EmptyBody);
        }
        if fields.type_id.is_none() {
            return Err(ApiError::MissingField { field: "type" });
        }
        let body = serde_json::to_value(fields).map_err(ApiError::Encode)?;
        let (user, token) = self.user_and_token(user).await?;
        let request = ApiRequest::new(ApiMethod::Post, format!("/users/{user}/collected_items"))
            .body(body)
            .bearer(token.access_token);
        self.call(request).await
    }

    pub async fn edit_collected_item(
        &mut self,
        user: Option<u64>,
        item_id: u64,
        fields: &ItemFields,
    ) -> Result<CollectedItem, ApiError> {
        require_item(item_id)?;
        if fields.is_empty() {
            return Err(ApiError::EmptyBody);
        }
        let body = serde_json::to_value(fields).map_err(ApiError::Encode)?;
        let (user, token) = self.user_and_token(user).await?;
        let request = ApiRequest::new(ApiMethod::Patch, item_path(user, item_id))
            .body(body)
            .bearer(token.access_token);
        self.call(request).await
    }

    pub async fn delete_collected_item(
        &mut self,
        user: Option<u64>,
        item_id: u64,
    ) -> Result<(), ApiError> {
        require_item(item_id)?;
        let (user, token) = self.user_and_token(user).await?;
        let request =
            ApiRequest::new(ApiMethod::Delete, item_path(user, item_id)).bearer(token.access_token);
        self.exchange(request).await?;
        info!(user, item = item_id, "collected item deleted");
        Ok(())
    }
}
