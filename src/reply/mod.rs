pub const DISCONNECTED_MESSAGE: &str = "You were disconnected. Please log in and try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// The server answered with something other than a success code.
    Rejected(String),
    /// The request never produced a usable body.
    Transport(String),
}

impl Failure {
    pub fn detail(&self) -> &str {
        match self {
            Self::Rejected(body) => body,
            Self::Transport(message) => message,
        }
    }
}

/// Result of one request against the site, already classified from the
/// raw response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    SessionExpired,
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Done(v) => Outcome::Done(f(v)),
            Self::SessionExpired => Outcome::SessionExpired,
            Self::Failed(e) => Outcome::Failed(e),
        }
    }

    /// Message shown to the user for anything but success.
    pub fn alert_message(&self) -> Option<&'static str> {
        match self {
            Self::Done(_) => None,
            Self::SessionExpired => Some(DISCONNECTED_MESSAGE),
            Self::Failed(_) => Some(GENERIC_ERROR_MESSAGE),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Done(_) => "ok",
            Self::SessionExpired => "session_expired",
            Self::Failed(Failure::Rejected(_)) => "rejected",
            Self::Failed(Failure::Transport(_)) => "transport_error",
        }
    }
}

fn is_session_expired(body: &str) -> bool {
    body.starts_with("LOGIN")
}

/// Item save/remove endpoints answer with the markup of the item row.
pub fn classify_markup(body: String) -> Outcome<String> {
    if is_session_expired(&body) {
        return Outcome::SessionExpired;
    }
    if body.starts_with("ERR") {
        return Outcome::Failed(Failure::Rejected(body));
    }
    Outcome::Done(body)
}

/// Toggle and legacy quantity endpoints answer with a bare `OK`.
pub fn classify_status(body: &str) -> Outcome<()> {
    if is_session_expired(body) {
        return Outcome::SessionExpired;
    }
    if body.trim() == "OK" {
        Outcome::Done(())
    } else {
        Outcome::Failed(Failure::Rejected(body.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentSaved {
    Saved,
    /// The piece is no longer in the collection; nothing to repaint.
    NoItems,
}

pub fn classify_comment(body: &str) -> Outcome<CommentSaved> {
    if body.trim() == "NO_ITEMS" {
        return Outcome::Done(CommentSaved::NoItems);
    }
    classify_status(body).map(|_| CommentSaved::Saved)
}

/// Upload answers are `OK<filename>` or a message meant for the user.
pub fn classify_upload(body: &str) -> Outcome<String> {
    match body.strip_prefix("OK") {
        Some(filename) if !filename.trim().is_empty() => {
            Outcome::Done(filename.trim().to_string())
        }
        _ => Outcome::Failed(Failure::Rejected(body.to_string())),
    }
}
