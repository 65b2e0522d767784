//! Waitlist signup form.
//!
//! Holds the draft record, decides when submit is allowed, posts the entry,
//! and maps the response onto a user-facing outcome. Every outcome is also
//! recorded through an [`EventSink`].
//!
//! ```text
//! Idle ──submit──► Submitting ──► Success   (2xx: form cleared)
//!                             └─► Error     (409 / other status / network)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analytics::EventSink;
use crate::api::{ApiClient, ApiError, WaitlistEntry};

pub const SUCCESS_MESSAGE: &str = "Thanks for joining! We'll be in touch soon.";
pub const DUPLICATE_MESSAGE: &str = "This email is already on the waitlist.";
pub const ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Could not reach the server. Check your connection and try again.";

/// Editable form fields. Empty optional fields are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitlistDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: String,
}

impl WaitlistDraft {
    /// Submit is enabled only for a non-empty email containing `@`.
    pub fn can_submit(&self) -> bool {
        let email = self.email.trim();
        !email.is_empty() && email.contains('@')
    }

    pub fn to_entry(&self, source: &str) -> WaitlistEntry {
        fn optional(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        WaitlistEntry {
            name: optional(&self.name),
            email: self.email.trim().to_string(),
            company: optional(&self.company),
            role: optional(&self.role),
            source: source.to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Joined,
    Duplicate,
    Failed,
    NetworkError,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Joined => SUCCESS_MESSAGE,
            Self::Duplicate => DUPLICATE_MESSAGE,
            Self::Failed => ERROR_MESSAGE,
            Self::NetworkError => NETWORK_ERROR_MESSAGE,
        }
    }

    /// Analytics event name.
    pub fn event(self) -> &'static str {
        match self {
            Self::Joined => "waitlist_submitted",
            Self::Duplicate => "waitlist_duplicate",
            Self::Failed => "waitlist_error",
            Self::NetworkError => "waitlist_network_error",
        }
    }

    pub fn status(self) -> SubmitStatus {
        match self {
            Self::Joined => SubmitStatus::Success,
            _ => SubmitStatus::Error,
        }
    }

    fn from_response(result: &Result<crate::api::RawResponse, ApiError>) -> Self {
        match result {
            Ok(resp) if resp.is_success() => Self::Joined,
            Ok(resp) if resp.status == 409 => Self::Duplicate,
            Ok(_) => Self::Failed,
            Err(ApiError::Network(_)) => Self::NetworkError,
            Err(_) => Self::Failed,
        }
    }
}

/// Form state: draft, status, and the last outcome's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistForm {
    pub draft: WaitlistDraft,
    source: String,
    status: SubmitStatus,
    outcome: Option<Outcome>,
}

impl WaitlistForm {
    pub fn new(source: &str) -> Self {
        Self {
            draft: WaitlistDraft::default(),
            source: source.to_string(),
            status: SubmitStatus::Idle,
            outcome: None,
        }
    }

    pub fn with_draft(source: &str, draft: WaitlistDraft) -> Self {
        Self {
            draft,
            ..Self::new(source)
        }
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn message(&self) -> Option<&'static str> {
        self.outcome.map(Outcome::message)
    }

    pub fn can_submit(&self) -> bool {
        self.status != SubmitStatus::Submitting && self.draft.can_submit()
    }

    /// Post the draft and settle the form.
    ///
    /// Returns `None` without contacting the backend when submit is
    /// disabled. On success the draft is cleared; on any failure it is kept.
    pub fn submit(&mut self, api: &ApiClient, sink: &dyn EventSink) -> Option<Outcome> {
        if !self.can_submit() {
            return None;
        }
        self.status = SubmitStatus::Submitting;

        let entry = self.draft.to_entry(&self.source);
        let result = api.join_waitlist(&entry);
        let outcome = Outcome::from_response(&result);

        let mut props = json!({ "source": self.source });
        match &result {
            Ok(resp) => props["status"] = json!(resp.status),
            Err(e) => props["error"] = json!(e.to_string()),
        }
        sink.track(outcome.event(), props);

        if outcome == Outcome::Joined {
            self.draft.clear();
        }
        self.status = outcome.status();
        self.outcome = Some(outcome);
        Some(outcome)
    }
}
