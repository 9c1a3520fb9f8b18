mod academic;
mod paper;
mod user;

pub use academic::*;
pub use paper::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Extra fields the backend sends that this client doesn't model.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// `{"message": ..., "data": ...}` wrapper used by the paper endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Body returned by mutating paper calls. A present `message` on an
/// otherwise successful response signals an application-level failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageBody {
    pub fn soft_failure(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Accepts either a bare payload or one wrapped in an [`Envelope`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(data) => data,
        }
    }
}
