use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complaint triage status.
///
/// Out-of-range strings are rejected at deserialization, so handlers and the
/// engine only ever see one of these two values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Resolved,
}

impl ComplaintStatus {
    /// Returns the canonical status string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

pub mod complaint {
    use super::*;

    /// Request body for submitting a complaint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ComplaintNew {
        pub student_name: Option<String>,
        pub email: Option<String>,
        pub title: String,
        pub description: String,
        pub category: String,
        pub location: Option<String>,
        /// Pre-encoded image payloads (data URIs), insertion order preserved.
        #[serde(default)]
        pub images: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ComplaintCreated {
        pub id: String,
    }

    /// A complaint with its aggregates, as returned by the list endpoint.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ComplaintView {
        pub id: String,
        pub student_name: Option<String>,
        pub email: Option<String>,
        pub title: String,
        pub description: String,
        pub category: String,
        pub location: Option<String>,
        pub status: ComplaintStatus,
        /// Derived from the support relation, never a stored counter.
        pub support_count: i64,
        pub images: Vec<String>,
        /// Newest first.
        pub comments: Vec<comment::CommentView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ComplaintListResponse {
        pub complaints: Vec<ComplaintView>,
    }

    /// Request body for `PUT /complaints/{id}/status`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusUpdate {
        pub status: ComplaintStatus,
    }
}

pub mod comment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommentNew {
        /// Blank or missing names are stored as "Anonymous".
        pub name: Option<String>,
        pub text: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommentCreated {
        pub id: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CommentView {
        pub id: String,
        pub name: String,
        pub text: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod support {
    use super::*;

    /// Request body for toggling support on a complaint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupportToggle {
        pub user_identifier: String,
    }

    /// Outcome of a toggle: the caller's new standing plus the fresh count.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupportState {
        pub supported: bool,
        pub support_count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SupportCheck {
        pub supported: bool,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<String>,
    }
}

pub mod location {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationListResponse {
        pub locations: Vec<String>,
    }
}

pub mod stats {
    use super::*;
    use std::collections::HashMap;

    /// Snapshot of complaint counts, recomputed on every call.
    ///
    /// Per-name maps are keyed by the live registry entries, so categories
    /// and locations with zero complaints appear with count 0.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct Statistics {
        pub total: i64,
        pub pending: i64,
        pub resolved: i64,
        pub by_category: HashMap<String, i64>,
        pub by_location: HashMap<String, i64>,
    }
}

pub mod admin {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub success: bool,
        pub message: String,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub timestamp: DateTime<Utc>,
    }
}
