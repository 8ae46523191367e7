use std::{
    collections::BTreeSet,
    fs,
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use api_types::{comment::CommentView, complaint::ComplaintView, stats::Statistics};

use crate::error::Result;

const DEFAULT_STATE_PATH: &str = "config/tui_state.json";

/// Everything the client persists between runs: the per-client identifier,
/// the last snapshot fetched from the server, and the offline-mode data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    #[serde(default)]
    pub user_identifier: String,
    #[serde(default)]
    pub cached: Option<CachedSnapshot>,
    #[serde(default)]
    pub local: LocalData,
}

/// The last successfully fetched server state, kept so the UI can keep
/// showing something when the server goes away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub complaints: Vec<ComplaintView>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub stats: Statistics,
}

/// Offline-mode data, owned entirely by this client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalData {
    pub complaints: Vec<LocalComplaint>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
}

/// A complaint held in offline mode. The supporter set is the support
/// relation itself; the count shown anywhere is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalComplaint {
    pub id: String,
    pub student_name: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub status: api_types::ComplaintStatus,
    pub images: Vec<String>,
    pub comments: Vec<CommentView>,
    pub supporters: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocalComplaint {
    pub fn to_view(&self) -> ComplaintView {
        let mut comments = self.comments.clone();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        ComplaintView {
            id: self.id.clone(),
            student_name: self.student_name.clone(),
            email: self.email.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            status: self.status,
            support_count: self.supporters.len() as i64,
            images: self.images.clone(),
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// The per-client identifier used for support toggles, generated on first
    /// use and stable afterwards.
    pub fn ensure_user_identifier(&mut self) -> String {
        if self.user_identifier.is_empty() {
            self.user_identifier = Uuid::new_v4().to_string();
        }
        self.user_identifier.clone()
    }
}

pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}
