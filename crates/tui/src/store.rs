//! Where the client's data comes from.
//!
//! [`ComplaintStore`] is the one seam the app talks through. The remote store
//! forwards every operation to the server; the local store runs the same
//! lifecycle rules in process for offline use, so both modes behave
//! identically from the UI's point of view.

use chrono::Utc;
use uuid::Uuid;

use api_types::{
    ComplaintStatus,
    comment::{CommentNew, CommentView},
    complaint::{ComplaintNew, ComplaintView},
    stats::Statistics,
    support::SupportState,
};
use engine::{ANONYMOUS_NAME, COMMENT_MAX_LEN};

use crate::{
    client::{Client, ClientError},
    local_state::{LocalComplaint, LocalData},
};

/// One coherent view of everything the UI renders.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub complaints: Vec<ComplaintView>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub stats: Statistics,
}

pub trait ComplaintStore {
    async fn snapshot(&mut self) -> Result<Snapshot, ClientError>;
    async fn submit(&mut self, draft: ComplaintNew) -> Result<String, ClientError>;
    async fn toggle_support(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<SupportState, ClientError>;
    async fn has_supported(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<bool, ClientError>;
    async fn add_comment(
        &mut self,
        complaint_id: &str,
        payload: CommentNew,
    ) -> Result<String, ClientError>;
}

pub enum Store {
    Remote(RemoteStore),
    Local(LocalStore),
}

impl Store {
    pub async fn snapshot(&mut self) -> Result<Snapshot, ClientError> {
        match self {
            Self::Remote(store) => store.snapshot().await,
            Self::Local(store) => store.snapshot().await,
        }
    }

    pub async fn submit(&mut self, draft: ComplaintNew) -> Result<String, ClientError> {
        match self {
            Self::Remote(store) => store.submit(draft).await,
            Self::Local(store) => store.submit(draft).await,
        }
    }

    pub async fn toggle_support(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<SupportState, ClientError> {
        match self {
            Self::Remote(store) => store.toggle_support(complaint_id, user_identifier).await,
            Self::Local(store) => store.toggle_support(complaint_id, user_identifier).await,
        }
    }

    pub async fn has_supported(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<bool, ClientError> {
        match self {
            Self::Remote(store) => store.has_supported(complaint_id, user_identifier).await,
            Self::Local(store) => store.has_supported(complaint_id, user_identifier).await,
        }
    }

    pub async fn add_comment(
        &mut self,
        complaint_id: &str,
        payload: CommentNew,
    ) -> Result<String, ClientError> {
        match self {
            Self::Remote(store) => store.add_comment(complaint_id, payload).await,
            Self::Local(store) => store.add_comment(complaint_id, payload).await,
        }
    }

    /// Offline data to persist, when this store owns any.
    pub fn local_data(&self) -> Option<&LocalData> {
        match self {
            Self::Remote(_) => None,
            Self::Local(store) => Some(&store.data),
        }
    }
}

pub struct RemoteStore {
    client: Client,
}

impl RemoteStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ComplaintStore for RemoteStore {
    async fn snapshot(&mut self) -> Result<Snapshot, ClientError> {
        let complaints = self.client.complaints().await?;
        let categories = self.client.categories().await?;
        let locations = self.client.locations().await?;
        let stats = self.client.stats().await?;

        Ok(Snapshot {
            complaints,
            categories,
            locations,
            stats,
        })
    }

    async fn submit(&mut self, draft: ComplaintNew) -> Result<String, ClientError> {
        self.client.submit_complaint(&draft).await
    }

    async fn toggle_support(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<SupportState, ClientError> {
        self.client.toggle_support(complaint_id, user_identifier).await
    }

    async fn has_supported(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<bool, ClientError> {
        self.client.has_supported(complaint_id, user_identifier).await
    }

    async fn add_comment(
        &mut self,
        complaint_id: &str,
        payload: CommentNew,
    ) -> Result<String, ClientError> {
        self.client.add_comment(complaint_id, &payload).await
    }
}

// Client-side copy of the registries the server seeds on first migration.
const DEFAULT_CATEGORIES: [&str; 5] = ["Campus", "Hostel", "Roadways", "Transport/Bus", "Others"];

const DEFAULT_LOCATIONS: [&str; 14] = [
    "Main Campus",
    "Hostel A",
    "Hostel B",
    "Hostel C",
    "Block A",
    "Block B",
    "Block C",
    "Library",
    "Cafeteria",
    "Sports Complex",
    "Auditorium",
    "Parking Area",
    "Main Gate",
    "Administrative Block",
];

pub struct LocalStore {
    data: LocalData,
}

impl LocalStore {
    /// Wrap previously persisted offline data, seeding the registries when
    /// they are still empty.
    pub fn new(mut data: LocalData) -> Self {
        if data.categories.is_empty() {
            data.categories = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();
        }
        if data.locations.is_empty() {
            data.locations = DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect();
        }
        Self { data }
    }

    fn find_mut(&mut self, complaint_id: &str) -> Result<&mut LocalComplaint, ClientError> {
        self.data
            .complaints
            .iter_mut()
            .find(|complaint| complaint.id == complaint_id)
            .ok_or(ClientError::NotFound)
    }
}

fn required(value: &str, label: &str) -> Result<String, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ComplaintStore for LocalStore {
    async fn snapshot(&mut self) -> Result<Snapshot, ClientError> {
        let mut complaints: Vec<ComplaintView> = self
            .data
            .complaints
            .iter()
            .map(LocalComplaint::to_view)
            .collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut categories = self.data.categories.clone();
        categories.sort();
        let mut locations = self.data.locations.clone();
        locations.sort();

        let mut stats = Statistics::default();
        for name in &categories {
            stats.by_category.insert(name.clone(), 0);
        }
        for name in &locations {
            stats.by_location.insert(name.clone(), 0);
        }
        for complaint in &complaints {
            stats.total += 1;
            match complaint.status {
                ComplaintStatus::Pending => stats.pending += 1,
                ComplaintStatus::Resolved => stats.resolved += 1,
            }
            if let Some(slot) = stats.by_category.get_mut(&complaint.category) {
                *slot += 1;
            }
            if let Some(location) = &complaint.location {
                if let Some(slot) = stats.by_location.get_mut(location) {
                    *slot += 1;
                }
            }
        }

        Ok(Snapshot {
            complaints,
            categories,
            locations,
            stats,
        })
    }

    async fn submit(&mut self, draft: ComplaintNew) -> Result<String, ClientError> {
        let title = required(&draft.title, "title")?;
        let description = required(&draft.description, "description")?;
        let category = required(&draft.category, "category")?;
        if !self.data.categories.contains(&category) {
            return Err(ClientError::Validation(format!(
                "unknown category: {category}"
            )));
        }
        let location = optional(draft.location);
        if let Some(location) = &location {
            if !self.data.locations.contains(location) {
                return Err(ClientError::Validation(format!(
                    "unknown location: {location}"
                )));
            }
        }

        let now = Utc::now();
        let complaint = LocalComplaint {
            id: Uuid::new_v4().to_string(),
            student_name: optional(draft.student_name),
            email: optional(draft.email),
            title,
            description,
            category,
            location,
            status: ComplaintStatus::Pending,
            images: draft.images,
            comments: Vec::new(),
            supporters: Default::default(),
            created_at: now,
            updated_at: now,
        };
        let id = complaint.id.clone();
        self.data.complaints.push(complaint);
        Ok(id)
    }

    async fn toggle_support(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<SupportState, ClientError> {
        let user_identifier = required(user_identifier, "user identifier")?;
        let complaint = self.find_mut(complaint_id)?;

        let supported = if complaint.supporters.remove(&user_identifier) {
            false
        } else {
            complaint.supporters.insert(user_identifier);
            true
        };

        Ok(SupportState {
            supported,
            support_count: complaint.supporters.len() as i64,
        })
    }

    async fn has_supported(
        &mut self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> Result<bool, ClientError> {
        Ok(self
            .data
            .complaints
            .iter()
            .find(|complaint| complaint.id == complaint_id)
            .is_some_and(|complaint| complaint.supporters.contains(user_identifier)))
    }

    async fn add_comment(
        &mut self,
        complaint_id: &str,
        payload: CommentNew,
    ) -> Result<String, ClientError> {
        let text = required(&payload.text, "comment text")?;
        if text.chars().count() > COMMENT_MAX_LEN {
            return Err(ClientError::Validation(format!(
                "comment text exceeds {COMMENT_MAX_LEN} characters"
            )));
        }
        let name = optional(payload.name).unwrap_or_else(|| ANONYMOUS_NAME.to_string());

        let complaint = self.find_mut(complaint_id)?;
        let comment = CommentView {
            id: Uuid::new_v4().to_string(),
            name,
            text,
            created_at: Utc::now(),
        };
        let id = comment.id.clone();
        complaint.comments.push(comment);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, category: &str) -> ComplaintNew {
        ComplaintNew {
            student_name: None,
            email: None,
            title: title.to_string(),
            description: "something broke".to_string(),
            category: category.to_string(),
            location: None,
            images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn local_store_seeds_registries() {
        let mut store = LocalStore::new(LocalData::default());
        let snapshot = store.snapshot().await.unwrap();
        assert!(snapshot.categories.contains(&"Campus".to_string()));
        assert_eq!(snapshot.locations.len(), 14);
        assert_eq!(snapshot.stats.by_category.get("Campus"), Some(&0));
    }

    #[tokio::test]
    async fn local_submit_validates_and_lists_newest_first() {
        let mut store = LocalStore::new(LocalData::default());

        let err = store.submit(draft("   ", "Campus")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = store.submit(draft("Pothole", "Quidditch")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let first = store.submit(draft("First", "Campus")).await.unwrap();
        let second = store.submit(draft("Second", "Hostel")).await.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.complaints.len(), 2);
        assert_eq!(snapshot.complaints[0].id, second);
        assert_eq!(snapshot.complaints[1].id, first);
        assert_eq!(snapshot.stats.total, 2);
        assert_eq!(snapshot.stats.pending, 2);
        assert_eq!(snapshot.stats.by_category.get("Campus"), Some(&1));
        assert_eq!(snapshot.stats.by_category.get("Others"), Some(&0));
    }

    #[tokio::test]
    async fn local_toggle_round_trips_and_derives_count() {
        let mut store = LocalStore::new(LocalData::default());
        let id = store.submit(draft("Pothole", "Roadways")).await.unwrap();

        let state = store.toggle_support(&id, "device-1").await.unwrap();
        assert!(state.supported);
        assert_eq!(state.support_count, 1);
        assert!(store.has_supported(&id, "device-1").await.unwrap());

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.complaints[0].support_count, 1);

        let state = store.toggle_support(&id, "device-1").await.unwrap();
        assert!(!state.supported);
        assert_eq!(state.support_count, 0);
        assert!(!store.has_supported(&id, "device-1").await.unwrap());

        let err = store
            .toggle_support("no-such-id", "device-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[tokio::test]
    async fn local_comments_follow_the_engine_contract() {
        let mut store = LocalStore::new(LocalData::default());
        let id = store.submit(draft("Pothole", "Roadways")).await.unwrap();

        let err = store
            .add_comment(
                &id,
                CommentNew {
                    name: None,
                    text: "   ".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        store
            .add_comment(
                &id,
                CommentNew {
                    name: Some("  ".to_string()),
                    text: "me too".to_string(),
                },
            )
            .await
            .unwrap();

        let snapshot = store.snapshot().await.unwrap();
        let comments = &snapshot.complaints[0].comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].name, "Anonymous");
    }
}
