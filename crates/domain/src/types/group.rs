//! Group resource types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group profile attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A group as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Server-assigned id
    pub id: String,
    /// Provenance of the group as reported by the API (e.g. `APP_GROUP`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last profile change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Last membership change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_membership_updated: Option<DateTime<Utc>>,
    /// Profile attributes
    pub profile: GroupProfile,
}

/// Body for creating a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    /// Initial profile
    pub profile: GroupProfile,
}

impl CreateGroupRequest {
    /// Request for a group named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { profile: GroupProfile { name: name.into(), description: None } }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.profile.description = Some(description.into());
        self
    }
}
