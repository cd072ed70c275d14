//! User resource types
//!
//! Mirrors the user representation of the identity API. Unknown profile
//! attributes are kept in `extra` so custom schemas survive a round trip.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Created but not activated
    Staged,
    /// Activated, waiting for the user to set credentials
    Provisioned,
    /// Active
    Active,
    /// Password reset in progress
    Recovery,
    /// Password must be changed at next login
    PasswordExpired,
    /// Locked after failed logins
    LockedOut,
    /// Suspended by an administrator
    Suspended,
    /// Deactivated
    Deprovisioned,
    /// Status not known to this client
    #[serde(other)]
    Unknown,
}

/// User profile attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Primary email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unique login, usually an email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Mobile phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    /// Custom profile attributes
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A user as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned id
    pub id: String,
    /// Lifecycle status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Activation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated: Option<DateTime<Utc>>,
    /// Last successful login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Last profile change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Profile attributes
    #[serde(default)]
    pub profile: UserProfile,
}

/// Body for creating a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Initial profile
    pub profile: UserProfile,
    /// Groups to add the user to on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_ids: Option<Vec<String>>,
}
