//! Resource models exchanged with the identity API

pub mod group;
pub mod user;

pub use group::{CreateGroupRequest, Group, GroupProfile};
pub use user::{CreateUserRequest, User, UserProfile, UserStatus};
