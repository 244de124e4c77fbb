//! Agola gateway API model types and resource operations.

mod org;
mod project;
mod remote_source;
mod run;
mod user;

pub use org::*;
pub use project::*;
pub use remote_source::*;
pub use run::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Kind of owner a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    /// A user account.
    User,
    /// An organization.
    Org,
}

impl OwnerType {
    /// The path segment and wire name of this owner type.
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::User => "user",
            OwnerType::Org => "org",
        }
    }
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
