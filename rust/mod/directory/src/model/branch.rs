use serde::{Deserialize, Serialize};

/// A node of the organizational hierarchy.
///
/// Branches form a forest via `parent_id`. On the wire the display name is
/// `branch_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,

    #[serde(rename = "branch_name")]
    pub name: String,

    /// Parent branch id (None = root).
    pub parent_id: Option<i64>,
}

/// Input for creating a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBranch {
    #[serde(rename = "branch_name")]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Input for re-parenting a branch. A missing or null `parent_id` moves
/// the branch to the root level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveBranch {
    #[serde(default)]
    pub parent_id: Option<i64>,
}
