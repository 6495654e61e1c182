use serde::{Deserialize, Serialize};

/// A job-title catalog entry. Wire name of the title is `position_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    #[serde(rename = "position_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePosition {
    #[serde(rename = "position_name")]
    pub name: String,
}
