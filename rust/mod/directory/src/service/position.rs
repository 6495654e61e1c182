use filial_sql::Value;
use tracing::info;

use crate::model::{CreatePosition, Position};
use crate::service::{req_i64, req_str, DirectoryError, DirectoryService};

impl DirectoryService {
    /// All positions ordered by name.
    pub fn list_positions(&self) -> Result<Vec<Position>, DirectoryError> {
        let rows = self.sql.query(
            "SELECT id, position_name FROM positions ORDER BY position_name, id",
            &[],
        )?;
        rows.iter()
            .map(|row| {
                Ok(Position {
                    id: req_i64(row, "id")?,
                    name: req_str(row, "position_name")?.to_string(),
                })
            })
            .collect()
    }

    pub fn position_exists(&self, id: i64) -> Result<bool, DirectoryError> {
        self.exists("positions", id)
    }

    pub fn create_position(&self, input: CreatePosition) -> Result<Position, DirectoryError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DirectoryError::Validation("Position name is required".into()));
        }
        let id = self.sql.insert(
            "INSERT INTO positions (position_name) VALUES (?1)",
            &[Value::from(name)],
        )?;
        info!(position_id = id, "position created");
        Ok(Position { id, name: name.to_string() })
    }
}
