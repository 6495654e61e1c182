use std::collections::BTreeSet;

use filial_sql::{Row, Value};
use tracing::info;

use crate::model::{Branch, CreateBranch, MoveBranch};
use crate::service::{req_i64, req_str, DirectoryError, DirectoryService};

/// Closure of a branch over the parent pointers, as a recursive CTE.
/// `UNION` (not `UNION ALL`) deduplicates, so the recursion stops once a
/// pass adds no new id.
pub(crate) const BRANCH_TREE_CTE: &str = "WITH RECURSIVE branch_tree(id) AS (
        SELECT id FROM branches WHERE id = ?1
        UNION
        SELECT b.id FROM branches b
        JOIN branch_tree bt ON b.parent_id = bt.id
    )";

fn branch_from_row(row: &Row) -> Result<Branch, DirectoryError> {
    Ok(Branch {
        id: req_i64(row, "id")?,
        name: req_str(row, "branch_name")?.to_string(),
        parent_id: row.get_i64("parent_id"),
    })
}

fn validate_name(name: &str, what: &str) -> Result<String, DirectoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DirectoryError::Validation(format!("{} name is required", what)));
    }
    Ok(trimmed.to_string())
}

impl DirectoryService {
    /// All branches ordered by name.
    pub fn list_branches(&self) -> Result<Vec<Branch>, DirectoryError> {
        let rows = self.sql.query(
            "SELECT id, branch_name, parent_id FROM branches ORDER BY branch_name, id",
            &[],
        )?;
        rows.iter().map(branch_from_row).collect()
    }

    pub fn get_branch(&self, id: i64) -> Result<Branch, DirectoryError> {
        let rows = self.sql.query(
            "SELECT id, branch_name, parent_id FROM branches WHERE id = ?1",
            &[id.into()],
        )?;
        let row = rows
            .first()
            .ok_or_else(|| DirectoryError::NotFound(format!("Branch {} not found", id)))?;
        branch_from_row(row)
    }

    pub fn branch_exists(&self, id: i64) -> Result<bool, DirectoryError> {
        self.exists("branches", id)
    }

    /// Ids of `id` and all of its descendants. Unknown id yields an empty set.
    pub fn subtree_ids(&self, id: i64) -> Result<BTreeSet<i64>, DirectoryError> {
        let sql = format!("{} SELECT id FROM branch_tree", BRANCH_TREE_CTE);
        let rows = self.sql.query(&sql, &[id.into()])?;
        rows.iter().map(|r| req_i64(r, "id")).collect()
    }

    /// Create a branch under an existing parent (or at the root).
    ///
    /// A new node has no descendants, so attaching it cannot close a cycle.
    pub fn create_branch(&self, input: CreateBranch) -> Result<Branch, DirectoryError> {
        let name = validate_name(&input.name, "Branch")?;
        if let Some(pid) = input.parent_id {
            if !self.branch_exists(pid)? {
                return Err(DirectoryError::Validation(format!(
                    "Parent branch {} does not exist",
                    pid
                )));
            }
        }

        let id = self.sql.insert(
            "INSERT INTO branches (branch_name, parent_id) VALUES (?1, ?2)",
            &[Value::Text(name.clone()), input.parent_id.into()],
        )?;
        info!(branch_id = id, parent_id = ?input.parent_id, "branch created");

        Ok(Branch {
            id,
            name,
            parent_id: input.parent_id,
        })
    }

    /// Re-parent a branch. Rejects a parent inside the branch's own subtree
    /// (itself included), which would turn the forest into a cycle.
    pub fn move_branch(&self, id: i64, input: MoveBranch) -> Result<Branch, DirectoryError> {
        let mut branch = self.get_branch(id)?;

        if let Some(pid) = input.parent_id {
            if !self.branch_exists(pid)? {
                return Err(DirectoryError::Validation(format!(
                    "Parent branch {} does not exist",
                    pid
                )));
            }
            if self.subtree_ids(id)?.contains(&pid) {
                return Err(DirectoryError::Validation(format!(
                    "cycle detected: branch {} is inside the subtree of branch {}",
                    pid, id
                )));
            }
        }

        self.sql.exec(
            "UPDATE branches SET parent_id = ?1 WHERE id = ?2",
            &[input.parent_id.into(), id.into()],
        )?;
        info!(branch_id = id, parent_id = ?input.parent_id, "branch moved");

        branch.parent_id = input.parent_id;
        Ok(branch)
    }
}
