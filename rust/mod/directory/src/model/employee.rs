use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An employee as stored: assigned to one branch and one position.
///
/// Employees are created and deleted, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    /// Serialized as `YYYY-MM-DD`.
    pub birth_date: NaiveDate,
    pub position_id: i64,
    pub branch_id: i64,
    pub salary: f64,
    pub hire_date: NaiveDate,
}

/// Read model: an employee joined with its position and branch names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(flatten)]
    pub employee: Employee,
    pub position_name: String,
    pub branch_name: String,
}

/// Raw body of `POST /api/employees`.
///
/// Fields stay untyped JSON so the service can apply the "all fields
/// required" truthiness rule exactly (`0`, `""`, `false` and `null` all
/// count as missing) before coercing ids that arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEmployeeInput {
    #[serde(default)]
    pub full_name: serde_json::Value,
    #[serde(default)]
    pub birth_date: serde_json::Value,
    #[serde(default)]
    pub position_id: serde_json::Value,
    #[serde(default)]
    pub branch_id: serde_json::Value,
    #[serde(default)]
    pub salary: serde_json::Value,
    #[serde(default)]
    pub hire_date: serde_json::Value,
}

/// A validated, typed employee ready for insertion. Also what clients send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub position_id: i64,
    pub branch_id: i64,
    pub salary: f64,
    pub hire_date: NaiveDate,
}

impl NewEmployee {
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            full_name: self.full_name,
            birth_date: self.birth_date,
            position_id: self.position_id,
            branch_id: self.branch_id,
            salary: self.salary,
            hire_date: self.hire_date,
        }
    }
}
