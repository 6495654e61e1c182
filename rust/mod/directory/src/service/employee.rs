use chrono::NaiveDate;
use filial_sql::{Row, Value};
use serde_json::Value as Json;
use tracing::{info, warn};

use crate::model::{Employee, EmployeeRecord, NewEmployee, NewEmployeeInput};
use crate::service::branch::BRANCH_TREE_CTE;
use crate::service::{req_i64, req_str, DirectoryError, DirectoryService};

const RECORD_COLUMNS: &str = "e.id, e.full_name, e.birth_date, e.position_id, e.branch_id,
        e.salary, e.hire_date, p.position_name, b.branch_name";

const RECORD_JOINS: &str = "FROM employees e
        JOIN positions p ON e.position_id = p.id
        JOIN branches b ON e.branch_id = b.id";

fn parse_stored_date(row: &Row, col: &str) -> Result<NaiveDate, DirectoryError> {
    let raw = req_str(row, col)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| DirectoryError::Internal(format!("bad {} '{}': {}", col, raw, e)))
}

fn employee_from_row(row: &Row) -> Result<Employee, DirectoryError> {
    Ok(Employee {
        id: req_i64(row, "id")?,
        full_name: req_str(row, "full_name")?.to_string(),
        birth_date: parse_stored_date(row, "birth_date")?,
        position_id: req_i64(row, "position_id")?,
        branch_id: req_i64(row, "branch_id")?,
        salary: row
            .get_f64("salary")
            .ok_or_else(|| DirectoryError::Internal("missing salary column".into()))?,
        hire_date: parse_stored_date(row, "hire_date")?,
    })
}

fn record_from_row(row: &Row) -> Result<EmployeeRecord, DirectoryError> {
    Ok(EmployeeRecord {
        employee: employee_from_row(row)?,
        position_name: req_str(row, "position_name")?.to_string(),
        branch_name: req_str(row, "branch_name")?.to_string(),
    })
}

// ── Input validation ──

/// JavaScript truthiness: `null`, `false`, `0`, `""` (and absent fields,
/// which deserialize to `null`) are falsy. A zero salary is therefore
/// "missing", not "non-negative".
fn is_truthy(v: &Json) -> bool {
    match v {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}

/// Ids arrive as numbers or as the string value of a `<select>`.
fn coerce_id(v: &Json) -> Option<i64> {
    match v {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_date(v: &Json, field: &str) -> Result<NaiveDate, DirectoryError> {
    v.as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| DirectoryError::Validation(format!("Invalid {}: expected YYYY-MM-DD", field)))
}

fn coerce_salary(v: &Json) -> Result<f64, DirectoryError> {
    let salary = match v {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
    .ok_or_else(|| DirectoryError::Validation("Invalid salary: expected a number".into()))?;

    if salary < 0.0 {
        return Err(DirectoryError::Validation("Salary must not be negative".into()));
    }
    Ok(salary)
}

/// Check presence of all six fields, then their shapes. Referential checks
/// happen separately against the store.
pub fn validate_new_employee(input: &NewEmployeeInput) -> Result<NewEmployee, DirectoryError> {
    let fields = [
        &input.full_name,
        &input.birth_date,
        &input.position_id,
        &input.branch_id,
        &input.salary,
        &input.hire_date,
    ];
    if !fields.iter().all(|v| is_truthy(v)) {
        return Err(DirectoryError::Validation("All fields are required".into()));
    }

    let full_name = input
        .full_name
        .as_str()
        .ok_or_else(|| DirectoryError::Validation("Invalid full_name: expected a string".into()))?
        .to_string();

    let (Some(position_id), Some(branch_id)) =
        (coerce_id(&input.position_id), coerce_id(&input.branch_id))
    else {
        return Err(DirectoryError::Validation("Invalid position or branch".into()));
    };

    Ok(NewEmployee {
        full_name,
        birth_date: coerce_date(&input.birth_date, "birth_date")?,
        position_id,
        branch_id,
        salary: coerce_salary(&input.salary)?,
        hire_date: coerce_date(&input.hire_date, "hire_date")?,
    })
}

impl DirectoryService {
    /// All employees with position and branch names, ordered by full name.
    pub fn list_employees(&self) -> Result<Vec<EmployeeRecord>, DirectoryError> {
        let sql = format!(
            "SELECT {} {} ORDER BY e.full_name, e.id",
            RECORD_COLUMNS, RECORD_JOINS
        );
        let rows = self.sql.query(&sql, &[])?;
        rows.iter().map(record_from_row).collect()
    }

    /// Employees of `branch_id` and of every branch below it, ordered by
    /// full name. Unknown branch yields an empty list.
    pub fn employees_under_branch(&self, branch_id: i64) -> Result<Vec<EmployeeRecord>, DirectoryError> {
        let sql = format!(
            "{} SELECT {} {}
            WHERE e.branch_id IN (SELECT id FROM branch_tree)
            ORDER BY e.full_name, e.id",
            BRANCH_TREE_CTE, RECORD_COLUMNS, RECORD_JOINS
        );
        let rows = self.sql.query(&sql, &[branch_id.into()])?;
        rows.iter().map(record_from_row).collect()
    }

    pub fn get_employee(&self, id: i64) -> Result<Employee, DirectoryError> {
        let rows = self.sql.query(
            "SELECT id, full_name, birth_date, position_id, branch_id, salary, hire_date
             FROM employees WHERE id = ?1",
            &[id.into()],
        )?;
        let row = rows
            .first()
            .ok_or_else(|| DirectoryError::NotFound("Employee not found".into()))?;
        employee_from_row(row)
    }

    /// Validate, check that the position and branch exist, then insert.
    pub fn add_employee(&self, input: &NewEmployeeInput) -> Result<Employee, DirectoryError> {
        let new = validate_new_employee(input).inspect_err(|e| {
            warn!("employee rejected: {}", e);
        })?;

        let position_ok = self.position_exists(new.position_id)?;
        let branch_ok = self.branch_exists(new.branch_id)?;
        if !position_ok || !branch_ok {
            warn!(
                position_id = new.position_id,
                branch_id = new.branch_id,
                "employee rejected: unknown position or branch"
            );
            return Err(DirectoryError::Validation("Invalid position or branch".into()));
        }

        let id = self.sql.insert(
            "INSERT INTO employees
                (full_name, birth_date, position_id, branch_id, salary, hire_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            &[
                Value::Text(new.full_name.clone()),
                Value::Text(new.birth_date.format("%Y-%m-%d").to_string()),
                new.position_id.into(),
                new.branch_id.into(),
                new.salary.into(),
                Value::Text(new.hire_date.format("%Y-%m-%d").to_string()),
            ],
        )?;
        info!(employee_id = id, branch_id = new.branch_id, "employee added");

        Ok(new.into_employee(id))
    }

    pub fn delete_employee(&self, id: i64) -> Result<(), DirectoryError> {
        let affected = self
            .sql
            .exec("DELETE FROM employees WHERE id = ?1", &[id.into()])?;
        if affected == 0 {
            return Err(DirectoryError::NotFound("Employee not found".into()));
        }
        info!(employee_id = id, "employee deleted");
        Ok(())
    }
}
