use filial_sql::SQLStore;

use crate::service::DirectoryError;

/// Initialize the SQLite schema for branches, positions and employees.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), DirectoryError> {
    let statements = [
        // Branches: parent-pointer forest.
        "CREATE TABLE IF NOT EXISTS branches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            branch_name TEXT NOT NULL,
            parent_id INTEGER REFERENCES branches(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_branches_parent ON branches(parent_id)",
        "CREATE INDEX IF NOT EXISTS idx_branches_name ON branches(branch_name)",

        // Positions: flat catalog.
        "CREATE TABLE IF NOT EXISTS positions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            position_name TEXT NOT NULL
        )",

        // Employees: dates are ISO-8601 TEXT (YYYY-MM-DD).
        "CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            position_id INTEGER NOT NULL REFERENCES positions(id),
            branch_id INTEGER NOT NULL REFERENCES branches(id),
            salary REAL NOT NULL CHECK (salary >= 0),
            hire_date TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_employees_branch ON employees(branch_id)",
        "CREATE INDEX IF NOT EXISTS idx_employees_name ON employees(full_name)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])?;
    }

    Ok(())
}
