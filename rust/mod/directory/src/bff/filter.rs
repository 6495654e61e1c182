//! Employee table filtering: free-text name search plus exact position.

use crate::model::EmployeeRecord;

/// Current filter inputs, in the form the controls hold them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Name substring, matched case-insensitively. Empty = no constraint.
    pub search: String,
    /// Position id as the select control's string value. Empty = any.
    pub position_id: String,
}

impl EmployeeFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.position_id.is_empty()
    }
}

/// Keep employees matching every non-empty constraint, preserving order.
pub fn filter_employees<'a>(
    employees: &'a [EmployeeRecord],
    filter: &EmployeeFilter,
) -> Vec<&'a EmployeeRecord> {
    let needle = filter.search.to_lowercase();
    employees
        .iter()
        .filter(|r| needle.is_empty() || r.employee.full_name.to_lowercase().contains(&needle))
        .filter(|r| {
            filter.position_id.is_empty()
                || r.employee.position_id.to_string() == filter.position_id
        })
        .collect()
}
