//! Declarative page view: a pure function of [`DirectoryState`].

use chrono::{DateTime, NaiveDate, Utc};

use crate::bff::state::{DirectoryState, LoadPhase, ToastKind};
use crate::bff::tree::{TreeNode, build_tree};
use crate::model::EmployeeRecord;

/// Label of the position filter's catch-all option.
pub const ALL_POSITIONS: &str = "All positions";

/// Placeholder shown when the filtered table is empty.
pub const NO_RESULTS: &str = "No data to display";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: i64,
    pub full_name: String,
    pub position_name: String,
    pub branch_name: String,
    pub salary: String,
    pub hire_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Rows(Vec<EmployeeRow>),
    /// Nothing survived the filters.
    NoResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub tree: Vec<TreeNode>,
    pub selected_branch: Option<i64>,
    pub search: String,
    pub position_id: String,
    /// Filter select, led by the "All positions" option.
    pub position_filter: Vec<SelectOption>,
    /// Add-employee form selects.
    pub position_choices: Vec<SelectOption>,
    pub branch_choices: Vec<SelectOption>,
    pub table: TableView,
    /// Live toasts only.
    pub toasts: Vec<ToastView>,
    /// Blocking initial-load failure.
    pub load_error: Option<String>,
    pub loading: bool,
}

pub fn render(state: &DirectoryState, now: DateTime<Utc>) -> PageView {
    let position_filter = std::iter::once(SelectOption {
        value: String::new(),
        label: ALL_POSITIONS.to_string(),
        selected: state.filter.position_id.is_empty(),
    })
    .chain(state.positions.iter().map(|p| {
        let value = p.id.to_string();
        SelectOption {
            selected: value == state.filter.position_id,
            value,
            label: p.name.clone(),
        }
    }))
    .collect();

    let position_choices = state
        .positions
        .iter()
        .map(|p| SelectOption {
            value: p.id.to_string(),
            label: p.name.clone(),
            selected: false,
        })
        .collect();

    // Preselect the branch being viewed so added employees land in scope.
    let branch_choices = state
        .branches
        .iter()
        .map(|b| SelectOption {
            value: b.id.to_string(),
            label: b.name.clone(),
            selected: Some(b.id) == state.selected_branch,
        })
        .collect();

    let visible = state.visible_employees();
    let table = if visible.is_empty() {
        TableView::NoResults
    } else {
        TableView::Rows(visible.into_iter().map(employee_row).collect())
    };

    let load_error = match &state.phase {
        LoadPhase::Failed(message) => Some(message.clone()),
        _ => None,
    };

    PageView {
        tree: build_tree(&state.branches, None, state.selected_branch),
        selected_branch: state.selected_branch,
        search: state.filter.search.clone(),
        position_id: state.filter.position_id.clone(),
        position_filter,
        position_choices,
        branch_choices,
        table,
        toasts: state
            .toasts
            .iter()
            .filter(|t| t.is_live(now))
            .map(|t| ToastView {
                message: t.message.clone(),
                kind: t.kind,
            })
            .collect(),
        load_error,
        loading: state.phase == LoadPhase::Loading,
    }
}

fn employee_row(r: &EmployeeRecord) -> EmployeeRow {
    EmployeeRow {
        id: r.employee.id,
        full_name: r.employee.full_name.clone(),
        position_name: r.position_name.clone(),
        branch_name: r.branch_name.clone(),
        salary: format_salary(r.employee.salary),
        hire_date: format_date(r.employee.hire_date),
    }
}

/// Russian-locale money: non-breaking-space thousands groups, comma
/// decimal separator, at most three fraction digits, trailing " ₽".
pub fn format_salary(amount: f64) -> String {
    let fixed = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(*c);
    }

    let negative = amount < 0.0 && (int_part != "0" || !frac.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push(',');
        out.push_str(frac);
    }
    out.push_str(" ₽");
    out
}

/// `DD.MM.YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::bff::state::fixtures::*;
    use crate::bff::state::Event;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn ready() -> DirectoryState {
        let (state, ticket) = DirectoryState::new().begin_load();
        state.apply(Event::Loaded {
            ticket,
            branches: branches(),
            positions: positions(),
            employees: vec![record(1, "Abramov", 1, 3), record(2, "Belova", 2, 4)],
        })
    }

    #[test]
    fn salary_formatting() {
        assert_eq!(format_salary(125000.0), "125\u{a0}000 ₽");
        assert_eq!(format_salary(1234567.5), "1\u{a0}234\u{a0}567,5 ₽");
        assert_eq!(format_salary(999.0), "999 ₽");
        assert_eq!(format_salary(1000.125), "1\u{a0}000,125 ₽");
        assert_eq!(format_salary(0.4), "0,4 ₽");
    }

    #[test]
    fn date_formatting() {
        let d = NaiveDate::from_ymd_opt(2015, 9, 1).unwrap();
        assert_eq!(format_date(d), "01.09.2015");
    }

    #[test]
    fn view_reflects_state() {
        let (state, _) = ready().select_branch(Some(2));
        let state = state.apply(Event::PositionChanged("2".into()));
        let view = render(&state, t0());

        assert_eq!(view.tree.len(), 1);
        assert_eq!(view.tree[0].name, "HQ");
        assert!(view.tree[0].children.iter().any(|n| n.id == 2 && n.active));

        assert_eq!(view.position_filter[0].label, ALL_POSITIONS);
        assert!(!view.position_filter[0].selected);
        assert!(view.position_filter.iter().any(|o| o.value == "2" && o.selected));
        assert_eq!(view.position_choices.len(), 2);
        assert!(view.branch_choices.iter().any(|o| o.value == "2" && o.selected));

        match &view.table {
            TableView::Rows(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].full_name, "Belova");
                assert_eq!(rows[0].branch_name, "Support");
                assert_eq!(rows[0].salary, "125\u{a0}000 ₽");
                assert_eq!(rows[0].hire_date, "01.09.2015");
            }
            TableView::NoResults => panic!("expected rows"),
        }
    }

    #[test]
    fn unmatched_search_renders_placeholder() {
        let state = ready().apply(Event::SearchChanged("zzz".into()));
        assert_eq!(render(&state, t0()).table, TableView::NoResults);
    }

    #[test]
    fn load_phases() {
        let (loading, _) = DirectoryState::new().begin_load();
        assert!(render(&loading, t0()).loading);

        let failed = loading.apply(Event::LoadFailed("Failed to load data".into()));
        let view = render(&failed, t0());
        assert!(!view.loading);
        assert_eq!(view.load_error.as_deref(), Some("Failed to load data"));
    }

    #[test]
    fn expired_toasts_are_hidden() {
        let state = ready().apply(Event::ActionFailed { message: "boom".into(), at: t0() });
        assert_eq!(render(&state, t0() + Duration::seconds(1)).toasts.len(), 1);
        assert!(render(&state, t0() + Duration::seconds(4)).toasts.is_empty());
    }
}
