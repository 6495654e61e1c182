//! Directory UI state.
//!
//! The whole UI is one explicit [`DirectoryState`] value. Every change is a
//! call to a consuming update method that returns the next state; nothing
//! here performs I/O or reads the clock, so hosts pass `now` in.
//!
//! Employee-list requests are tagged with a [`RequestTicket`]. A response
//! is applied only if its ticket is newer than the last one applied, so a
//! slow stale response cannot overwrite fresher data.

use chrono::{DateTime, Duration, Utc};

use crate::bff::filter::{EmployeeFilter, filter_employees};
use crate::hierarchy::BranchForest;
use crate::model::{Branch, Employee, EmployeeRecord, Position};

/// Toasts disappear this long after being raised.
pub const TOAST_TTL: Duration = Duration::seconds(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub raised_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at < TOAST_TTL
    }
}

/// Initial-load progress. A failed initial load blocks the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed(String),
}

/// Handle for one in-flight employee-list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    /// Branch whose subtree was requested; None = all employees.
    pub branch_id: Option<i64>,
}

/// Everything that can happen to the UI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Initial lists arrived.
    Loaded {
        ticket: RequestTicket,
        branches: Vec<Branch>,
        positions: Vec<Position>,
        employees: Vec<EmployeeRecord>,
    },
    LoadFailed(String),
    SearchChanged(String),
    PositionChanged(String),
    EmployeesLoaded {
        ticket: RequestTicket,
        employees: Vec<EmployeeRecord>,
    },
    EmployeesFailed {
        ticket: RequestTicket,
        message: String,
        at: DateTime<Utc>,
    },
    /// The server accepted a new employee.
    EmployeeAdded { employee: Employee, at: DateTime<Utc> },
    /// The server deleted an employee.
    EmployeeDeleted { id: i64, at: DateTime<Utc> },
    /// Any other user action failed.
    ActionFailed { message: String, at: DateTime<Utc> },
    /// An action completed somewhere the state did not see (e.g. a form
    /// post answered with a redirect).
    Notice { message: String, at: DateTime<Utc> },
    /// Drop expired toasts.
    Tick(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryState {
    pub branches: Vec<Branch>,
    pub positions: Vec<Position>,
    /// Server-scoped candidate set: the selected subtree, or everyone.
    pub employees: Vec<EmployeeRecord>,
    pub selected_branch: Option<i64>,
    pub filter: EmployeeFilter,
    pub phase: LoadPhase,
    pub toasts: Vec<Toast>,
    issued_seq: u64,
    applied_seq: u64,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            branches: Vec::new(),
            positions: Vec::new(),
            employees: Vec::new(),
            selected_branch: None,
            filter: EmployeeFilter::default(),
            phase: LoadPhase::Loading,
            toasts: Vec::new(),
            issued_seq: 0,
            applied_seq: 0,
        }
    }
}

impl DirectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, branch_id: Option<i64>) -> RequestTicket {
        self.issued_seq += 1;
        RequestTicket {
            seq: self.issued_seq,
            branch_id,
        }
    }

    /// Start the initial load (all branches, positions, employees).
    pub fn begin_load(mut self) -> (Self, RequestTicket) {
        self.phase = LoadPhase::Loading;
        let ticket = self.issue(None);
        (self, ticket)
    }

    /// Select a branch (None clears the selection) and issue the request
    /// for its employees. The selection is shown immediately.
    pub fn select_branch(mut self, branch_id: Option<i64>) -> (Self, RequestTicket) {
        self.selected_branch = branch_id;
        let ticket = self.issue(branch_id);
        (self, ticket)
    }

    /// True if a response for `ticket` must be discarded.
    pub fn is_stale(&self, ticket: RequestTicket) -> bool {
        ticket.seq <= self.applied_seq
    }

    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::Loaded {
                ticket,
                branches,
                positions,
                employees,
            } => {
                self.branches = branches;
                self.positions = positions;
                self.phase = LoadPhase::Ready;
                if !self.is_stale(ticket) {
                    self.applied_seq = ticket.seq;
                    self.employees = employees;
                }
            }
            Event::LoadFailed(message) => {
                self.phase = LoadPhase::Failed(message);
            }
            Event::SearchChanged(search) => {
                self.filter.search = search;
            }
            Event::PositionChanged(position_id) => {
                self.filter.position_id = position_id;
            }
            Event::EmployeesLoaded { ticket, employees } => {
                if !self.is_stale(ticket) {
                    self.applied_seq = ticket.seq;
                    self.employees = employees;
                }
            }
            Event::EmployeesFailed { ticket, message, at } => {
                if !self.is_stale(ticket) {
                    self.push_toast(message, ToastKind::Error, at);
                }
            }
            Event::EmployeeAdded { employee, at } => {
                if self.in_scope(employee.branch_id) {
                    let record = self.enrich(employee);
                    self.employees.push(record);
                }
                self.push_toast("Employee added successfully".into(), ToastKind::Success, at);
            }
            Event::EmployeeDeleted { id, at } => {
                self.employees.retain(|r| r.employee.id != id);
                self.push_toast("Employee deleted successfully".into(), ToastKind::Success, at);
            }
            Event::ActionFailed { message, at } => {
                self.push_toast(message, ToastKind::Error, at);
            }
            Event::Notice { message, at } => {
                self.push_toast(message, ToastKind::Success, at);
            }
            Event::Tick(now) => {
                self.toasts.retain(|t| t.is_live(now));
            }
        }
        self
    }

    /// The loaded employees narrowed by the current filter.
    pub fn visible_employees(&self) -> Vec<&EmployeeRecord> {
        filter_employees(&self.employees, &self.filter)
    }

    fn push_toast(&mut self, message: String, kind: ToastKind, at: DateTime<Utc>) {
        self.toasts.push(Toast {
            message,
            kind,
            raised_at: at,
        });
    }

    /// Whether an employee of `branch_id` belongs in the loaded list.
    fn in_scope(&self, branch_id: i64) -> bool {
        match self.selected_branch {
            None => true,
            Some(selected) => BranchForest::from_branches(&self.branches).is_within(selected, branch_id),
        }
    }

    fn enrich(&self, employee: Employee) -> EmployeeRecord {
        let position_name = self
            .positions
            .iter()
            .find(|p| p.id == employee.position_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let branch_name = self
            .branches
            .iter()
            .find(|b| b.id == employee.branch_id)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        EmployeeRecord {
            employee,
            position_name,
            branch_name,
        }
    }
}
