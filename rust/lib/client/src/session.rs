use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use directory::bff::{DirectoryState, Event, PageView, RequestTicket, render};
use directory::model::NewEmployee;

use crate::DirectoryClient;

const LOAD_FAILED: &str = "Failed to load data";
const BRANCH_LOAD_FAILED: &str = "Failed to load branch employees";
const ADD_FAILED: &str = "Error adding employee";
const DELETE_FAILED: &str = "Failed to delete employee";

/// A directory UI session: remote data through [`DirectoryClient`], all
/// local knowledge in one [`DirectoryState`].
pub struct DirectorySession {
    client: DirectoryClient,
    state: DirectoryState,
}

impl DirectorySession {
    pub fn new(client: DirectoryClient) -> Self {
        Self {
            client,
            state: DirectoryState::new(),
        }
    }

    pub fn client(&self) -> &DirectoryClient {
        &self.client
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn view(&self, now: DateTime<Utc>) -> PageView {
        render(&self.state, now)
    }

    fn apply(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }

    /// Initial load: branches, positions and all employees together.
    pub async fn load(&mut self) {
        let (state, ticket) = std::mem::take(&mut self.state).begin_load();
        self.state = state;
        let result = tokio::try_join!(
            self.client.list_branches(),
            self.client.list_positions(),
            self.client.list_employees(),
        );
        let event = match result {
            Ok((branches, positions, employees)) => Event::Loaded {
                ticket,
                branches,
                positions,
                employees,
            },
            Err(e) => {
                warn!("initial load failed: {}", e);
                Event::LoadFailed(LOAD_FAILED.to_string())
            }
        };
        self.apply(event);
    }

    /// Mark `branch_id` selected and issue its request ticket without
    /// waiting for the answer.
    pub fn request_branch(&mut self, branch_id: Option<i64>) -> RequestTicket {
        let (state, ticket) = std::mem::take(&mut self.state).select_branch(branch_id);
        self.state = state;
        ticket
    }

    /// Fetch the employees a ticket asked for. The resulting event is safe
    /// to apply in any order; stale tickets are ignored by the state.
    pub async fn fetch(&self, ticket: RequestTicket, now: DateTime<Utc>) -> Event {
        let result = match ticket.branch_id {
            Some(id) => self.client.branch_employees(id).await,
            None => self.client.list_employees().await,
        };
        match result {
            Ok(employees) => Event::EmployeesLoaded { ticket, employees },
            Err(e) => {
                warn!(seq = ticket.seq, "branch employees failed: {}", e);
                Event::EmployeesFailed {
                    ticket,
                    message: BRANCH_LOAD_FAILED.to_string(),
                    at: now,
                }
            }
        }
    }

    pub fn receive(&mut self, event: Event) {
        if let Event::EmployeesLoaded { ticket, .. } = &event {
            if self.state.is_stale(*ticket) {
                debug!(seq = ticket.seq, "discarding stale employees response");
            }
        }
        self.apply(event);
    }

    pub async fn select_branch(&mut self, branch_id: Option<i64>) {
        let ticket = self.request_branch(branch_id);
        let event = self.fetch(ticket, Utc::now()).await;
        self.receive(event);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.apply(Event::SearchChanged(search.into()));
    }

    pub fn set_position(&mut self, position_id: impl Into<String>) {
        self.apply(Event::PositionChanged(position_id.into()));
    }

    /// Returns whether the server accepted the employee.
    pub async fn add_employee(&mut self, employee: &NewEmployee) -> bool {
        let at = Utc::now();
        match self.client.add_employee(employee).await {
            Ok(employee) => {
                self.apply(Event::EmployeeAdded { employee, at });
                true
            }
            Err(e) => {
                self.apply(Event::ActionFailed {
                    message: failure_message(&e, ADD_FAILED),
                    at,
                });
                false
            }
        }
    }

    /// Returns whether the employee was deleted.
    pub async fn delete_employee(&mut self, id: i64) -> bool {
        let at = Utc::now();
        match self.client.delete_employee(id).await {
            Ok(()) => {
                self.apply(Event::EmployeeDeleted { id, at });
                true
            }
            Err(e) => {
                self.apply(Event::ActionFailed {
                    message: failure_message(&e, DELETE_FAILED),
                    at,
                });
                false
            }
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.apply(Event::Tick(now));
    }
}

fn failure_message(e: &crate::ApiError, fallback: &str) -> String {
    let message = e.user_message();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
