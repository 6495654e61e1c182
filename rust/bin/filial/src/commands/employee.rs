//! `add-employee` and `delete-employee`.

use anyhow::Result;
use tracing::{debug, warn};

use directory::model::NewEmployee;
use filial_client::{DirectoryClient, DirectorySession};

fn last_toast(session: &DirectorySession) -> String {
    session
        .state()
        .toasts
        .last()
        .map(|t| t.message.clone())
        .unwrap_or_default()
}

pub async fn add(client: DirectoryClient, employee: &NewEmployee, json: bool) -> Result<()> {
    debug!(branch_id = employee.branch_id, position_id = employee.position_id, "adding employee");
    let mut session = DirectorySession::new(client);
    if !session.add_employee(employee).await {
        warn!("add-employee rejected");
        anyhow::bail!("{}", last_toast(&session));
    }
    match session.state().employees.last() {
        Some(record) if json => println!("{}", serde_json::to_string_pretty(&record.employee)?),
        Some(record) => println!("{} (employee #{})", last_toast(&session), record.employee.id),
        None => println!("{}", last_toast(&session)),
    }
    Ok(())
}

pub async fn delete(client: DirectoryClient, id: i64) -> Result<()> {
    debug!(id, "deleting employee");
    let mut session = DirectorySession::new(client);
    if !session.delete_employee(id).await {
        warn!(id, "delete-employee rejected");
        anyhow::bail!("{}", last_toast(&session));
    }
    println!("{}", last_toast(&session));
    Ok(())
}
