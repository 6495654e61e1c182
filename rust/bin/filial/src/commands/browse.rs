//! Read-only views: `tree`, `employees`, `positions`.
//!
//! These run a [`DirectorySession`] and print its page view, so the CLI
//! shows exactly what the HTML page would.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, warn};

use directory::bff::view::{EmployeeRow, PageView, SelectOption};
use directory::bff::{LoadPhase, TableView, TreeNode};
use filial_client::{DirectoryClient, DirectorySession};

async fn open(client: DirectoryClient) -> Result<DirectorySession> {
    debug!(server = client.base_url(), "loading directory");
    let mut session = DirectorySession::new(client);
    session.load().await;
    if let LoadPhase::Failed(message) = &session.state().phase {
        warn!("initial load failed: {}", message);
        anyhow::bail!("{} ({})", message, session.client().base_url());
    }
    Ok(session)
}

pub async fn tree(client: DirectoryClient, json: bool) -> Result<()> {
    let session = open(client).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session.state().branches)?);
        return Ok(());
    }
    print!("{}", render_tree(&session.view(Utc::now()).tree));
    Ok(())
}

pub async fn employees(
    client: DirectoryClient,
    branch: Option<i64>,
    search: String,
    position: String,
    json: bool,
) -> Result<()> {
    let mut session = open(client).await?;
    if branch.is_some() {
        debug!(?branch, "selecting branch");
        session.select_branch(branch).await;
    }
    session.set_search(search);
    session.set_position(position);

    let view = session.view(Utc::now());
    report_toasts(&view)?;
    if json {
        let visible = session.state().visible_employees();
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }
    print!("{}", render_table(&view.table));
    Ok(())
}

pub async fn positions(client: DirectoryClient, json: bool) -> Result<()> {
    let session = open(client).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session.state().positions)?);
        return Ok(());
    }
    print!("{}", render_options(&session.view(Utc::now()).position_choices));
    Ok(())
}

/// Error toasts mean the command did not do what was asked.
fn report_toasts(view: &PageView) -> Result<()> {
    match view
        .toasts
        .iter()
        .find(|t| t.kind == directory::bff::ToastKind::Error)
    {
        Some(t) => anyhow::bail!("{}", t.message),
        None => Ok(()),
    }
}

/// Indented outline, two spaces per level; `*` marks the selection.
pub fn render_tree(nodes: &[TreeNode]) -> String {
    fn walk(out: &mut String, nodes: &[TreeNode], depth: usize) {
        for n in nodes {
            let mark = if n.active { "*" } else { " " };
            out.push_str(&format!("{}{} {} (#{})\n", "  ".repeat(depth), mark, n.name, n.id));
            walk(out, &n.children, depth + 1);
        }
    }
    let mut out = String::new();
    walk(&mut out, nodes, 0);
    out
}

pub fn render_options(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| format!("{:>4}  {}\n", o.value, o.label))
        .collect()
}

const HEADERS: [&str; 6] = ["ID", "Full name", "Position", "Branch", "Salary", "Hire date"];

fn cells(row: &EmployeeRow) -> [String; 6] {
    [
        row.id.to_string(),
        row.full_name.clone(),
        row.position_name.clone(),
        row.branch_name.clone(),
        row.salary.clone(),
        row.hire_date.clone(),
    ]
}

/// Column-aligned table, or the placeholder line when nothing matches.
pub fn render_table(table: &TableView) -> String {
    let rows = match table {
        TableView::NoResults => return format!("{}\n", directory::bff::view::NO_RESULTS),
        TableView::Rows(rows) => rows.iter().map(cells).collect::<Vec<_>>(),
    };

    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, c) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(c.chars().count());
        }
    }

    let line = |cols: &[String]| -> String {
        let padded: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{}{}", c, " ".repeat(w - c.chars().count())))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&HEADERS.map(String::from));
    for r in &rows {
        out.push_str(&line(r));
    }
    out
}
