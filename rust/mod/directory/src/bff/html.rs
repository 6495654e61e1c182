//! HTML rendering of a [`PageView`].
//!
//! Plain links and forms only: every tree node links to `/?branch=ID`,
//! filters are a GET form, mutations are POST forms answered with a
//! redirect back to the same view.

use std::fmt::Write;

use crate::bff::state::ToastKind;
use crate::bff::tree::TreeNode;
use crate::bff::view::{NO_RESULTS, PageView, SelectOption, TableView};

/// Build a `/` link from query pairs, skipping empty values.
pub fn page_href(params: &[(&str, &str)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query.join("&"))
    }
}

/// Escape text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Branch directory</title>\n\
         <link rel=\"stylesheet\" href=\"/styles.css\">\n</head>\n<body>\n",
    );

    if let Some(message) = &view.load_error {
        let _ = write!(
            html,
            "<div class=\"load-error\"><h1>Failed to load data</h1><p>{}</p>\
             <p><a href=\"/\">Retry</a></p></div>\n",
            escape(message)
        );
    } else {
        html.push_str("<div class=\"container\">\n");
        render_sidebar(&mut html, view);
        html.push_str("<main class=\"content\">\n<h1>Employees</h1>\n");
        render_filters(&mut html, view);
        render_table(&mut html, view);
        render_add_form(&mut html, view);
        html.push_str("</main>\n</div>\n");
    }

    render_toasts(&mut html, view);
    html.push_str("</body>\n</html>\n");
    html
}

fn branch_value(view: &PageView) -> String {
    view.selected_branch.map(|id| id.to_string()).unwrap_or_default()
}

/// Hidden inputs that bring a form post back to the current view.
fn return_fields(html: &mut String, view: &PageView) {
    let _ = write!(
        html,
        "<input type=\"hidden\" name=\"branch\" value=\"{}\">\
         <input type=\"hidden\" name=\"search\" value=\"{}\">\
         <input type=\"hidden\" name=\"position\" value=\"{}\">",
        branch_value(view),
        escape(&view.search),
        escape(&view.position_id)
    );
}

fn render_sidebar(html: &mut String, view: &PageView) {
    html.push_str("<aside class=\"sidebar\">\n<h2>Branches</h2>\n<nav class=\"tree\">\n");
    let all = page_href(&[("search", view.search.as_str()), ("position", view.position_id.as_str())]);
    let _ = write!(
        html,
        "<a href=\"{}\" class=\"all{}\">All branches</a>\n",
        escape(&all),
        if view.selected_branch.is_none() { " active" } else { "" }
    );
    render_tree(html, &view.tree, view);
    html.push_str("</nav>\n</aside>\n");
}

fn render_tree(html: &mut String, nodes: &[TreeNode], view: &PageView) {
    if nodes.is_empty() {
        return;
    }
    html.push_str("<ul>\n");
    for node in nodes {
        let id = node.id.to_string();
        let href = page_href(&[
            ("branch", id.as_str()),
            ("search", view.search.as_str()),
            ("position", view.position_id.as_str()),
        ]);
        let _ = write!(
            html,
            "<li><a href=\"{}\" data-id=\"{}\" class=\"{}\">{}</a>",
            escape(&href),
            node.id,
            if node.active { "active" } else { "" },
            escape(&node.name)
        );
        render_tree(html, &node.children, view);
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}

fn render_options(html: &mut String, options: &[SelectOption]) {
    for o in options {
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape(&o.value),
            if o.selected { " selected" } else { "" },
            escape(&o.label)
        );
    }
}

fn render_filters(html: &mut String, view: &PageView) {
    let _ = write!(
        html,
        "<form class=\"filters\" method=\"get\" action=\"/\">\
         <input type=\"hidden\" name=\"branch\" value=\"{}\">\
         <input type=\"search\" id=\"searchInput\" name=\"search\" value=\"{}\" placeholder=\"Search by name\">\
         <select id=\"positionFilter\" name=\"position\">",
        branch_value(view),
        escape(&view.search)
    );
    render_options(html, &view.position_filter);
    html.push_str("</select><button type=\"submit\" class=\"btn\">Apply</button></form>\n");
}

fn render_table(html: &mut String, view: &PageView) {
    html.push_str(
        "<table id=\"employeesTable\">\n<thead><tr><th>Full name</th><th>Position</th>\
         <th>Branch</th><th>Salary</th><th>Hire date</th><th></th></tr></thead>\n<tbody>\n",
    );
    match &view.table {
        TableView::NoResults => {
            let _ = write!(
                html,
                "<tr><td colspan=\"6\" class=\"no-results\">{}</td></tr>\n",
                NO_RESULTS
            );
        }
        TableView::Rows(rows) => {
            for row in rows {
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>\
                     <form method=\"post\" action=\"/employees/{}/delete\" \
                     onsubmit=\"return confirm('Delete this employee?')\">",
                    escape(&row.full_name),
                    escape(&row.position_name),
                    escape(&row.branch_name),
                    escape(&row.salary),
                    escape(&row.hire_date),
                    row.id
                );
                return_fields(html, view);
                html.push_str("<button type=\"submit\" class=\"btn-delete\">Delete</button></form></td></tr>\n");
            }
        }
    }
    html.push_str("</tbody>\n</table>\n");
}

fn render_add_form(html: &mut String, view: &PageView) {
    html.push_str(
        "<details class=\"add-employee\">\n<summary class=\"btn\">Add employee</summary>\n\
         <form id=\"employeeForm\" method=\"post\" action=\"/employees\">\n",
    );
    return_fields(html, view);
    html.push_str(
        "\n<label>Full name <input type=\"text\" name=\"full_name\" required></label>\n\
         <label>Birth date <input type=\"date\" name=\"birth_date\" required></label>\n\
         <label>Position <select name=\"position_id\" required>",
    );
    render_options(html, &view.position_choices);
    html.push_str("</select></label>\n<label>Branch <select name=\"branch_id\" required>");
    render_options(html, &view.branch_choices);
    html.push_str(
        "</select></label>\n\
         <label>Salary <input type=\"number\" name=\"salary\" min=\"0\" step=\"0.01\" required></label>\n\
         <label>Hire date <input type=\"date\" name=\"hire_date\" required></label>\n\
         <button type=\"submit\" class=\"btn\">Save</button>\n</form>\n</details>\n",
    );
}

fn render_toasts(html: &mut String, view: &PageView) {
    if view.toasts.is_empty() {
        return;
    }
    html.push_str("<div class=\"toasts\">\n");
    for toast in &view.toasts {
        let kind = match toast.kind {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        };
        let _ = write!(
            html,
            "<div class=\"toast {}\" role=\"status\">{}</div>\n",
            kind,
            escape(&toast.message)
        );
    }
    html.push_str("</div>\n");
}
