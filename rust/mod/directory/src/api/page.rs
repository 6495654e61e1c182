//! Server-rendered directory page and its form posts.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::{error, warn};

use filial_core::{ServiceError, parse_id};

use crate::api::AppState;
use crate::bff::html::{page_href, render_page};
use crate::bff::state::{DirectoryState, Event};
use crate::bff::view::render;
use crate::model::NewEmployeeInput;
use crate::service::DirectoryService;

const LOAD_FAILED: &str = "Failed to load data";
const BRANCH_LOAD_FAILED: &str = "Failed to load branch employees";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/employees", post(add_employee))
        .route("/employees/{id}/delete", post(delete_employee))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    branch: String,
    search: String,
    position: String,
    notice: String,
    error: String,
}

async fn index(State(svc): State<AppState>, Query(q): Query<PageQuery>) -> (StatusCode, Html<String>) {
    let now = Utc::now();
    let (status, state) = page_state(&svc, &q, now);
    (status, Html(render_page(&render(&state, now))))
}

/// Drive a fresh [`DirectoryState`] through the same events a browser
/// session would see: initial load, filters, branch selection, toasts.
fn page_state(svc: &DirectoryService, q: &PageQuery, now: DateTime<Utc>) -> (StatusCode, DirectoryState) {
    let (state, ticket) = DirectoryState::new().begin_load();
    let lists = svc
        .list_branches()
        .and_then(|branches| Ok((branches, svc.list_positions()?, svc.list_employees()?)));
    let mut state = match lists {
        Ok((branches, positions, employees)) => state.apply(Event::Loaded {
            ticket,
            branches,
            positions,
            employees,
        }),
        Err(e) => {
            error!("directory page load failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                state.apply(Event::LoadFailed(LOAD_FAILED.to_string())),
            );
        }
    };

    state = state
        .apply(Event::SearchChanged(q.search.clone()))
        .apply(Event::PositionChanged(q.position.clone()));

    if !q.branch.is_empty() {
        match parse_id(&q.branch, "branch") {
            Ok(id) => {
                let (next, ticket) = state.select_branch(Some(id));
                state = match svc.employees_under_branch(id) {
                    Ok(employees) => next.apply(Event::EmployeesLoaded { ticket, employees }),
                    Err(e) => {
                        error!(branch_id = id, "branch employees load failed: {}", e);
                        next.apply(Event::EmployeesFailed {
                            ticket,
                            message: BRANCH_LOAD_FAILED.to_string(),
                            at: now,
                        })
                    }
                };
            }
            Err(e) => {
                state = state.apply(Event::ActionFailed {
                    message: e.public_message(),
                    at: now,
                });
            }
        }
    }

    if let Some(notice) = Notice::from_code(&q.notice) {
        state = state.apply(Event::Notice {
            message: notice.message().to_string(),
            at: now,
        });
    }
    if !q.error.is_empty() {
        state = state.apply(Event::ActionFailed {
            message: q.error.clone(),
            at: now,
        });
    }
    (StatusCode::OK, state)
}

/// Outcome of a successful form post. Only the code travels in the
/// redirect, so a link cannot put arbitrary text in a success toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Added,
    Deleted,
}

impl Notice {
    fn code(self) -> &'static str {
        match self {
            Notice::Added => "added",
            Notice::Deleted => "deleted",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "added" => Some(Notice::Added),
            "deleted" => Some(Notice::Deleted),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Notice::Added => "Employee added successfully",
            Notice::Deleted => "Employee deleted successfully",
        }
    }
}

/// Where a form post returns to.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReturnTo {
    branch: String,
    search: String,
    position: String,
}

impl ReturnTo {
    fn redirect(&self, outcome: Result<Notice, ServiceError>) -> Redirect {
        let (key, message) = match outcome {
            Ok(notice) => ("notice", notice.code().to_string()),
            Err(e) => ("error", e.public_message()),
        };
        Redirect::to(&page_href(&[
            ("branch", self.branch.as_str()),
            ("search", self.search.as_str()),
            ("position", self.position.as_str()),
            (key, message.as_str()),
        ]))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AddEmployeeForm {
    full_name: String,
    birth_date: String,
    position_id: String,
    branch_id: String,
    salary: String,
    hire_date: String,
    branch: String,
    search: String,
    position: String,
}

impl AddEmployeeForm {
    fn back(&self) -> ReturnTo {
        ReturnTo {
            branch: self.branch.clone(),
            search: self.search.clone(),
            position: self.position.clone(),
        }
    }

    /// Same shape a JSON client posts: trimmed name, numeric salary
    /// (`null` when it does not parse), ids as select strings.
    fn to_input(&self) -> NewEmployeeInput {
        let salary = self
            .salary
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Json::Number)
            .unwrap_or(Json::Null);
        NewEmployeeInput {
            full_name: Json::String(self.full_name.trim().to_string()),
            birth_date: Json::String(self.birth_date.clone()),
            position_id: Json::String(self.position_id.clone()),
            branch_id: Json::String(self.branch_id.clone()),
            salary,
            hire_date: Json::String(self.hire_date.clone()),
        }
    }
}

/// An unreadable form body is treated as an empty form.
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(value)) => value,
        Err(e) => {
            warn!("unreadable form body: {}", e.body_text());
            T::default()
        }
    }
}

async fn add_employee(
    State(svc): State<AppState>,
    form: Result<Form<AddEmployeeForm>, FormRejection>,
) -> Redirect {
    let form = form_or_default(form);
    let outcome = svc
        .add_employee(&form.to_input())
        .map(|_| Notice::Added)
        .map_err(ServiceError::from);
    if let Err(e) = &outcome {
        log_failure(e);
    }
    form.back().redirect(outcome)
}

async fn delete_employee(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    back: Result<Form<ReturnTo>, FormRejection>,
) -> Redirect {
    let back = form_or_default(back);
    let outcome = parse_id(&id, "employee")
        .and_then(|id| svc.delete_employee(id).map_err(ServiceError::from))
        .map(|_| Notice::Deleted);
    if let Err(e) = &outcome {
        log_failure(e);
    }
    back.redirect(outcome)
}

fn log_failure(e: &ServiceError) {
    if e.status_code().is_server_error() {
        error!(code = e.error_code(), "page action failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use filial_sql::{SQLStore, SqliteStore};

    use crate::api::build_router;
    use crate::service::DirectoryService;
    use crate::service::testing::{org_chart, position, service};

    async fn get_page(router: &axum::Router, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_form(router: &axum::Router, uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        (resp.status(), location)
    }

    fn seeded() -> (axum::Router, Arc<DirectoryService>, (i64, i64, i64, i64), i64) {
        let svc = service();
        let ids = org_chart(&svc);
        let pos = position(&svc, "Engineer");
        (build_router(svc.clone()), svc, ids, pos)
    }

    #[tokio::test]
    async fn page_renders_tree_and_employees() {
        let (router, svc, (_, _, east, _), pos) = seeded();
        let input = serde_json::from_value(serde_json::json!({
            "full_name": "Orlov Pavel",
            "birth_date": "1985-02-11",
            "position_id": pos,
            "branch_id": east,
            "salary": 150000,
            "hire_date": "2019-04-01",
        }))
        .unwrap();
        svc.add_employee(&input).unwrap();

        let (status, html) = get_page(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(">Sales-East</a>"));
        assert!(html.contains("<td>Orlov Pavel</td>"));
        assert!(html.contains("<td>150\u{a0}000 ₽</td>"));
        assert!(html.contains("<td>01.04.2019</td>"));
    }

    #[tokio::test]
    async fn branch_selection_scopes_table() {
        let (router, svc, (hq, sales, east, support), pos) = seeded();
        let input = serde_json::from_value(serde_json::json!({
            "full_name": "Orlov Pavel",
            "birth_date": "1985-02-11",
            "position_id": pos,
            "branch_id": east,
            "salary": 150000,
            "hire_date": "2019-04-01",
        }))
        .unwrap();
        svc.add_employee(&input).unwrap();

        for branch in [hq, sales, east] {
            let (_, html) = get_page(&router, &format!("/?branch={}", branch)).await;
            assert!(html.contains("<td>Orlov Pavel</td>"), "branch {}", branch);
        }
        let (_, html) = get_page(&router, &format!("/?branch={}", support)).await;
        assert!(html.contains("class=\"no-results\""));
        assert!(html.contains(&format!("data-id=\"{}\" class=\"active\"", support)));
    }

    #[tokio::test]
    async fn search_with_no_match_shows_placeholder() {
        let (router, ..) = seeded();
        let (_, html) = get_page(&router, "/?search=nobody").await;
        assert!(html.contains("No data to display"));
    }

    #[tokio::test]
    async fn invalid_branch_param_raises_toast() {
        let (router, ..) = seeded();
        let (status, html) = get_page(&router, "/?branch=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<div class=\"toast error\" role=\"status\">Invalid branch ID</div>"));
    }

    #[tokio::test]
    async fn add_form_redirects_with_notice() {
        let (router, svc, (_, sales, ..), pos) = seeded();
        let body = format!(
            "full_name=+Orlova+Anna+&birth_date=1990-06-30&position_id={}&branch_id={}\
             &salary=98000.50&hire_date=2021-03-15&branch={}&search=&position=",
            pos, sales, sales
        );
        let (status, location) = post_form(&router, "/employees", &body).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            location,
            format!("/?branch={}&notice=added", sales)
        );

        let all = svc.list_employees().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].employee.full_name, "Orlova Anna");
        assert_eq!(all[0].employee.salary, 98000.5);

        let (_, html) = get_page(&router, &location).await;
        assert!(html.contains("<div class=\"toast success\" role=\"status\">Employee added successfully</div>"));
    }

    #[tokio::test]
    async fn add_form_rejects_zero_salary() {
        let (router, svc, (hq, ..), pos) = seeded();
        let body = format!(
            "full_name=Zero&birth_date=1990-06-30&position_id={}&branch_id={}&salary=0&hire_date=2021-03-15",
            pos, hq
        );
        let (status, location) = post_form(&router, "/employees", &body).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/?error=All%20fields%20are%20required");
        assert!(svc.list_employees().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_form_reports_missing_employee() {
        let (router, ..) = seeded();
        let (status, location) = post_form(&router, "/employees/999/delete", "search=x").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/?search=x&error=Employee%20not%20found");
    }

    #[tokio::test]
    async fn notice_only_accepts_known_codes() {
        let (router, ..) = seeded();
        let (_, html) = get_page(&router, "/?notice=Payroll%20doubled").await;
        assert!(!html.contains("Payroll doubled"));
        assert!(!html.contains("toast success"));

        let (_, html) = get_page(&router, "/?notice=deleted").await;
        assert!(html.contains("<div class=\"toast success\" role=\"status\">Employee deleted successfully</div>"));
    }

    #[tokio::test]
    async fn delete_form_redirects_with_code() {
        let (router, svc, (hq, ..), pos) = seeded();
        let input = serde_json::from_value(serde_json::json!({
            "full_name": "Temp",
            "birth_date": "1985-02-11",
            "position_id": pos,
            "branch_id": hq,
            "salary": 1000,
            "hire_date": "2019-04-01",
        }))
        .unwrap();
        let id = svc.add_employee(&input).unwrap().id;

        let (status, location) = post_form(&router, &format!("/employees/{}/delete", id), "branch=&search=&position=").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location, "/?notice=deleted");
        assert!(svc.list_employees().unwrap().is_empty());
    }

    #[tokio::test]
    async fn form_post_without_body_requires_fields() {
        let (router, svc, ..) = seeded();
        let req = Request::builder().method("POST").uri("/employees").body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/?error=All%20fields%20are%20required"
        );
        assert!(svc.list_employees().unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_renders_load_error() {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let router = build_router(DirectoryService::new(sql.clone()).unwrap());
        sql.exec("DROP TABLE employees", &[]).unwrap();

        let (status, html) = get_page(&router, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(html.contains("Failed to load data"));
        assert!(!html.contains("no such table"));
    }
}
