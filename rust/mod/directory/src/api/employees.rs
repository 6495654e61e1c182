use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get};
use axum::{Json, Router};

use filial_core::{parse_id, ServiceError};

use crate::api::AppState;
use crate::model::{Employee, EmployeeRecord, NewEmployeeInput};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(add_employee))
        .route("/employees/{id}", delete(delete_employee))
}

async fn list_employees(
    State(svc): State<AppState>,
) -> Result<Json<Vec<EmployeeRecord>>, ServiceError> {
    Ok(Json(svc.list_employees()?))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json") || ct.contains("+json"))
}

/// A missing or empty body, a non-JSON content type, and any JSON that is
/// not an object all count as an empty object, so they fail the
/// required-fields check. Only unparseable JSON is reported as such.
fn employee_body(headers: &HeaderMap, body: &Bytes) -> Result<NewEmployeeInput, ServiceError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewEmployeeInput::default());
    }
    match Json::<NewEmployeeInput>::from_bytes(body) {
        Ok(Json(input)) => Ok(input),
        Err(JsonRejection::JsonDataError(_)) => Ok(NewEmployeeInput::default()),
        Err(JsonRejection::JsonSyntaxError(e)) => Err(ServiceError::Validation(format!(
            "Invalid JSON body: {}",
            e.body_text()
        ))),
        Err(other) => Err(ServiceError::Validation(other.body_text())),
    }
}

async fn add_employee(
    State(svc): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Employee>), ServiceError> {
    let input = employee_body(&headers, &body)?;
    let employee = svc.add_employee(&input)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn delete_employee(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id(&id, "employee")?;
    svc.delete_employee(id)?;
    Ok(StatusCode::NO_CONTENT)
}
