use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use filial_core::{parse_id, ServiceError};

use crate::api::AppState;
use crate::model::{Branch, CreateBranch, EmployeeRecord, MoveBranch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(list_branches).post(create_branch))
        .route("/branches/{id}", patch(move_branch))
        .route("/branches/{id}/employees", get(branch_employees))
}

async fn list_branches(State(svc): State<AppState>) -> Result<Json<Vec<Branch>>, ServiceError> {
    Ok(Json(svc.list_branches()?))
}

async fn create_branch(
    State(svc): State<AppState>,
    Json(input): Json<CreateBranch>,
) -> Result<(StatusCode, Json<Branch>), ServiceError> {
    let branch = svc.create_branch(input)?;
    Ok((StatusCode::CREATED, Json(branch)))
}

async fn move_branch(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MoveBranch>,
) -> Result<Json<Branch>, ServiceError> {
    let id = parse_id(&id, "branch")?;
    Ok(Json(svc.move_branch(id, input)?))
}

/// Employees of the branch and its whole subtree.
async fn branch_employees(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EmployeeRecord>>, ServiceError> {
    let id = parse_id(&id, "branch")?;
    Ok(Json(svc.employees_under_branch(id)?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::build_router;
    use crate::api::testing::api;
    use crate::service::testing::{org_chart, position, service};
    use crate::service::DirectoryService;

    fn employee(name: &str, position_id: i64, branch_id: i64) -> serde_json::Value {
        json!({
            "full_name": name,
            "birth_date": "1985-02-20",
            "position_id": position_id,
            "branch_id": branch_id,
            "salary": 70000,
            "hire_date": "2019-07-01",
        })
    }

    fn setup() -> (Arc<DirectoryService>, axum::Router) {
        let svc = service();
        let router = build_router(svc.clone());
        (svc, router)
    }

    #[tokio::test]
    async fn list_branches_shape() {
        let (svc, router) = setup();
        let (hq, sales, ..) = org_chart(&svc);

        let (status, body) = api(&router, "GET", "/api/branches", None).await;
        assert_eq!(status, StatusCode::OK);
        let arr = body.as_array().unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr[0], json!({"id": hq, "branch_name": "HQ", "parent_id": null}));
        assert_eq!(arr[1]["parent_id"], json!(hq));
        assert_eq!(arr[1]["id"], json!(sales));
    }

    #[tokio::test]
    async fn subtree_scenario() {
        let (svc, router) = setup();
        let (hq, sales, east, support) = org_chart(&svc);
        let pos = position(&svc, "Analyst");
        let (status, created) = api(&router, "POST", "/api/employees", Some(employee("Orlova", pos, east))).await;
        assert_eq!(status, StatusCode::CREATED);

        for branch in [hq, sales, east] {
            let (status, body) = api(&router, "GET", &format!("/api/branches/{}/employees", branch), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body.as_array().unwrap().len(), 1, "branch {}", branch);
            assert_eq!(body[0]["id"], created["id"]);
            assert_eq!(body[0]["branch_name"], "Sales-East");
            assert_eq!(body[0]["position_name"], "Analyst");
        }

        let (status, body) = api(&router, "GET", &format!("/api/branches/{}/employees", support), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn invalid_branch_id_is_400() {
        let (_, router) = setup();
        for bad in ["abc", "0", "-1"] {
            let (status, body) = api(&router, "GET", &format!("/api/branches/{}/employees", bad), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid branch ID");
            assert_eq!(body["code"], "VALIDATION_FAILED");
        }
    }

    #[tokio::test]
    async fn create_and_move_branch() {
        let (_, router) = setup();
        let (status, hq) = api(&router, "POST", "/api/branches", Some(json!({"branch_name": "HQ"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, ops) = api(
            &router,
            "POST",
            "/api/branches",
            Some(json!({"branch_name": "Ops", "parent_id": hq["id"]})),
        )
        .await;
        assert_eq!(ops["parent_id"], hq["id"]);

        // HQ under its own child: cycle.
        let (status, body) = api(
            &router,
            "PATCH",
            &format!("/api/branches/{}", hq["id"]),
            Some(json!({"parent_id": ops["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("cycle"));

        // Ops to the root.
        let (status, body) = api(
            &router,
            "PATCH",
            &format!("/api/branches/{}", ops["id"]),
            Some(json!({"parent_id": null})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["parent_id"], json!(null));

        let (status, _) = api(&router, "PATCH", "/api/branches/999", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
