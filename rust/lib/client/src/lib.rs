//! HTTP client for the filial directory API.
//!
//! [`DirectoryClient`] is a thin typed wrapper over the JSON endpoints.
//! [`DirectorySession`] pairs it with the directory UI state so a host
//! (the CLI) drives the same state/view layer as the HTML page.
//!
//! ```ignore
//! let client = DirectoryClient::new("http://localhost:3000");
//! let mut session = DirectorySession::new(client);
//! session.load().await;
//! session.select_branch(Some(2)).await;
//! let view = session.view(chrono::Utc::now());
//! ```

mod session;

pub use session::DirectorySession;

use serde::de::DeserializeOwned;

use directory::model::{
    Branch, CreateBranch, CreatePosition, Employee, EmployeeRecord, MoveBranch, NewEmployee,
    Position,
};

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text fit for a toast: the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull `error` out of a `{"code", "error"}` body, else the raw text.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        message: server_message(&body),
    })
}

/// Parse an API response, mapping HTTP errors to `ApiError`.
async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
    check(resp)
        .await?
        .json::<R>()
        .await
        .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
}

// ── DirectoryClient ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
        parse(self.http.get(self.url("/branches")).send().await?).await
    }

    pub async fn list_positions(&self) -> Result<Vec<Position>, ApiError> {
        parse(self.http.get(self.url("/positions")).send().await?).await
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, ApiError> {
        parse(self.http.get(self.url("/employees")).send().await?).await
    }

    /// Employees of a branch and its whole subtree.
    pub async fn branch_employees(&self, branch_id: i64) -> Result<Vec<EmployeeRecord>, ApiError> {
        let url = self.url(&format!("/branches/{}/employees", branch_id));
        parse(self.http.get(url).send().await?).await
    }

    pub async fn add_employee(&self, employee: &NewEmployee) -> Result<Employee, ApiError> {
        let resp = self.http.post(self.url("/employees")).json(employee).send().await?;
        parse(resp).await
    }

    pub async fn delete_employee(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/employees/{}", id));
        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    pub async fn create_branch(&self, name: &str, parent_id: Option<i64>) -> Result<Branch, ApiError> {
        let body = CreateBranch {
            name: name.to_string(),
            parent_id,
        };
        parse(self.http.post(self.url("/branches")).json(&body).send().await?).await
    }

    /// Re-parent a branch; `None` moves it to the root level.
    pub async fn move_branch(&self, id: i64, parent_id: Option<i64>) -> Result<Branch, ApiError> {
        let url = self.url(&format!("/branches/{}", id));
        let resp = self.http.patch(url).json(&MoveBranch { parent_id }).send().await?;
        parse(resp).await
    }

    pub async fn create_position(&self, name: &str) -> Result<Position, ApiError> {
        let body = CreatePosition {
            name: name.to_string(),
        };
        parse(self.http.post(self.url("/positions")).json(&body).send().await?).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use directory::DirectoryModule;
    use filial_core::Module;
    use filial_sql::SqliteStore;

    use super::DirectoryClient;

    /// Serve a fresh in-memory directory on an ephemeral port.
    pub async fn spawn_server() -> DirectoryClient {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let module = DirectoryModule::new(store).unwrap();
        let router = module.routes();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        DirectoryClient::new(format!("http://{}/", addr))
    }

    pub fn hire(name: &str, position_id: i64, branch_id: i64) -> directory::model::NewEmployee {
        directory::model::NewEmployee {
            full_name: name.into(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1991, 7, 9).unwrap(),
            position_id,
            branch_id,
            salary: 87000.0,
            hire_date: chrono::NaiveDate::from_ymd_opt(2020, 2, 3).unwrap(),
        }
    }
}
