//! Organizational directory: a branch hierarchy, a position catalog and
//! employees, served as a JSON API plus a server-rendered page.

pub mod api;
pub mod bff;
pub mod hierarchy;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use filial_sql::SQLStore;

pub use service::{DirectoryError, DirectoryService};

/// The directory module, pluggable into the server.
pub struct DirectoryModule {
    service: Arc<DirectoryService>,
}

impl DirectoryModule {
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, DirectoryError> {
        Ok(Self {
            service: DirectoryService::new(sql)?,
        })
    }

    pub fn service(&self) -> &Arc<DirectoryService> {
        &self.service
    }
}

impl filial_core::Module for DirectoryModule {
    fn name(&self) -> &str {
        "directory"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}

#[cfg(test)]
mod tests {
    use filial_core::Module;
    use filial_sql::SqliteStore;

    use super::*;
    use crate::model::{CreateBranch, CreatePosition};

    fn open(path: &std::path::Path) -> DirectoryModule {
        DirectoryModule::new(Arc::new(SqliteStore::open(path).unwrap())).unwrap()
    }

    #[test]
    fn directory_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filial.sqlite");

        let (hq, east) = {
            let module = open(&path);
            assert_eq!(module.name(), "directory");
            let svc = module.service();
            let hq = svc.create_branch(CreateBranch { name: "HQ".into(), parent_id: None }).unwrap().id;
            let sales = svc.create_branch(CreateBranch { name: "Sales".into(), parent_id: Some(hq) }).unwrap().id;
            let east = svc.create_branch(CreateBranch { name: "Sales-East".into(), parent_id: Some(sales) }).unwrap().id;
            let pos = svc.create_position(CreatePosition { name: "Clerk".into() }).unwrap().id;
            let input = serde_json::from_value(serde_json::json!({
                "full_name": "Morozova Irina",
                "birth_date": "1994-08-21",
                "position_id": pos,
                "branch_id": east,
                "salary": 51000,
                "hire_date": "2022-10-03",
            }))
            .unwrap();
            svc.add_employee(&input).unwrap();
            (hq, east)
        };

        // Schema init on an existing file must keep the data.
        let module = open(&path);
        let svc = module.service();
        assert_eq!(svc.list_branches().unwrap().len(), 3);
        assert_eq!(svc.subtree_ids(hq).unwrap().len(), 3);
        let under_hq = svc.employees_under_branch(hq).unwrap();
        assert_eq!(under_hq.len(), 1);
        assert_eq!(under_hq[0].employee.branch_id, east);
        assert_eq!(under_hq[0].position_name, "Clerk");
    }
}
