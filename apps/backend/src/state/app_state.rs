//! Shared application state handed to the upstream API layer.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::round_flow::RoundFlowService;

#[derive(Clone)]
pub struct AppState {
    db: Option<DatabaseConnection>,
    flow: Arc<RoundFlowService>,
}

impl AppState {
    pub fn new(db: Option<DatabaseConnection>, flow: Arc<RoundFlowService>) -> Self {
        Self { db, flow }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn flow(&self) -> Arc<RoundFlowService> {
        self.flow.clone()
    }
}
