use std::sync::Arc;
use std::time::Instant;

use crate::alerts::AlertsService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AlertsService>,
    pub started: Instant,
}

impl AppState {
    pub fn new(service: Arc<AlertsService>) -> Self {
        Self {
            service,
            started: Instant::now(),
        }
    }
}
