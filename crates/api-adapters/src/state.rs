use std::sync::Arc;

use domains::IdentityVerifier;
use services::Services;

use crate::metrics::HttpMetrics;

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub identity: Arc<dyn IdentityVerifier>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(services: Services, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            services,
            identity,
            metrics: Arc::new(HttpMetrics::new()),
        }
    }
}
