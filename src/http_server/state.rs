use color_eyre::Result;

use crate::http_server::error::ApiError;
use crate::services::catalog::CatalogService;

/// The process-wide catalog client, fixed at startup.
#[derive(Clone)]
pub enum CatalogHandle {
    Ready(CatalogService),
    Uninitialized { reason: String },
}

impl CatalogHandle {
    /// Turn the outcome of the startup phase into a handle.
    pub fn from_startup(result: Result<CatalogService>) -> Self {
        match result {
            Ok(service) => Self::Ready(service),
            Err(report) => {
                tracing::error!("{report:?}");
                Self::Uninitialized {
                    reason: format!("{report:#}"),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn service(&self) -> Result<&CatalogService, ApiError> {
        match self {
            Self::Ready(service) => Ok(service),
            Self::Uninitialized { .. } => Err(ApiError::Unavailable),
        }
    }
}

pub struct AppState {
    pub catalog: CatalogHandle,
    pub service_name: String,
}
