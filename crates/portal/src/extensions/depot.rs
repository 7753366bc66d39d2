//! Depot helper extensions.

use std::sync::Arc;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use crate::state::State;

/// Typed access to what the middleware stack puts in the depot.
pub(crate) trait DepotExt {
    /// Shared portal state, or a 500 when the state hoop is missing.
    fn portal_state(&self) -> Result<&Arc<State>, StatusError>;
}

impl DepotExt for Depot {
    fn portal_state(&self) -> Result<&Arc<State>, StatusError> {
        self.obtain::<Arc<State>>().map_err(|_missing| {
            error!("portal state missing from depot");

            StatusError::internal_server_error()
        })
    }
}
