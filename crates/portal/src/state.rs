//! State

use std::{sync::Arc, time::Duration};

use countersign_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) slow_request_threshold: Duration,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, slow_request_threshold: Duration) -> Self {
        Self {
            app,
            slow_request_threshold,
        }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, slow_request_threshold: Duration) -> Arc<Self> {
        Arc::new(Self::new(app, slow_request_threshold))
    }
}
