//! Public contract signing routes.
//!
//! Every request loads the contract fresh through its signing token; the
//! portal keeps no signing state between requests.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod views;

use salvo::Router;

/// `/contracts/{token}` routes.
pub(crate) fn router() -> Router {
    Router::with_path("contracts/{token}")
        .get(handlers::show::handler)
        .push(
            Router::with_path("sign")
                .get(handlers::page::handler)
                .post(handlers::sign::handler),
        )
}
