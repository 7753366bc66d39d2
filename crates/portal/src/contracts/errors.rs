//! Contract Errors

use countersign::eligibility::SignerCheckError;
use countersign_app::{api::ApiError, signing::PageError};
use salvo::http::StatusError;
use tracing::{error, warn};

pub(crate) fn into_status_error(error: PageError) -> StatusError {
    match error {
        PageError::NotFound => StatusError::not_found().brief("Contract not found"),
        PageError::Signer(
            error @ (SignerCheckError::MissingName
            | SignerCheckError::MissingEmail
            | SignerCheckError::InvalidEmail(_)),
        ) => StatusError::bad_request().brief(error.to_string()),
        PageError::Signer(
            error @ (SignerCheckError::AlreadySigned(_) | SignerCheckError::SigningClosed(_)),
        ) => StatusError::conflict().brief(error.to_string()),
        PageError::PadNotOpen => StatusError::bad_request().brief("Signature is missing"),
        PageError::Pad(error) => StatusError::bad_request().brief(error.to_string()),
        PageError::Api(error) => api_status_error(&error),
    }
}

fn api_status_error(error: &ApiError) -> StatusError {
    match error {
        ApiError::NotFound => StatusError::not_found().brief("Contract not found"),
        ApiError::Server { status, .. } if status.is_client_error() => {
            warn!("backend rejected signature: {error}");

            StatusError::unprocessable_entity().brief(error.user_message())
        }
        _ => {
            error!("backend request failed: {error}");

            StatusError::bad_gateway().brief(error.user_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use countersign::status::SigningStatus;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let status = into_status_error(PageError::Signer(SignerCheckError::MissingName));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflicts_are_409() {
        let already = into_status_error(PageError::Signer(SignerCheckError::AlreadySigned(
            "a@x.com".to_string(),
        )));
        let closed = into_status_error(PageError::Signer(SignerCheckError::SigningClosed(
            SigningStatus::SigningDisabled,
        )));

        assert_eq!(already.code, StatusCode::CONFLICT);
        assert_eq!(closed.code, StatusCode::CONFLICT);
    }

    #[test]
    fn backend_validation_message_is_passed_through() {
        let status = into_status_error(PageError::Api(ApiError::Server {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: Some("Signature image is too small".to_string()),
        }));

        assert_eq!(status.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status.brief, "Signature image is too small");
    }

    #[test]
    fn backend_outage_is_bad_gateway() {
        let status = into_status_error(PageError::Api(ApiError::Timeout));

        assert_eq!(status.code, StatusCode::BAD_GATEWAY);
    }
}
