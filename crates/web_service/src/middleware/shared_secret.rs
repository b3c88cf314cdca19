use actix_web::HttpRequest;
use subtle::ConstantTimeEq;

use crate::error::AppError;

pub const SECRET_HEADER: &str = "X-JARVIS-KEY";

/// Check the caller's `X-JARVIS-KEY` header against the configured secret.
///
/// The comparison runs in constant time over the header bytes.
pub fn verify_shared_secret(req: &HttpRequest, expected: &str) -> Result<(), AppError> {
    let provided = req
        .headers()
        .get(SECRET_HEADER)
        .map(|value| value.as_bytes())
        .filter(|bytes| !bytes.is_empty());

    match provided {
        Some(bytes) if bool::from(bytes.ct_eq(expected.as_bytes())) => Ok(()),
        Some(_) => {
            tracing::warn!("Rejected request with mismatched shared secret");
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::warn!("Rejected request without shared secret");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn accepts_exact_match() {
        let req = TestRequest::default()
            .insert_header((SECRET_HEADER, "open-sesame"))
            .to_http_request();
        assert!(verify_shared_secret(&req, "open-sesame").is_ok());
    }

    #[test]
    fn rejects_missing_empty_and_wrong_values() {
        let missing = TestRequest::default().to_http_request();
        assert!(matches!(
            verify_shared_secret(&missing, "open-sesame"),
            Err(AppError::Unauthorized)
        ));

        for value in ["", "open-sesam", "open-sesame ", "OPEN-SESAME"] {
            let req = TestRequest::default()
                .insert_header((SECRET_HEADER, value))
                .to_http_request();
            assert!(
                verify_shared_secret(&req, "open-sesame").is_err(),
                "{value:?} should be rejected"
            );
        }
    }
}
