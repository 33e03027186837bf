use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
};

use crate::error::AppError;

/// Header carrying the user ID verified by the authenticating gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user making the request
///
/// The header value is trusted as-is: bearer tokens are verified by the gateway,
/// which must strip any client-supplied `x-user-id`. The service must only be
/// reachable through that gateway, never exposed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

impl CurrentUser {
    fn from_header(value: Option<&HeaderValue>) -> Result<Self, AppError> {
        let value = value
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER)))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_header(parts.headers.get(USER_ID_HEADER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_id() {
        let value = HeaderValue::from_static("42");
        assert_eq!(CurrentUser::from_header(Some(&value)).unwrap(), CurrentUser(42));
    }

    #[test]
    fn test_missing_or_invalid_user_id() {
        assert!(matches!(
            CurrentUser::from_header(None),
            Err(AppError::Unauthorized(_))
        ));

        for raw in ["abc", "0", "-3", ""] {
            let value = HeaderValue::from_static(raw);
            assert!(matches!(
                CurrentUser::from_header(Some(&value)),
                Err(AppError::Unauthorized(_))
            ));
        }
    }
}
