//! Utility functions for gateway operations.
//!
//! Error-code normalization, credential encoding and the synthetic body used
//! when the provider's edge times out.

use crate::errors::Result;
use crate::types::{ErrorEnvelope, ProviderError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Provider code reported for a synthetic edge timeout.
pub const GATEWAY_TIMEOUT_CODE: &str = "gateway_timeout";

/// Default text for the synthetic timeout message.
pub const DEFAULT_TIMEOUT_MESSAGE: &str =
    "Payment could not be processed, please check the details you entered";

/// Maps a provider error code onto the normalized taxonomy.
///
/// Codes without a mapping pass through unchanged.
///
/// # Examples
///
/// ```
/// use komoju_rs::utils::normalize_error_code;
///
/// assert_eq!(normalize_error_code("bad_verification_value"), "incorrect_cvc");
/// assert_eq!(normalize_error_code("not_found"), "not_found");
/// ```
pub fn normalize_error_code(code: &str) -> &str {
    match code {
        "bad_verification_value" => "incorrect_cvc",
        "card_expired" => "expired_card",
        "card_declined" => "card_declined",
        "invalid_number" => "invalid_number",
        other => other,
    }
}

/// Builds the `Authorization` header value for a login token.
///
/// The login is sent as the Basic-Auth user name with an empty password.
///
/// # Examples
///
/// ```
/// use komoju_rs::utils::basic_auth_header;
///
/// assert_eq!(basic_auth_header("sk_test"), "Basic c2tfdGVzdDo=");
/// ```
pub fn basic_auth_header(login: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:", login).as_bytes()))
}

/// Serialized error envelope substituted for a 504 response body.
///
/// # Examples
///
/// ```
/// use komoju_rs::utils::gateway_timeout_body;
///
/// let body = gateway_timeout_body("timed out").unwrap();
/// assert!(body.contains("gateway_timeout"));
/// ```
pub fn gateway_timeout_body(message: &str) -> Result<String> {
    let envelope = ErrorEnvelope {
        error: ProviderError {
            code: Some(GATEWAY_TIMEOUT_CODE.to_string()),
            message: Some(message.to_string()),
        },
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// User agent sent with every request.
pub fn default_user_agent() -> String {
    format!("Komoju/v1 komoju-rs/{}", env!("CARGO_PKG_VERSION"))
}
