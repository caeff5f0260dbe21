//! Basic credentials for API tokens
//!
//! The service accepts the API token as the user name with the literal
//! password `api_token`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use toggldeck_domain::ApiToken;

/// `Authorization` header value for `credential`.
pub fn basic_credentials(credential: &ApiToken) -> String {
    let encoded = STANDARD.encode(format!("{}:api_token", credential.expose()));
    format!("Basic {encoded}")
}
