//! Authentication core: passwords, header schemes, access and refresh tokens

pub mod api_key;
pub mod error;
pub mod header;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh;

pub use api_key::ApiKey;
pub use error::AuthError;
pub use header::{authorization_value, extract_api_key, extract_bearer};
pub use jwt::{AccessTokenCodec, Claims, ACCESS_TOKEN_ISSUER};
pub use middleware::{api_key_auth_middleware, bearer_auth_middleware, AuthContext};
pub use password::PasswordHasher;
pub use refresh::RefreshTokenStore;
