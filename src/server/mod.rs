/// Configuration loading.
pub mod config;

/// User lookup for sign-in.
pub mod directory;

/// Bearer-token interceptor.
pub mod interceptor;

/// Password sign-in.
pub mod login;

pub use config::{Config, TokenSettings};
pub use directory::{DirectoryError, InMemoryDirectory, UserDirectory, UserRecord};
pub use interceptor::{AUTHORIZATION, SessionInterceptor, bearer_token};
pub use login::{LoginFlow, hash_password};
