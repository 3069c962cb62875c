/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public finsight client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::CredentialStore;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Credentials,
    FinsightClient,
    FinsightError,
    Result,
};

// Re-export all types
pub use types::*;
