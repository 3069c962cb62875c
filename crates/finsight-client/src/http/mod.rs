/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod analysis;
pub mod auth;
pub mod client;
pub mod documents;
pub mod error;

pub use client::{ClientConfig, Credentials, FinsightClient};
pub use error::{FinsightError, Result};
