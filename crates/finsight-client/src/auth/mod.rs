/*
[INPUT]:  Bearer tokens from the backend
[OUTPUT]: Host-side credential persistence
[POS]:    Auth layer - module wiring
[UPDATE]: When auth storage components change
*/

pub mod store;

pub use store::CredentialStore;
