/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums for the analysis backend wire format
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the backend schema changes or new types are added
*/

pub mod enums;
pub mod models;
pub mod responses;

pub use enums::*;
pub use models::*;
pub use responses::*;
