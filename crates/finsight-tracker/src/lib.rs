/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public analysis lifecycle tracking surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod api;
pub mod coordinator;
pub mod poller;
pub mod snapshot;

// Re-export the lifecycle surface
pub use api::{AnalysisApi, AnalysisRequest};
pub use coordinator::{AuthFailureHook, Coordinator, SubmitError, TrackerConfig};
pub use poller::{DEFAULT_POLL_INTERVAL, PollScheduler, StatusSink};
pub use snapshot::{AnalysisOutcome, StatusSnapshot, WatchState};
