pub mod coordinator;
pub mod engine;

pub use coordinator::{DispatchCoordinator, DispatchOutcome};
