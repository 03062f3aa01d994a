mod orchestrator;
mod shutdown;
pub mod signals;
mod startup;
mod state;
mod types;


pub use orchestrator::{run_lifecycle, Orchestrator};
pub use types::{RunState, ShutdownReason};
