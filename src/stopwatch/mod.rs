pub mod controller;
pub mod format;
pub mod state;

pub use controller::{StopwatchController, StopwatchSnapshot};
pub use format::format_elapsed;
pub use state::{StopwatchState, StopwatchStatus};
