pub mod db;
pub mod models;
pub mod stopwatch;
pub mod utils;

pub use db::RecordStore;
pub use models::Record;
pub use stopwatch::{
    format_elapsed, StopwatchController, StopwatchSnapshot, StopwatchState, StopwatchStatus,
};
