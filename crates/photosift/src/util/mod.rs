pub mod format;
pub mod progress;

pub use format::{format_duration, plural};
pub use progress::create_spinner;
