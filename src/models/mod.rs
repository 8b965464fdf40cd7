pub mod course;
pub mod progress;
