pub mod api;
pub mod course;
pub mod forms;
