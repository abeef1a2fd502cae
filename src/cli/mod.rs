pub mod grocery;
pub mod import;
