pub mod import;
pub mod recurring;
