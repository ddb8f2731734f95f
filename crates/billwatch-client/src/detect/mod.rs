pub mod dates;
pub mod normalize;
pub mod policy;
pub mod query;
pub mod recurring;
pub mod types;
