pub mod records;
pub mod registry;
