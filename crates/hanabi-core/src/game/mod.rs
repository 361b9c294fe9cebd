pub mod serialization;
pub mod table;
