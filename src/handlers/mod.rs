pub mod lists;
pub mod records;
