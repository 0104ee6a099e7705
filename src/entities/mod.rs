pub mod catalog;
pub mod forms;

pub use catalog::{find, EntitySpec, CATALOG};
pub use forms::{parse_form, FieldErrors, FieldKind, FormField, FormInput, FormSpec};
