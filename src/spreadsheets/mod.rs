pub mod export_xlsx;

pub use export_xlsx::{export_rows_response, export_rows_xlsx};
