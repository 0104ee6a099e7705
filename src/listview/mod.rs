//! The list pipeline shared by every entity table:
//! envelope -> rows (with status) -> search -> sort -> page.

pub mod dates;
pub mod envelope;
pub mod menu;
pub mod metrics;
pub mod paginate;
pub mod params;
pub mod pipeline;
pub mod record;
pub mod row;
pub mod search;
pub mod sort;
pub mod source;
pub mod status;
pub mod view;

pub use menu::MenuState;
pub use params::ListParams;
pub use pipeline::{ensure_loaded, load_for_render, present, ListFetch, ListOutcome};
pub use source::{InMemoryListSource, ListSource, PagingMode, RemoteListSource};
pub use view::{ListView, Mutation};
