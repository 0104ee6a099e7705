pub mod form;
pub mod home;
pub mod list;

pub use form::{form_page, FormPageVm};
pub use home::home_page;
pub use list::{list_page, ListPageVm};
