pub mod api;
pub mod auth;
pub mod form;
pub mod pagination;

pub use api::*;
pub use auth::*;
pub use form::*;
pub use pagination::*;
