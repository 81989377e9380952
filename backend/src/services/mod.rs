//! Business logic services
//!
//! Services apply validation and catalog rules on top of the stores.
//! Guards run in the route handlers before any service is called.

pub mod book;
pub mod category;
pub mod user;

pub use book::BookService;
pub use category::CategoryService;
pub use user::UserService;
