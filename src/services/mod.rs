//! Operation layer consumed by the boundary.
//!
//! Services hold injected store trait objects and return plain domain
//! data or typed errors; request parsing and response shaping stay
//! outside the crate.

pub mod films;
pub mod reference;
pub mod users;
pub mod validator;

pub use films::FilmService;
pub use reference::ReferenceService;
pub use users::UserService;
pub use validator::EntityValidator;
