//! Domain entities - the core business objects.

mod user;

pub use user::{ROLE_ADMIN, ROLE_CUSTOMER, User};
