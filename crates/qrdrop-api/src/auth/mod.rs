//! Session identity
//!
//! Sign-in and cookie issuance belong to the authentication service. This module
//! only turns an incoming request into the id of the signed-in user.

pub mod extractor;
pub mod session;

pub use extractor::CurrentUser;
pub use session::{SessionResolver, SignedCookieSession};
