//! Auth-domain values: opaque tokens and verified identities.

pub mod token;
pub mod user;

pub use token::*;
pub use user::*;
