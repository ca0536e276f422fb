//! Authentication primitives.
//!
//! - [`jwt`] -- validation of the auth provider's access tokens.

pub mod jwt;
