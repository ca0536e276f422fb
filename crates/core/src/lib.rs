//! Pure domain logic for VerdePM.
//!
//! Nothing in this crate performs I/O. Repositories, cloud clients and HTTP
//! handlers build on these types and functions.

pub mod analytics;
pub mod emissions;
pub mod error;
pub mod paging;
pub mod roles;
pub mod slug;
pub mod status;
pub mod storage;
pub mod types;
pub mod validation;
