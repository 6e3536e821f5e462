//! VaaS API Surface
//!
//! Wire types, the REST client and its error type.

pub mod client;
pub mod error;
pub mod models;

pub use client::{Client, VaasApi};
pub use error::VaasError;
pub use models::{Backend, Dc, Director, Meta, PaginatedList, Task};
