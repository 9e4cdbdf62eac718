//! Domain types and rules for the Rewear clothing-swap marketplace.
//!
//! Nothing in this crate performs I/O. Persistence lives in `rewear-db`,
//! presigned URL issuance in `rewear-storage`, and HTTP in `rewear-api`.

pub mod catalog;
pub mod error;
pub mod naming;
pub mod pagination;
pub mod storage;
pub mod swap;
pub mod types;
pub mod validation;
