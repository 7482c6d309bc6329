//! Application records and their lifecycle
//!
//! An application moves from draft to submitted once its required fields
//! pass validation; review outcomes (under_review, accepted, rejected) are
//! carried by the model but set by an external reviewer, never by this crate.

mod repository;
mod types;

pub use repository::ApplicationRepository;
pub use types::*;

#[cfg(test)]
pub(crate) use types::fixtures;
