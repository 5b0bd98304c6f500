//! Domain core of the WVDI portal backend.
//!
//! Resource descriptors, filter criteria, query planning, result shaping
//! and the [`service::ResourceService`] built on the [`store::RecordStore`]
//! seam. No HTTP or SQL lives here.

pub mod error;
pub mod filters;
pub mod planner;
pub mod query;
pub mod record;
pub mod resource;
pub mod service;
pub mod shaping;
pub mod store;
pub mod types;
