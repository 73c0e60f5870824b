//! Work breakdown structure planner.
//!
//! Plans are edited as a flat, level-encoded tree of [`models::WbsNode`]s.
//! Dates are painted per leaf on a calendar grid and rolled up into parents,
//! and a finished plan exports into kanban tasks. See [`wbs`] for the core
//! algorithms, [`store`] for the in-memory session store and [`api`] for the
//! HTTP surface.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod wbs;

pub use error::WbsError;
