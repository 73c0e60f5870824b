//! Domain models for the WBS planner.
//!
//! # Core Concepts
//!
//! - [`WbsNode`]: One row of a work breakdown structure. Rows form a tree
//!   through their nesting `level`, and carry an optional [`DateRange`].
//! - [`NewTask`] / [`Task`]: Kanban task records produced by exporting a plan.
//! - [`Person`]: Entry of the roster that nodes can be assigned to.
//!
//! The plan itself, and the algorithms operating on it, live in [`crate::wbs`].

mod node;
mod person;
mod plan;
mod task;

pub use node::*;
pub use person::*;
pub use plan::*;
pub use task::*;
