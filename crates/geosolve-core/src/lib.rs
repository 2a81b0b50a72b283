//! # geosolve
//!
//! Soft geometric-constraint solving for oriented 3D boxes.
//!
//! A scene of rigid boxes is scored against declarative relations such as
//! alignment, proximity, symmetry, non-overlap, facing and clearance. Each
//! relation yields a non-negative badness that vanishes when it holds, and the
//! solver moves the selected boxes to minimize the weighted total.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Box geometry, the scene arena, the
//!   constraint taxonomy with its badness formulas, and record I/O.
//!
//! - **[`engine`]: The Optimization Layer.** The `Problem` harness that maps
//!   box state to a decision vector, and the derivative-free minimizers that
//!   drive it.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures over scene
//!   documents: scoring an arrangement and solving one or many.

pub mod core;
pub mod engine;
pub mod workflows;
