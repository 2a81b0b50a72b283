//! # Workflows Module
//!
//! End-to-end procedures over [`SceneDocument`](crate::core::io::records::SceneDocument)s.
//!
//! - **Evaluation** ([`evaluate`]) - Scores an arrangement, grouped by constraint kind
//! - **Solving** ([`solve`]) - Hydrates a document, moves every object and exports the result

pub mod evaluate;
pub mod solve;
