//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Geometry** ([`geometry`]) - Oriented boxes, Euler rotations and planar footprints
//! - **Scene Model** ([`models`]) - The arena that owns every box, keyed by stable ids
//! - **Constraints** ([`constraints`]) - Relation kinds, arity rules and badness formulas
//! - **Records** ([`io`]) - Serializable scene documents and their re-hydration

pub mod constraints;
pub mod geometry;
pub mod io;
pub mod models;
