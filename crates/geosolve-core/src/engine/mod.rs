//! # Engine Module
//!
//! Turns a scene plus weighted constraints into a scalar objective and
//! minimizes it.
//!
//! - **Problem** ([`problem`]) - Optimizable-box registry, decision-vector packing and `solve`
//! - **Minimizers** ([`minimizer`]) - Powell direction-set search and simulated annealing
//! - **Configuration** ([`config`]) - Solver settings, builder and TOML loading
//! - **Progress Monitoring** ([`progress`]) - Callback channel for phase and iteration events
//! - **Error Handling** ([`error`]) - Engine errors wrapping the lower layers

pub mod config;
pub mod error;
pub mod minimizer;
pub mod problem;
pub mod progress;
