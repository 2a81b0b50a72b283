//! The scene arena that owns every box and hands out stable [`ids::BoxId`] keys.

pub mod ids;
pub mod scene;
