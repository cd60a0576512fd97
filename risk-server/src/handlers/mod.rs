//! HTTP handlers

pub mod batch;
pub mod health;
pub mod model;
pub mod predict;
