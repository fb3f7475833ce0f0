//! Heuristics module for the delivery planner.
//!
//! This module exports the route construction heuristics.

pub mod construction;

pub use construction::*;
