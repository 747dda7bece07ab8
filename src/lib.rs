//! Sitetrack schedule engine.
//!
//! The construction schedule and resource-allocation core of the Sitetrack
//! operations portal: derives a project's current phase and progress from
//! its timeline, applies bulk date shifts with dependency cascades,
//! recomputes financial milestone dates from anchor rules, measures weekly
//! resource utilization with overbooking detection, and describes schedule
//! changes in plain language.
//!
//! The engine is an in-process library: request handlers call the service
//! layer in [`db::services`], which combines the pure computations in
//! [`services`] with a pluggable persistence collaborator.

pub mod algorithms;
pub mod core;
pub mod db;
pub mod parsing;
pub mod services;
pub mod time;
