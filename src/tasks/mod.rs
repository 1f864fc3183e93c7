//! Background Tasks Module
//!
//! Contains background activities that run for the cache's lifetime.
//!
//! # Tasks
//! - Expiry sweep: reclaims expired entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle};
