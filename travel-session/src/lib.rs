//! Travel route session.
//!
//! Lets a user pick a start and an end on a map and obtain a route between
//! them, optionally comparing the driving, walking and transit options and
//! choosing one.

pub mod cache;
pub mod directions;
pub mod domain;
pub mod driver;
pub mod session;
pub mod view;
