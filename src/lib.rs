//! MOJU Classroom Trading Library
//!
//! This library provides the core components for the MOJU educational
//! mock stock-trading simulator.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
