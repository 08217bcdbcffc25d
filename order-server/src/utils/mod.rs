//! Utility Module

pub mod logger;
pub mod validation;
