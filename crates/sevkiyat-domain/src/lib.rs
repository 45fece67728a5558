//! Domain layer - the pure aggregation pipeline and repository traits

pub mod repository;
pub mod service;
