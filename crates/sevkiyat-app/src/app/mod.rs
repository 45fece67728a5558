//! Application use cases

pub mod aggregation_service;

pub use aggregation_service::{
    run_aggregation, run_aggregation_cached, AggregationOptions, AggregationServiceError,
};
