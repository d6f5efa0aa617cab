//! Shared type definitions for the business metrics platform
//!
//! This module provides the computed-result data model exchanged between the
//! calculation engine, its HTTP surface and any presentation layer consuming
//! exported snapshots.

pub mod api;
pub mod core;

// Re-export core types
pub use self::core::{
    // Benchmarks
    BenchmarkEntry,
    CompetitorProfile,

    // Calculation results
    AdvantageDelta,
    BusinessImpact,
    CompetitiveAdvantage,
    CostBreakdown,
    CostMode,
    InputParameters,
    SavingsResult,

    // Snapshots and insights
    Alert,
    AlertSeverity,
    DataOrigin,
    MetricSnapshot,
};

// Re-export API types
pub use self::api::{
    ErrorDetail, ErrorResponse, ExportDocument, ExportSummary, HealthResponse,
    PerformanceSummary, TimeRange,
};
