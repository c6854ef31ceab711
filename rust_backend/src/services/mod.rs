//! Service layer for analytics and application orchestration.
//!
//! Services sit between the repository layer and the application. They turn
//! loaded records into chart-ready data and wire the collaborators together.
//!
//! - [`categories`]: candidate lists and series-key resolution
//! - [`analytics`]: eligibility, period placement and bucket aggregation
//! - [`detail`]: donut series and drill-down rows
//! - [`nice_axis`]: chart axis ceilings and ticks
//! - [`summary`]: roster metrics and category breakdowns
//! - [`company`]: company-name cache
//! - [`bootstrap`]: workspace loading

pub mod analytics;
pub mod bootstrap;
pub mod categories;
pub mod company;
pub mod detail;
pub mod nice_axis;
pub mod summary;

pub use analytics::{
    aggregate, prepare_analytics_rows, Aggregation, AggregationRequest, AnalyticsDataset,
    AnalyticsFilter, AnalyticsRow, AnalyticsSettings, Axis, Bucket, ImputationPolicy,
    PeriodResolver, RowPredicate, SeriesMode,
};
pub use bootstrap::{load_workspace, Workspace};
pub use categories::{CategoryCandidates, UNKNOWN_CATEGORY};
pub use company::CompanyNameCache;
pub use detail::{build_detail_rows, build_donut_series, detail_rows_by_selection, DetailRow, DetailSelection, DonutSlice};
pub use nice_axis::{nice_axis, NiceAxis, NiceAxisRequest};
pub use summary::{build_breakdown, roster_metrics, RosterMetrics, SummaryCategory};
