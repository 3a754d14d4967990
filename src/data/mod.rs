/// Data layer: core types, loading, caching, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (Trade Balance derived here)
///   └──────────┘
///        │  memoized by content hash (cache)
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, distinct-value + extent indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec × Dataset → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  KPIs + Pearson correlation matrix
///   └──────────┘
/// ```
pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
