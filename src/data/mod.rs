/// Data layer: core types, loading, smoothing and alignment.
///
/// Architecture:
/// ```text
///  data-kafka231.csv   data-kafka240.csv
///        │                    │
///        ▼                    ▼
///   ┌──────────┐         ┌──────────┐
///   │  loader   │         │  loader   │   parse file → MetricTable
///   └──────────┘         └──────────┘
///        │ column(metric)     │
///        ▼                    ▼
///   ┌──────────────────────────────┐
///   │   align  (smooth + pad)      │   two NumericSeries of equal length
///   └──────────────────────────────┘
/// ```

pub mod align;
pub mod loader;
pub mod model;
pub mod smooth;
