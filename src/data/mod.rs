/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SeasonTable (+ required-column check)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  SeasonTable  │  Vec<PlayerRow>, header
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │ ──▶ │  clean    │  role whitelist, then sentinel/coercion
///   └──────────┘     └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group by role → mean/sum × scale, or top-n ranking
///   └───────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
