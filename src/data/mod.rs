/// Data layer: core types, loading, and binning.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → CarDataset (incomplete rows dropped)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ CarDataset │  Vec<Car>, origin set, Selection over it
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   bin    │  Sturges thresholds → per-bin counts
///   └──────────┘
/// ```

pub mod bin;
pub mod loader;
pub mod model;
