/// Data layer: core types, loading, normalization, filtering and aggregates.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read header + rows → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  rename, trim, coerce Budget, derive IRR_Value → CapexTable
///   └───────────┘
///        │            (held in cache, keyed by path + mtime + length)
///        ▼
///   ┌──────────┐
///   │  filter   │  Factory ∧ Category selection → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  totals, mean return, top spender, grouped sums
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
