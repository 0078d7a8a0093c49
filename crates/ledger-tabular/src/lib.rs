//! # Ledger Tabular
//!
//! 盤點表上傳的多階段推算

pub mod mapping;
pub mod pipeline;
pub mod rows;

// Re-export 主要類型
pub use mapping::{quantities_by_product, resolve_upload};
pub use pipeline::{GroupTag, ResolvedRow, TabularPipeline};
pub use rows::{decode_rows, StockCountRow};
