//! # Ledger Calculation Engine
//!
//! 週次帳本推算引擎、儲存介面、批量輸入、歷史匯入與報表

pub mod bulk;
pub mod derivation;
pub mod engine;
pub mod future_incoming;
pub mod historical;
pub mod report;
pub mod store;

// Re-export 主要類型
pub use bulk::{BulkEntryWorkflow, BulkLine, BulkOutcome};
pub use derivation::LedgerDerivation;
pub use engine::{WeeklyLedgerEngine, WriteOutcome};
pub use future_incoming::FutureIncomingResolver;
pub use historical::{HistoricalImporter, ImportReport};
pub use report::{export_rows, latest_records, need_attention, ExportRow};
pub use store::{InMemoryCatalog, InMemoryLedgerStore, LedgerStore, ProductCatalog, UpsertOutcome};
