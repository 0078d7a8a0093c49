//! # Stock Ledger
//!
//! 週次庫存帳：帳本推算、未來入庫計劃、盤點表上傳推算、歷史匯入與報表

pub mod logging;
pub mod service;

pub use ledger_calc;
pub use ledger_core;
pub use ledger_tabular;

pub use ledger_core::{IsoWeek, LedgerConfig, LedgerError, Product, Result, WeeklyRecord};
pub use service::StockLedger;
