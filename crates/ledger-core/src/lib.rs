//! # Ledger Core
//!
//! 週次庫存帳的核心資料模型與類型定義

pub mod config;
pub mod inventory;
pub mod plan;
pub mod product;
pub mod record;
pub mod sheet;
pub mod tables;
pub mod week;

// Re-export 主要類型
pub use config::{HistoricalColumns, LedgerConfig, UploadColumns};
pub use inventory::{CaseBreakdown, ProductMaster, WeeklyInventory};
pub use plan::FuturePlan;
pub use product::{weekly_forecast, Product, ProductDefaults};
pub use record::{DerivedFields, WeeklyEntry, WeeklyRecord};
pub use sheet::DecodedRow;
pub use tables::{GroupRule, ReferenceTables};
pub use week::IsoWeek;

/// 帳務錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("無效的週次: {0}")]
    InvalidWeek(String),

    #[error("無效的數量: {field} = {value}")]
    InvalidQuantity { field: String, value: i64 },

    #[error("找不到商品: {0}")]
    ProductNotFound(String),

    #[error("重複的輸入: {0}")]
    DuplicateEntry(String),

    #[error("無效的儲存格: {column} = {value:?}")]
    InvalidCell { column: String, value: String },

    #[error("上傳檔案缺少欄位: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("儲存層錯誤: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
