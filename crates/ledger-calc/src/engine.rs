//! 週次帳本引擎

use ledger_core::{
    DerivedFields, IsoWeek, LedgerError, Result, WeeklyEntry, WeeklyRecord,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::derivation::LedgerDerivation;
use crate::store::{LedgerStore, ProductCatalog, UpsertOutcome};

/// 單筆寫入結果
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub record: WeeklyRecord,
    pub outcome: UpsertOutcome,
}

/// 每個商品一把寫入鎖
///
/// 讀前週、計算、寫入必須在同一把鎖內完成，同商品的寫入不可交錯。
#[derive(Debug, Default)]
struct ProductLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProductLocks {
    fn lock_for(&self, product_code: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LedgerError::Storage("商品鎖表已中毒".to_string()))?;
        Ok(locks.entry(product_code.to_string()).or_default().clone())
    }
}

/// 週次帳本引擎
///
/// 每次寫入都重新推算出庫數與剩餘週數；歷史資料的出庫數照原樣保存。
pub struct WeeklyLedgerEngine {
    store: Arc<dyn LedgerStore>,
    catalog: Arc<dyn ProductCatalog>,
    locks: ProductLocks,
}

impl WeeklyLedgerEngine {
    /// 創建新的帳本引擎
    pub fn new(store: Arc<dyn LedgerStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self {
            store,
            catalog,
            locks: ProductLocks::default(),
        }
    }

    /// 驗證、推算並寫入一筆週次紀錄
    pub fn derive_and_write(&self, entry: WeeklyEntry) -> Result<WriteOutcome> {
        entry.validate()?;
        let product = self.catalog.require_product(&entry.product_code)?;

        let lock = self.locks.lock_for(&entry.product_code)?;
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::Storage(format!("商品 {} 的寫入鎖已中毒", entry.product_code)))?;

        let derived = if entry.is_historical {
            DerivedFields {
                outgoing_goods: entry.outgoing_goods.unwrap_or(0),
                remaining_weeks: LedgerDerivation::remaining_weeks(entry.inventory, product.forecast)?,
            }
        } else {
            let predecessor = self.store.predecessor(&entry.product_code, entry.week)?;
            let default_outgoing = match predecessor {
                Some(_) => None,
                None => self
                    .catalog
                    .defaults(&entry.product_code)?
                    .map(|defaults| defaults.default_outgoing),
            };

            LedgerDerivation::derive(&entry, predecessor.as_ref(), default_outgoing, product.forecast)?
        };

        let record = WeeklyRecord::from_entry(&entry, derived);
        let outcome = self.store.upsert(record.clone())?;

        tracing::debug!(
            "寫入週次紀錄 {} {}: 入庫 {}, 出庫 {}, 在庫 {}, 剩餘週數 {} ({:?}{})",
            record.product_code,
            record.week,
            record.incoming_goods,
            record.outgoing_goods,
            record.inventory,
            record.remaining_weeks,
            outcome,
            if record.is_historical { ", 歷史" } else { "" }
        );

        // 回傳儲存後的紀錄（更新時ID沿用舊值）
        let record = self
            .store
            .get(&record.product_code, record.week)?
            .unwrap_or(record);

        Ok(WriteOutcome { record, outcome })
    }

    /// 以既有輸入重新推算一筆紀錄（歷史資料照原樣寫回）
    pub fn rederive(&self, product_code: &str, week: IsoWeek) -> Result<Option<WriteOutcome>> {
        let existing = match self.store.get(product_code, week)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let entry = if existing.is_historical {
            WeeklyEntry::historical(
                existing.product_code,
                existing.week,
                existing.incoming_goods,
                existing.outgoing_goods,
                existing.inventory,
            )
        } else {
            WeeklyEntry::new(
                existing.product_code,
                existing.week,
                existing.incoming_goods,
                existing.inventory,
            )
        };

        self.derive_and_write(entry).map(Some)
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<dyn ProductCatalog> {
        &self.catalog
    }
}
