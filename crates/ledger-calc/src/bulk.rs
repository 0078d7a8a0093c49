//! 批量週次輸入（多商品、同一週）

use ledger_core::{IsoWeek, LedgerError, Result, WeeklyEntry, WeeklyRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::engine::WeeklyLedgerEngine;
use crate::future_incoming::FutureIncomingResolver;
use crate::store::ProductCatalog;

/// 批量輸入的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkLine {
    pub product_code: String,
    /// 未輸入時使用未來入庫計劃
    pub incoming_goods: Option<i64>,
    pub inventory: i64,
}

impl BulkLine {
    pub fn new(product_code: String, incoming_goods: Option<i64>, inventory: i64) -> Self {
        Self {
            product_code,
            incoming_goods,
            inventory,
        }
    }
}

/// 批量輸入結果
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub created: usize,
    pub updated: usize,
    /// 寫入後的紀錄（與輸入行同順序）
    pub records: Vec<WeeklyRecord>,
}

/// 批量週次輸入流程
///
/// 先驗證整批，全部通過才寫入；每個商品的推算只依賴自己的前週紀錄，可平行處理。
pub struct BulkEntryWorkflow {
    engine: Arc<WeeklyLedgerEngine>,
    plans: Arc<FutureIncomingResolver>,
}

impl BulkEntryWorkflow {
    pub fn new(engine: Arc<WeeklyLedgerEngine>, plans: Arc<FutureIncomingResolver>) -> Self {
        Self { engine, plans }
    }

    /// 送出一週的批量輸入
    pub fn submit(&self, week: IsoWeek, lines: &[BulkLine]) -> Result<BulkOutcome> {
        tracing::info!("開始批量輸入 {}：{} 筆", week, lines.len());
        let start_time = std::time::Instant::now();

        if let Err(e) = self.validate(lines) {
            tracing::warn!("批量輸入 {} 被拒絕: {}", week, e);
            return Err(e);
        }

        let results: Vec<(WeeklyRecord, bool)> = lines
            .par_iter()
            .map(|line| self.process_line(week, line))
            .collect::<Result<Vec<_>>>()?;

        let mut outcome = BulkOutcome::default();
        for (record, created) in results {
            if created {
                outcome.created += 1;
            } else {
                outcome.updated += 1;
            }
            outcome.records.push(record);
        }

        tracing::info!(
            "批量輸入 {} 完成：新增 {} 筆，更新 {} 筆，耗時 {:?}",
            week,
            outcome.created,
            outcome.updated,
            start_time.elapsed()
        );

        Ok(outcome)
    }

    /// 整批驗證：商品存在、數量不為負、同批不重複
    fn validate(&self, lines: &[BulkLine]) -> Result<()> {
        let mut seen = HashSet::new();
        for line in lines {
            if !seen.insert(line.product_code.as_str()) {
                return Err(LedgerError::DuplicateEntry(line.product_code.clone()));
            }
            self.engine.catalog().require_product(&line.product_code)?;

            if let Some(incoming) = line.incoming_goods.filter(|v| *v < 0) {
                return Err(LedgerError::InvalidQuantity {
                    field: format!("incoming_goods[{}]", line.product_code),
                    value: incoming,
                });
            }
            if line.inventory < 0 {
                return Err(LedgerError::InvalidQuantity {
                    field: format!("inventory[{}]", line.product_code),
                    value: line.inventory,
                });
            }
        }
        Ok(())
    }

    fn process_line(&self, week: IsoWeek, line: &BulkLine) -> Result<(WeeklyRecord, bool)> {
        let incoming = match line.incoming_goods {
            Some(incoming) => incoming,
            None => self.plans.default_incoming(&line.product_code, week)?,
        };

        let written = self.engine.derive_and_write(WeeklyEntry::new(
            line.product_code.clone(),
            week,
            incoming,
            line.inventory,
        ))?;

        self.plans.materialize(&line.product_code, week)?;

        Ok((written.record, written.outcome.is_created()))
    }
}
