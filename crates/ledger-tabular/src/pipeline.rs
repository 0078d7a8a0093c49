//! 盤點表推算管線
//!
//! 各階段對整批列做完整一輪後才進入下一階段：
//! 權重(E) → 分組(H) → 群組合計(I) → 暫定數(D_pre) → 加權值(F) → 連結值(G) → 最終數量。

use ledger_core::{LedgerError, ReferenceTables, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::rows::StockCountRow;

/// 分組標記
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTag {
    /// 合計範圍
    pub family: String,
    pub subgroup: String,
    /// 子群組內的出現順序（從 1 起算）
    pub index: usize,
    pub multiplier: i64,
}

impl GroupTag {
    /// 診斷用標籤，例如 `D3_2`
    pub fn label(&self) -> String {
        format!("{}_{}", self.subgroup, self.index)
    }
}

/// 推算後的一列（保留所有中間欄位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRow {
    pub code: String,
    pub name: String,
    /// C
    pub reported_count: i64,
    /// E
    pub weight: i64,
    /// H
    pub group: Option<GroupTag>,
    /// I
    pub group_total: i64,
    /// D_pre
    pub preliminary: i64,
    /// F
    pub weighted: i64,
    /// G
    pub linked: i64,
    pub final_quantity: i64,
}

/// 盤點表推算管線（純函數，不持有狀態）
pub struct TabularPipeline<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> TabularPipeline<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    /// 推算每列的最終數量（與輸入同順序）
    ///
    /// 任何中間值超出 i64 範圍時返回 `InvalidQuantity`。
    pub fn resolve(&self, rows: &[StockCountRow]) -> Result<Vec<ResolvedRow>> {
        tracing::debug!("開始盤點表推算：{} 列", rows.len());
        let start_time = std::time::Instant::now();

        tracing::debug!("Step 1: 權重");
        let weights: Vec<i64> = rows
            .par_iter()
            .map(|row| self.tables.weight(&row.code))
            .collect();

        // 出現順序需依列順序編號
        tracing::debug!("Step 2: 分組");
        let groups = self.classify(rows);

        tracing::debug!("Step 3: 群組合計");
        let group_totals = Self::group_totals(rows, &groups)?;
        tracing::debug!("分組列數: {}", groups.iter().filter(|g| g.is_some()).count());

        tracing::debug!("Step 4: 暫定數");
        let preliminary: Vec<i64> = rows
            .par_iter()
            .zip(group_totals.par_iter())
            .map(|(row, &total)| if total > 0 { total } else { row.reported_count })
            .collect();

        tracing::debug!("Step 5: 加權值");
        let weighted: Vec<i64> = rows
            .par_iter()
            .zip(preliminary.par_iter().zip(weights.par_iter()))
            .map(|(row, (&d, &e))| {
                d.checked_mul(e).ok_or_else(|| overflow(format!("weighted[{}]", row.code), d))
            })
            .collect::<Result<Vec<_>>>()?;

        // 須在所有加權值算完之後查表；重複代碼以最後一列為準
        tracing::debug!("Step 6: 連結值");
        let weighted_by_code: HashMap<&str, i64> = rows
            .iter()
            .zip(weighted.iter())
            .map(|(row, &f)| (row.code.as_str(), f))
            .collect();

        let linked: Vec<i64> = rows
            .par_iter()
            .map(|row| {
                self.tables
                    .linked_code(&row.code)
                    .map(|target| weighted_by_code.get(target).copied().unwrap_or(0))
                    .unwrap_or(0)
            })
            .collect();

        tracing::debug!("Step 7: 最終數量");
        let resolved: Vec<ResolvedRow> = rows
            .iter()
            .zip(groups)
            .enumerate()
            .map(|(i, (row, group))| {
                let group_total = group_totals[i];
                let final_quantity = if group_total > 0 {
                    group_total
                } else {
                    row.reported_count
                        .checked_add(linked[i])
                        .ok_or_else(|| overflow(format!("final_quantity[{}]", row.code), linked[i]))?
                };

                Ok(ResolvedRow {
                    code: row.code.clone(),
                    name: row.name.clone(),
                    reported_count: row.reported_count,
                    weight: weights[i],
                    group,
                    group_total,
                    preliminary: preliminary[i],
                    weighted: weighted[i],
                    linked: linked[i],
                    final_quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("盤點表推算完成，耗時 {:?}", start_time.elapsed());
        Ok(resolved)
    }

    fn classify(&self, rows: &[StockCountRow]) -> Vec<Option<GroupTag>> {
        let mut counters: HashMap<&str, usize> = HashMap::new();

        rows.iter()
            .map(|row| {
                self.tables.classify(&row.name).map(|rule| {
                    let index = counters.entry(rule.subgroup.as_str()).or_insert(0);
                    *index += 1;
                    GroupTag {
                        family: rule.family.clone(),
                        subgroup: rule.subgroup.clone(),
                        index: *index,
                        multiplier: rule.multiplier,
                    }
                })
            })
            .collect()
    }

    fn group_totals(rows: &[StockCountRow], groups: &[Option<GroupTag>]) -> Result<Vec<i64>> {
        let mut family_sums: HashMap<&str, i64> = HashMap::new();
        for (row, group) in rows.iter().zip(groups) {
            if let Some(tag) = group {
                let sum = family_sums.entry(tag.family.as_str()).or_insert(0);
                let current = *sum;
                *sum = row
                    .reported_count
                    .checked_mul(tag.multiplier)
                    .and_then(|contribution| current.checked_add(contribution))
                    .ok_or_else(|| overflow(format!("group_total[{}]", tag.family), row.reported_count))?;
            }
        }

        Ok(groups
            .iter()
            .map(|group| match group {
                Some(tag) => family_sums.get(tag.family.as_str()).copied().unwrap_or(0),
                None => 0,
            })
            .collect())
    }
}

fn overflow(field: String, value: i64) -> LedgerError {
    LedgerError::InvalidQuantity { field, value }
}
