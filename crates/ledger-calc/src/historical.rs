//! 歷史資料匯入

use ledger_core::sheet::{cell_text, coerce_int, require_columns};
use ledger_core::{DecodedRow, HistoricalColumns, IsoWeek, LedgerError, Result, WeeklyEntry};
use std::sync::Arc;

use crate::engine::WeeklyLedgerEngine;
use crate::store::ProductCatalog;

/// 匯入結果
#[derive(Debug, Default)]
pub struct ImportReport {
    /// 成功寫入的筆數
    pub imported: usize,
    /// 商品目錄中找不到的代碼（依出現順序，不重複）
    pub missing_codes: Vec<String>,
    /// 被拒絕的列（代碼, 原因）；沒有代碼的列以 `#列號` 標示
    pub rejected: Vec<(String, LedgerError)>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.missing_codes.is_empty() && self.rejected.is_empty()
    }
}

/// 歷史資料匯入器
///
/// 出庫數照檔案原樣保存，不由前週推算。
pub struct HistoricalImporter {
    engine: Arc<WeeklyLedgerEngine>,
    columns: HistoricalColumns,
}

impl HistoricalImporter {
    pub fn new(engine: Arc<WeeklyLedgerEngine>, columns: HistoricalColumns) -> Self {
        Self { engine, columns }
    }

    /// 匯入一週的歷史資料
    ///
    /// 表頭缺少必要欄位時整個檔案拒絕；單列錯誤只記錄在報告中。
    pub fn import(&self, week: IsoWeek, columns: &[String], rows: &[DecodedRow]) -> Result<ImportReport> {
        require_columns(columns, &self.columns.required())?;
        tracing::info!("開始匯入歷史資料 {}：{} 列", week, rows.len());

        let mut report = ImportReport::default();

        for (index, row) in rows.iter().enumerate() {
            let code = cell_text(row, &self.columns.code);
            if code.is_empty() {
                // 沒有代碼的列以列號標示
                report.rejected.push((
                    format!("#{}", index + 1),
                    LedgerError::InvalidCell {
                        column: self.columns.code.clone(),
                        value: String::new(),
                    },
                ));
                continue;
            }

            if self.engine.catalog().product(&code)?.is_none() {
                if !report.missing_codes.contains(&code) {
                    report.missing_codes.push(code);
                }
                continue;
            }

            let entry = match self.entry_for(&code, week, row) {
                Ok(entry) => entry,
                Err(e) => {
                    report.rejected.push((code, e));
                    continue;
                }
            };

            match self.engine.derive_and_write(entry) {
                Ok(_) => report.imported += 1,
                Err(e @ LedgerError::Storage(_)) => return Err(e),
                Err(e) => report.rejected.push((code, e)),
            }
        }

        if !report.missing_codes.is_empty() {
            tracing::warn!(
                "歷史資料 {} 有 {} 個代碼不在商品目錄: {}",
                week,
                report.missing_codes.len(),
                report.missing_codes.join(", ")
            );
        }
        for (code, reason) in &report.rejected {
            tracing::warn!("歷史資料 {} 拒絕 {}: {}", week, code, reason);
        }
        tracing::info!("歷史資料 {} 匯入完成：{} 筆", week, report.imported);

        Ok(report)
    }

    fn entry_for(&self, code: &str, week: IsoWeek, row: &DecodedRow) -> Result<WeeklyEntry> {
        Ok(WeeklyEntry::historical(
            code.to_string(),
            week,
            coerce_int(row, &self.columns.incoming)?,
            coerce_int(row, &self.columns.outgoing)?,
            coerce_int(row, &self.columns.inventory)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryCatalog, InMemoryLedgerStore, LedgerStore};
    use ledger_core::Product;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};

    fn importer() -> (HistoricalImporter, Arc<WeeklyLedgerEngine>) {
        let catalog = InMemoryCatalog::with_products(vec![
            Product::new("A-1".to_string(), "商品A".to_string(), Decimal::from(30)),
            Product::new("B-2".to_string(), "商品B".to_string(), Decimal::from(60)),
        ]);
        let engine = Arc::new(WeeklyLedgerEngine::new(
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(catalog),
        ));
        (HistoricalImporter::new(engine.clone(), HistoricalColumns::default()), engine)
    }

    fn columns() -> Vec<String> {
        HistoricalColumns::default()
            .required()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn row(code: Value, incoming: Value, outgoing: Value, inventory: Value) -> DecodedRow {
        let c = HistoricalColumns::default();
        DecodedRow::from([
            (c.code, code),
            (c.incoming, incoming),
            (c.outgoing, outgoing),
            (c.inventory, inventory),
        ])
    }

    #[test]
    fn test_import_keeps_outgoing_and_reports_missing() {
        let (importer, engine) = importer();
        let week = IsoWeek::new(2023, 40).unwrap();

        let rows = vec![
            row(json!(" A-1 "), json!(5), json!("12"), json!(14.9)),
            row(json!("ZZ-9"), json!(1), json!(1), json!(1)),
            row(json!("B-2"), json!(null), json!("abc"), json!(42)),
            row(json!(""), json!(1), json!(1), json!(1)),
        ];

        let report = importer.import(week, &columns(), &rows).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.missing_codes, vec!["ZZ-9".to_string()]);

        // 空白代碼列不會被默默略過
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, "#4");
        assert!(matches!(
            &report.rejected[0].1,
            LedgerError::InvalidCell { column, .. } if column == "yayoi_code"
        ));
        assert!(!report.is_clean());

        let a = engine.store().get("A-1", week).unwrap().unwrap();
        assert!(a.is_historical);
        assert_eq!(a.incoming_goods, 5);
        assert_eq!(a.outgoing_goods, 12);
        assert_eq!(a.inventory, 14);
        // 14 / 7 = 2
        assert_eq!(a.remaining_weeks, Decimal::from(2));

        let b = engine.store().get("B-2", week).unwrap().unwrap();
        assert_eq!(b.incoming_goods, 0);
        assert_eq!(b.outgoing_goods, 0);
    }

    #[test]
    fn test_missing_columns_rejects_file() {
        let (importer, _) = importer();
        let week = IsoWeek::new(2023, 40).unwrap();
        let columns = vec!["yayoi_code".to_string(), "inventory".to_string()];

        match importer.import(week, &columns, &[]) {
            Err(LedgerError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["incoming", "outgoing"]);
            }
            other => panic!("預期 MissingColumns，得到 {:?}", other),
        }
    }

    #[test]
    fn test_negative_cell_is_rejected_per_row() {
        let (importer, engine) = importer();
        let week = IsoWeek::new(2023, 41).unwrap();

        let rows = vec![
            row(json!("A-1"), json!(-5), json!(0), json!(10)),
            row(json!("B-2"), json!(0), json!(0), json!(10)),
        ];

        let report = importer.import(week, &columns(), &rows).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, "A-1");
        assert!(!report.is_clean());
        assert!(engine.store().get("A-1", week).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_cell_is_rejected_per_row() {
        let (importer, engine) = importer();
        let week = IsoWeek::new(2023, 42).unwrap();

        let rows = vec![
            row(json!("A-1"), json!(0), json!(0), json!(1e20)),
            row(json!("B-2"), json!(0), json!(0), json!(10)),
        ];

        let report = importer.import(week, &columns(), &rows).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.rejected[0].0, "A-1");
        assert!(matches!(
            &report.rejected[0].1,
            LedgerError::InvalidCell { column, .. } if column == "inventory"
        ));
        assert!(engine.store().get("A-1", week).unwrap().is_none());
    }
}
