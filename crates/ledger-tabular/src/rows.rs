//! 盤點表列解碼

use ledger_core::sheet::{cell_text, coerce_int, require_columns};
use ledger_core::{DecodedRow, LedgerError, Result, UploadColumns};
use serde::{Deserialize, Serialize};

/// 盤點表的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCountRow {
    pub code: String,
    pub name: String,
    /// 回報數（C 欄）
    pub reported_count: i64,
}

impl StockCountRow {
    pub fn new(code: &str, name: &str, reported_count: i64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            reported_count,
        }
    }
}

/// 將已解碼的表格列轉為盤點列
///
/// 缺少必要欄位時整個檔案拒絕；空白數量視為 0，小數向零截斷，
/// 負數與超出 i64 範圍的數量拒絕。
pub fn decode_rows(
    columns: &[String],
    rows: &[DecodedRow],
    upload_columns: &UploadColumns,
) -> Result<Vec<StockCountRow>> {
    require_columns(columns, &upload_columns.required())?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let reported_count =
                coerce_int(row, &upload_columns.count).map_err(|e| match e {
                    LedgerError::InvalidCell { value, .. } => LedgerError::InvalidCell {
                        column: format!("{}[{}]", upload_columns.count, index + 1),
                        value,
                    },
                    other => other,
                })?;
            if reported_count < 0 {
                return Err(LedgerError::InvalidQuantity {
                    field: format!("{}[{}]", upload_columns.count, index + 1),
                    value: reported_count,
                });
            }

            Ok(StockCountRow {
                code: cell_text(row, &upload_columns.code),
                name: cell_text(row, &upload_columns.name),
                reported_count,
            })
        })
        .collect()
}
