//! 已解碼的上傳表格列
//!
//! 檔案解碼不在此處理：上傳的試算表在進入本模組前已轉為「欄位名 → 值」的有序列。

use serde_json::Value;
use std::collections::HashMap;

use crate::{LedgerError, Result};

/// 一列資料：欄位名 → 儲存格值
pub type DecodedRow = HashMap<String, Value>;

/// 檢查表頭是否包含所有必要欄位
pub fn require_columns(columns: &[String], required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !columns.iter().any(|column| column == *name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::MissingColumns(missing))
    }
}

/// 儲存格轉為去除前後空白的文字
pub fn cell_text(row: &DecodedRow, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// 儲存格轉為整數
///
/// 數字向零截斷，數字字串會被解析，其餘（空值、非數字）一律視為 0。
/// 數值超出 i64 範圍時返回 `InvalidCell`，不做飽和轉換。
pub fn coerce_int(row: &DecodedRow, column: &str) -> Result<i64> {
    let value = row.get(column);
    let parsed = match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(i),
            None => n.as_f64().and_then(truncate_float),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Some(i),
                Err(_) => match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => truncate_float(f),
                    _ => Some(0),
                },
            }
        }
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        _ => Some(0),
    };

    parsed.ok_or_else(|| LedgerError::InvalidCell {
        column: column.to_string(),
        value: value.map(Value::to_string).unwrap_or_default(),
    })
}

/// 向零截斷；超出 i64 範圍為 None
fn truncate_float(f: f64) -> Option<i64> {
    // 2^63
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    let truncated = f.trunc();
    if truncated.is_finite() && truncated >= -BOUND && truncated < BOUND {
        Some(truncated as i64)
    } else {
        None
    }
}
