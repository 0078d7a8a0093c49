//! 上傳盤點表 → 商品數量

use ledger_core::{DecodedRow, LedgerConfig, Product, Result};
use std::collections::{BTreeMap, HashMap};

use crate::pipeline::{ResolvedRow, TabularPipeline};
use crate::rows::decode_rows;

/// 驗證欄位、解碼並推算上傳的盤點表
pub fn resolve_upload(
    columns: &[String],
    rows: &[DecodedRow],
    config: &LedgerConfig,
) -> Result<Vec<ResolvedRow>> {
    let start_time = std::time::Instant::now();

    let decoded = decode_rows(columns, rows, &config.upload_columns)?;
    let resolved = TabularPipeline::new(&config.reference_tables).resolve(&decoded)?;

    tracing::info!(
        "盤點表推算完成：{} 列，耗時 {:?}",
        resolved.len(),
        start_time.elapsed()
    );
    Ok(resolved)
}

/// 每個商品對應的最終數量
///
/// 以第一個帶有該代碼的列為準；表中沒有的商品為 0。
pub fn quantities_by_product(resolved: &[ResolvedRow], products: &[Product]) -> BTreeMap<String, i64> {
    let mut first_by_code: HashMap<&str, i64> = HashMap::new();
    for row in resolved {
        first_by_code
            .entry(row.code.as_str())
            .or_insert(row.final_quantity);
    }

    let quantities: BTreeMap<String, i64> = products
        .iter()
        .map(|product| {
            let quantity = first_by_code.get(product.code.as_str()).copied().unwrap_or(0);
            (product.code.clone(), quantity)
        })
        .collect();

    let unmatched = resolved
        .iter()
        .filter(|row| !quantities.contains_key(&row.code))
        .count();
    if unmatched > 0 {
        tracing::warn!("盤點表有 {} 列的代碼不在商品目錄", unmatched);
    }

    quantities
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{LedgerError, ReferenceTables};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};

    fn columns() -> Vec<String> {
        vec!["商品コード".to_string(), "商品名".to_string(), "総数".to_string()]
    }

    fn row(code: &str, name: &str, count: Value) -> DecodedRow {
        DecodedRow::from([
            ("商品コード".to_string(), json!(code)),
            ("商品名".to_string(), json!(name)),
            ("総数".to_string(), count),
        ])
    }

    fn product(code: &str) -> Product {
        Product::new(code.to_string(), code.to_string(), Decimal::from(30))
    }

    #[test]
    fn test_upload_to_product_quantities() {
        let config = LedgerConfig::default();
        let rows = vec![
            row("02-99-0059", "セット", json!(1)),
            row("02-52-0001", "単品", json!(2)),
            row("UNKNOWN", "その他", json!(9)),
        ];

        let resolved = resolve_upload(&columns(), &rows, &config).unwrap();
        let quantities = quantities_by_product(
            &resolved,
            &[product("02-99-0059"), product("02-52-0001"), product("NOT-IN-FILE")],
        );

        assert_eq!(quantities["02-99-0059"], 51);
        assert_eq!(quantities["02-52-0001"], 2);
        assert_eq!(quantities["NOT-IN-FILE"], 0);
        assert!(!quantities.contains_key("UNKNOWN"));
    }

    #[test]
    fn test_first_row_for_code_wins() {
        let config = LedgerConfig::default().with_reference_tables(ReferenceTables::empty());
        let rows = vec![row("A", "x", json!(3)), row("A", "x", json!(8))];

        let resolved = resolve_upload(&columns(), &rows, &config).unwrap();
        let quantities = quantities_by_product(&resolved, &[product("A")]);
        assert_eq!(quantities["A"], 3);
    }

    #[test]
    fn test_upload_rejects_missing_columns() {
        let columns = vec!["商品名".to_string()];
        let result = resolve_upload(&columns, &[], &LedgerConfig::default());

        match result {
            Err(LedgerError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["商品コード", "総数"]);
            }
            other => panic!("預期 MissingColumns，得到 {:?}", other),
        }
    }

    #[test]
    fn test_upload_rejects_overflowing_count() {
        // 1e18 * 25 超出 i64
        let rows = vec![row("02-52-0001", "単品", json!(1e18))];
        let result = resolve_upload(&columns(), &rows, &LedgerConfig::default());

        assert!(matches!(
            result,
            Err(LedgerError::InvalidQuantity { ref field, .. }) if field == "weighted[02-52-0001]"
        ));
    }
}
