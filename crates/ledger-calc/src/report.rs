//! 報表：匯出、需注意商品、最新紀錄

use ledger_core::{IsoWeek, Product, Result, WeeklyRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::store::{LedgerStore, ProductCatalog};

/// 匯出用的扁平列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub year: i32,
    pub week_no: u32,
    /// 週日起算標籤；不存在的第 53 週為空字串
    pub week_label: String,
    pub product_code: String,
    pub jan_code: Option<String>,
    pub product_name: String,
    pub classification: Option<String>,
    pub lead_time: Option<String>,
    pub specifications: Option<String>,
    pub monthly_sales_prediction: Decimal,
    pub forecast: Decimal,
    pub incoming_goods: i64,
    pub outgoing_goods: i64,
    pub inventory: i64,
    /// 四捨五入到小數一位
    pub remaining_weeks: Decimal,
    pub is_historical: bool,
}

impl ExportRow {
    fn from_record(record: &WeeklyRecord, product: Option<&Product>) -> Self {
        Self {
            year: record.year(),
            week_no: record.week_no(),
            week_label: record.week.week_label().unwrap_or_default(),
            product_code: record.product_code.clone(),
            jan_code: product.and_then(|p| p.jan_code.clone()),
            product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
            classification: product.and_then(|p| p.classification.clone()),
            lead_time: product.and_then(|p| p.lead_time.clone()),
            specifications: product.and_then(|p| p.specifications.clone()),
            monthly_sales_prediction: product
                .map(|p| p.monthly_sales_prediction)
                .unwrap_or_default(),
            forecast: product.map(|p| p.forecast).unwrap_or_default(),
            incoming_goods: record.incoming_goods,
            outgoing_goods: record.outgoing_goods,
            inventory: record.inventory,
            remaining_weeks: record.remaining_weeks_rounded(),
            is_historical: record.is_historical,
        }
    }
}

fn product_index(catalog: &dyn ProductCatalog) -> Result<HashMap<String, Product>> {
    Ok(catalog
        .products()?
        .into_iter()
        .map(|product| (product.code.clone(), product))
        .collect())
}

/// 匯出 `[from, to]` 區間（含兩端，依 ISO 週時間順序）的紀錄
///
/// 新週在前，同週依商品代碼排序。
pub fn export_rows(
    store: &dyn LedgerStore,
    catalog: &dyn ProductCatalog,
    from: IsoWeek,
    to: IsoWeek,
) -> Result<Vec<ExportRow>> {
    let products = product_index(catalog)?;

    let mut records: Vec<WeeklyRecord> = store
        .all_records()?
        .into_iter()
        .filter(|record| record.week >= from && record.week <= to)
        .collect();
    records.sort_by(|a, b| {
        b.week
            .cmp(&a.week)
            .then_with(|| a.product_code.cmp(&b.product_code))
    });

    let rows: Vec<ExportRow> = records
        .iter()
        .map(|record| ExportRow::from_record(record, products.get(&record.product_code)))
        .collect();

    tracing::debug!("匯出 {} ~ {}：{} 列", from, to, rows.len());
    Ok(rows)
}

/// 需注意商品
///
/// 取有資料的最新一週，只看啟用中的商品，剩餘週數 <= 門檻者依剩餘週數由大到小排列。
pub fn need_attention(
    store: &dyn LedgerStore,
    catalog: &dyn ProductCatalog,
    threshold: Decimal,
) -> Result<Vec<WeeklyRecord>> {
    let records = store.all_records()?;
    let latest_week = match records.iter().map(|record| record.week).max() {
        Some(week) => week,
        None => return Ok(Vec::new()),
    };

    let products = product_index(catalog)?;

    let mut attention: Vec<WeeklyRecord> = records
        .into_iter()
        .filter(|record| record.week == latest_week)
        .filter(|record| {
            products
                .get(&record.product_code)
                .is_some_and(|product| product.is_active)
        })
        .filter(|record| record.remaining_weeks <= threshold)
        .collect();
    attention.sort_by(|a, b| {
        b.remaining_weeks
            .cmp(&a.remaining_weeks)
            .then_with(|| a.product_code.cmp(&b.product_code))
    });

    tracing::debug!(
        "需注意商品 {}（門檻 {} 週）：{} 件",
        latest_week,
        threshold,
        attention.len()
    );
    Ok(attention)
}

/// 每個商品時間上最新的一筆紀錄（依商品代碼排序）
pub fn latest_records(store: &dyn LedgerStore) -> Result<Vec<WeeklyRecord>> {
    let mut latest: HashMap<String, WeeklyRecord> = HashMap::new();
    for record in store.all_records()? {
        match latest.get(&record.product_code) {
            Some(existing) if existing.week >= record.week => {}
            _ => {
                latest.insert(record.product_code.clone(), record);
            }
        }
    }

    let mut records: Vec<WeeklyRecord> = latest.into_values().collect();
    records.sort_by(|a, b| a.product_code.cmp(&b.product_code));
    Ok(records)
}
