//! # 週次庫存帳範例
//!
//! 展示一個商品從首週輸入、入庫計劃、盤點表上傳到需注意清單的流程。
//! 以 `RUST_LOG=debug cargo run --example weekly_ledger` 查看推算細節。

use ledger_calc::{BulkLine, ProductCatalog};
use ledger_core::{DecodedRow, IsoWeek, LedgerConfig, Product};
use rust_decimal::Decimal;
use serde_json::json;
use stock_ledger::{logging, StockLedger};

fn main() -> anyhow::Result<()> {
    logging::init();

    println!("===== 週次庫存帳範例 =====\n");

    // 步驟 1: 建立商品目錄
    println!("[1] 建立商品目錄");
    let products = vec![
        Product::new("02-52-0001".to_string(), "みるく単品".to_string(), Decimal::from(150)),
        Product::new("02-99-0059".to_string(), "みるくセット".to_string(), Decimal::from(60)),
    ];
    for product in &products {
        println!("    {} {}：週預測 {}", product.code, product.name, product.forecast);
    }
    let ledger = StockLedger::in_memory(LedgerConfig::default(), products)?;
    ledger.engine().catalog().set_default_outgoing("02-52-0001", 30)?;
    println!();

    // 步驟 2: 首週輸入
    let first_week = IsoWeek::parse("2024-W51")?;
    println!("[2] 首週輸入 {}（{}）", first_week, first_week.week_label()?);
    ledger.submit_week(
        first_week,
        &[
            BulkLine::new("02-52-0001".to_string(), Some(0), 210),
            BulkLine::new("02-99-0059".to_string(), Some(0), 20),
        ],
    )?;
    println!();

    // 步驟 3: 登錄下週入庫計劃
    let next_week = first_week
        .next()
        .ok_or_else(|| anyhow::anyhow!("{} 沒有下一週", first_week))?;
    println!("[3] 登錄 {} 入庫計劃", next_week);
    ledger.plans().upsert_plan("02-52-0001", next_week, 100)?;
    println!();

    // 步驟 4: 上傳盤點表並推算在庫
    println!("[4] 上傳盤點表");
    let columns = vec!["商品コード".to_string(), "商品名".to_string(), "総数".to_string()];
    let rows = vec![
        upload_row("02-52-0001", "みるく単品", 3),
        upload_row("02-99-0059", "みるくセット", 5),
    ];
    let quantities = ledger.prefill_from_upload(&columns, &rows)?;
    for (code, quantity) in &quantities {
        println!("    {}：{}", code, quantity);
    }
    println!();

    // 步驟 5: 送出（未輸入的入庫數使用計劃值）
    println!("[5] 送出 {}", next_week);
    let lines: Vec<BulkLine> = quantities
        .iter()
        .map(|(code, quantity)| BulkLine::new(code.clone(), None, *quantity))
        .collect();
    let outcome = ledger.submit_week(next_week, &lines)?;
    println!("    新增 {} 筆，更新 {} 筆\n", outcome.created, outcome.updated);

    // 步驟 6: 匯出
    println!("[6] 匯出");
    for row in ledger.export(first_week, next_week)? {
        println!(
            "    {} {} {}：入庫 {:>4} 出庫 {:>4} 在庫 {:>4} 剩餘 {} 週",
            row.week_label,
            row.product_code,
            row.product_name,
            row.incoming_goods,
            row.outgoing_goods,
            row.inventory,
            row.remaining_weeks
        );
    }
    println!();

    // 步驟 7: 需注意商品
    println!("[7] 需注意商品（{} 週以下）", ledger.config().attention_threshold_weeks);
    for record in ledger.need_attention()? {
        println!("    {}：剩餘 {} 週", record.product_code, record.remaining_weeks_rounded());
    }

    Ok(())
}

fn upload_row(code: &str, name: &str, count: i64) -> DecodedRow {
    DecodedRow::from([
        ("商品コード".to_string(), json!(code)),
        ("商品名".to_string(), json!(name)),
        ("総数".to_string(), json!(count)),
    ])
}
