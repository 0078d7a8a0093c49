//! 性質測試

use ledger_calc::{InMemoryCatalog, InMemoryLedgerStore, LedgerStore, ProductCatalog, WeeklyLedgerEngine};
use ledger_core::{CaseBreakdown, IsoWeek, Product, ReferenceTables, WeeklyEntry};
use ledger_tabular::{StockCountRow, TabularPipeline};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn engine(monthly_prediction: i64) -> WeeklyLedgerEngine {
    let catalog = InMemoryCatalog::with_products(vec![Product::new(
        "P".to_string(),
        "商品".to_string(),
        Decimal::from(monthly_prediction),
    )]);
    WeeklyLedgerEngine::new(Arc::new(InMemoryLedgerStore::new()), Arc::new(catalog))
}

fn week_strategy() -> impl Strategy<Value = IsoWeek> {
    (1990i32..2060, 1u32..=52).prop_map(|(year, week)| IsoWeek::new(year, week).unwrap())
}

fn row_strategy() -> impl Strategy<Value = StockCountRow> {
    let codes = prop::sample::select(vec!["02-52-0001", "02-52-0002", "02-99-0059", "02-99-0060", "X-1"]);
    let names = prop::sample::select(vec![
        "ねこちゃんにもやさしいみるく2本",
        "わんちゃんにもやさしいみるく300ml 3本",
        "わんちゃんにもやさしいみるく3個",
        "その他",
    ]);
    (codes, names, 0i64..1000).prop_map(|(code, name, count)| StockCountRow::new(code, name, count))
}

proptest! {
    #[test]
    fn conservation_holds_with_predecessor(
        week in week_strategy(),
        previous_inventory in 0i64..100_000,
        incoming in 0i64..100_000,
        inventory in 0i64..100_000,
    ) {
        let engine = engine(300);
        let previous = week.previous().unwrap();
        engine
            .derive_and_write(WeeklyEntry::new("P".to_string(), previous, 0, previous_inventory))
            .unwrap();

        let written = engine
            .derive_and_write(WeeklyEntry::new("P".to_string(), week, incoming, inventory))
            .unwrap();

        prop_assert_eq!(
            written.record.outgoing_goods,
            (previous_inventory + incoming - inventory).abs()
        );
    }

    #[test]
    fn first_period_uses_default_outgoing(
        week in week_strategy(),
        default_outgoing in 0i64..1000,
        incoming in 0i64..100_000,
        inventory in 0i64..100_000,
    ) {
        let engine = engine(300);
        engine.catalog().set_default_outgoing("P", default_outgoing).unwrap();

        let written = engine
            .derive_and_write(WeeklyEntry::new("P".to_string(), week, incoming, inventory))
            .unwrap();
        prop_assert_eq!(written.record.outgoing_goods, default_outgoing);
    }

    #[test]
    fn historical_outgoing_is_never_rederived(
        week in week_strategy(),
        previous_inventory in 0i64..100_000,
        outgoing in 0i64..100_000,
        inventory in 0i64..100_000,
    ) {
        let engine = engine(300);
        engine
            .derive_and_write(WeeklyEntry::new("P".to_string(), week.previous().unwrap(), 0, previous_inventory))
            .unwrap();

        engine
            .derive_and_write(WeeklyEntry::historical("P".to_string(), week, 0, outgoing, inventory))
            .unwrap();
        engine.rederive("P", week).unwrap();

        let stored = engine.store().get("P", week).unwrap().unwrap();
        prop_assert_eq!(stored.outgoing_goods, outgoing);
    }

    #[test]
    fn non_positive_forecast_gives_zero_remaining(
        monthly_prediction in -1000i64..=0,
        inventory in 0i64..100_000,
        week in week_strategy(),
    ) {
        let engine = engine(monthly_prediction);
        let written = engine
            .derive_and_write(WeeklyEntry::new("P".to_string(), week, 0, inventory))
            .unwrap();
        prop_assert_eq!(written.record.remaining_weeks, Decimal::ZERO);
    }

    #[test]
    fn pipeline_is_idempotent(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let tables = ReferenceTables::default();
        let pipeline = TabularPipeline::new(&tables);
        prop_assert_eq!(pipeline.resolve(&rows).unwrap(), pipeline.resolve(&rows).unwrap());
    }

    #[test]
    fn grouped_rows_share_family_total(rows in prop::collection::vec(row_strategy(), 1..40)) {
        let tables = ReferenceTables::default();
        let resolved = TabularPipeline::new(&tables).resolve(&rows).unwrap();

        for a in &resolved {
            for b in &resolved {
                if let (Some(ga), Some(gb)) = (&a.group, &b.group) {
                    if ga.family == gb.family {
                        prop_assert_eq!(a.group_total, b.group_total);
                    }
                }
            }
            if a.group.is_none() {
                prop_assert_eq!(a.group_total, 0);
                prop_assert_eq!(a.final_quantity, a.reported_count + a.linked);
            }
        }
    }

    #[test]
    fn case_breakdown_recomposes(total in 0i64..1_000_000, pack in 1i64..500) {
        let breakdown = CaseBreakdown::calculate(total, pack);
        prop_assert_eq!(breakdown.cases * pack + breakdown.loose, total);
        prop_assert!(breakdown.loose < pack);
    }
}

#[test]
fn week_one_predecessor_follows_iso_calendar() {
    // 2020 年有 53 週，2023 年只有 52 週
    assert_eq!(IsoWeek::new(2021, 1).unwrap().previous(), Some(IsoWeek::new(2020, 53).unwrap()));
    assert_eq!(IsoWeek::new(2024, 1).unwrap().previous(), Some(IsoWeek::new(2023, 52).unwrap()));
}
