//! 帳本服務：組合引擎、入庫計劃、批量輸入、匯入與報表

use ledger_calc::{
    export_rows, need_attention, BulkEntryWorkflow, BulkLine, BulkOutcome, ExportRow,
    FutureIncomingResolver, HistoricalImporter, ImportReport, InMemoryCatalog,
    InMemoryLedgerStore, LedgerStore, ProductCatalog, WeeklyLedgerEngine,
};
use ledger_core::{DecodedRow, IsoWeek, LedgerConfig, Product, Result, WeeklyRecord};
use ledger_tabular::{quantities_by_product, resolve_upload};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 週次庫存帳服務
pub struct StockLedger {
    config: LedgerConfig,
    engine: Arc<WeeklyLedgerEngine>,
    plans: Arc<FutureIncomingResolver>,
}

impl StockLedger {
    /// 以指定的儲存後端建立服務（先驗證配置）
    pub fn new(
        config: LedgerConfig,
        store: Arc<dyn LedgerStore>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: Arc::new(WeeklyLedgerEngine::new(store, catalog)),
            plans: Arc::new(FutureIncomingResolver::new()),
        })
    }

    /// 記憶體後端
    pub fn in_memory(config: LedgerConfig, products: impl IntoIterator<Item = Product>) -> Result<Self> {
        Self::new(
            config,
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryCatalog::with_products(products)),
        )
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<WeeklyLedgerEngine> {
        &self.engine
    }

    pub fn plans(&self) -> &Arc<FutureIncomingResolver> {
        &self.plans
    }

    /// 送出一週的批量輸入
    pub fn submit_week(&self, week: IsoWeek, lines: &[BulkLine]) -> Result<BulkOutcome> {
        BulkEntryWorkflow::new(self.engine.clone(), self.plans.clone()).submit(week, lines)
    }

    /// 匯入一週的歷史資料
    pub fn import_historical(
        &self,
        week: IsoWeek,
        columns: &[String],
        rows: &[DecodedRow],
    ) -> Result<ImportReport> {
        HistoricalImporter::new(self.engine.clone(), self.config.historical_columns.clone())
            .import(week, columns, rows)
    }

    /// 上傳盤點表，推算每個商品的在庫數（供操作員確認後再送出）
    pub fn prefill_from_upload(
        &self,
        columns: &[String],
        rows: &[DecodedRow],
    ) -> Result<BTreeMap<String, i64>> {
        let resolved = resolve_upload(columns, rows, &self.config)?;
        let products = self.engine.catalog().products()?;
        Ok(quantities_by_product(&resolved, &products))
    }

    /// 最新一週剩餘週數低於門檻的啟用商品
    pub fn need_attention(&self) -> Result<Vec<WeeklyRecord>> {
        need_attention(
            self.engine.store().as_ref(),
            self.engine.catalog().as_ref(),
            self.config.attention_threshold_weeks,
        )
    }

    /// 匯出 `[from, to]` 區間的紀錄
    pub fn export(&self, from: IsoWeek, to: IsoWeek) -> Result<Vec<ExportRow>> {
        export_rows(
            self.engine.store().as_ref(),
            self.engine.catalog().as_ref(),
            from,
            to,
        )
    }

    /// 更新月銷預測（週預測隨之重算）
    pub fn set_monthly_sales_prediction(&self, code: &str, prediction: Decimal) -> Result<Product> {
        let mut product = self.engine.catalog().require_product(code)?;
        product.set_monthly_sales_prediction(prediction);
        self.engine.catalog().upsert_product(product.clone())?;

        tracing::info!("商品 {} 月銷預測更新為 {}，週預測 {}", code, prediction, product.forecast);
        Ok(product)
    }

    /// 切換商品啟用狀態，返回切換後的狀態
    pub fn toggle_active(&self, code: &str) -> Result<bool> {
        let mut product = self.engine.catalog().require_product(code)?;
        let active = product.toggle_active();
        self.engine.catalog().upsert_product(product)?;
        Ok(active)
    }
}
