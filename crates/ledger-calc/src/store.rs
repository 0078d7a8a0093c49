//! 儲存層介面與記憶體實作
//!
//! 引擎只依賴 `LedgerStore` / `ProductCatalog` 兩個介面，持久化後端自行實作即可。

use ledger_core::{IsoWeek, LedgerError, Product, ProductDefaults, Result, WeeklyRecord};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// 寫入結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn is_created(&self) -> bool {
        *self == UpsertOutcome::Created
    }
}

// ==========================================
// LedgerStore
// ==========================================

/// 週次紀錄儲存，以 (商品, 週) 為鍵
pub trait LedgerStore: Send + Sync {
    /// 單筆查詢
    fn get(&self, product_code: &str, week: IsoWeek) -> Result<Option<WeeklyRecord>>;

    /// 寫入；已存在時沿用原紀錄ID
    fn upsert(&self, record: WeeklyRecord) -> Result<UpsertOutcome>;

    /// 某商品的全部紀錄（依 ISO 週時間順序）
    fn records_for(&self, product_code: &str) -> Result<Vec<WeeklyRecord>>;

    /// 全部紀錄（依商品代碼、週次排序）
    fn all_records(&self) -> Result<Vec<WeeklyRecord>>;

    /// 前一個 ISO 週的紀錄
    fn predecessor(&self, product_code: &str, week: IsoWeek) -> Result<Option<WeeklyRecord>> {
        match week.previous() {
            Some(prev) => self.get(product_code, prev),
            None => Ok(None),
        }
    }
}

fn lock_error() -> LedgerError {
    LedgerError::Storage("儲存鎖已中毒".to_string())
}

/// 記憶體週次紀錄儲存
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    records: RwLock<HashMap<String, BTreeMap<IsoWeek, WeeklyRecord>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 紀錄筆數
    pub fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| lock_error())?;
        Ok(records.values().map(BTreeMap::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get(&self, product_code: &str, week: IsoWeek) -> Result<Option<WeeklyRecord>> {
        let records = self.records.read().map_err(|_| lock_error())?;
        Ok(records
            .get(product_code)
            .and_then(|weeks| weeks.get(&week))
            .cloned())
    }

    fn upsert(&self, record: WeeklyRecord) -> Result<UpsertOutcome> {
        let mut records = self.records.write().map_err(|_| lock_error())?;
        let weeks = records.entry(record.product_code.clone()).or_default();

        match weeks.get(&record.week).map(|existing| existing.id) {
            Some(existing_id) => {
                let record = record.with_id(existing_id);
                weeks.insert(record.week, record);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                weeks.insert(record.week, record);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    fn records_for(&self, product_code: &str) -> Result<Vec<WeeklyRecord>> {
        let records = self.records.read().map_err(|_| lock_error())?;
        Ok(records
            .get(product_code)
            .map(|weeks| weeks.values().cloned().collect())
            .unwrap_or_default())
    }

    fn all_records(&self) -> Result<Vec<WeeklyRecord>> {
        let records = self.records.read().map_err(|_| lock_error())?;
        let mut codes: Vec<&String> = records.keys().collect();
        codes.sort();

        Ok(codes
            .into_iter()
            .flat_map(|code| records[code].values().cloned())
            .collect())
    }
}

// ==========================================
// ProductCatalog
// ==========================================

/// 商品與商品預設值
pub trait ProductCatalog: Send + Sync {
    fn product(&self, code: &str) -> Result<Option<Product>>;

    /// 全部商品（依代碼排序）
    fn products(&self) -> Result<Vec<Product>>;

    fn upsert_product(&self, product: Product) -> Result<UpsertOutcome>;

    fn defaults(&self, code: &str) -> Result<Option<ProductDefaults>>;

    /// 取得預設值，不存在時建立（出庫預設 0）
    fn ensure_defaults(&self, code: &str) -> Result<ProductDefaults>;

    fn set_default_outgoing(&self, code: &str, default_outgoing: i64) -> Result<ProductDefaults>;

    /// 取得商品，不存在時返回 `ProductNotFound`
    fn require_product(&self, code: &str) -> Result<Product> {
        self.product(code)?
            .ok_or_else(|| LedgerError::ProductNotFound(code.to_string()))
    }
}

/// 記憶體商品目錄
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<BTreeMap<String, Product>>,
    defaults: RwLock<HashMap<String, ProductDefaults>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由商品列表建立目錄
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.code.clone(), product))
            .collect();
        Self {
            products: RwLock::new(products),
            defaults: RwLock::new(HashMap::new()),
        }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product(&self, code: &str) -> Result<Option<Product>> {
        let products = self.products.read().map_err(|_| lock_error())?;
        Ok(products.get(code).cloned())
    }

    fn products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().map_err(|_| lock_error())?;
        Ok(products.values().cloned().collect())
    }

    fn upsert_product(&self, product: Product) -> Result<UpsertOutcome> {
        let mut products = self.products.write().map_err(|_| lock_error())?;
        match products.insert(product.code.clone(), product) {
            Some(_) => Ok(UpsertOutcome::Updated),
            None => Ok(UpsertOutcome::Created),
        }
    }

    fn defaults(&self, code: &str) -> Result<Option<ProductDefaults>> {
        let defaults = self.defaults.read().map_err(|_| lock_error())?;
        Ok(defaults.get(code).cloned())
    }

    fn ensure_defaults(&self, code: &str) -> Result<ProductDefaults> {
        self.require_product(code)?;

        let mut defaults = self.defaults.write().map_err(|_| lock_error())?;
        Ok(defaults
            .entry(code.to_string())
            .or_insert_with(|| ProductDefaults::new(code.to_string()))
            .clone())
    }

    fn set_default_outgoing(&self, code: &str, default_outgoing: i64) -> Result<ProductDefaults> {
        self.require_product(code)?;

        let mut defaults = self.defaults.write().map_err(|_| lock_error())?;
        let entry = defaults
            .entry(code.to_string())
            .or_insert_with(|| ProductDefaults::new(code.to_string()));
        entry.default_outgoing = default_outgoing;
        Ok(entry.clone())
    }
}
