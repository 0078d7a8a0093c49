//! 盤點與箱數換算模型

use serde::{Deserialize, Serialize};

use crate::IsoWeek;

/// 箱數換算結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseBreakdown {
    /// 整箱數
    pub cases: i64,
    /// 散裝數
    pub loose: i64,
}

impl CaseBreakdown {
    /// 依每箱入數換算整箱與散裝
    ///
    /// 每箱入數 <= 0 視為「入數未知」，返回 (0, 0)。
    pub fn calculate(total_quantity: i64, pack_quantity: i64) -> Self {
        if pack_quantity <= 0 {
            return Self { cases: 0, loose: 0 };
        }
        Self {
            cases: total_quantity.div_euclid(pack_quantity),
            loose: total_quantity.rem_euclid(pack_quantity),
        }
    }
}

/// 商品主檔（每箱入數）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMaster {
    pub product_code: String,
    pub product_name: String,
    /// 每箱入數
    pub pack_quantity: i64,
}

impl ProductMaster {
    pub fn new(product_code: String, product_name: String, pack_quantity: i64) -> Self {
        Self {
            product_code,
            product_name,
            pack_quantity,
        }
    }

    pub fn breakdown(&self, total_quantity: i64) -> CaseBreakdown {
        CaseBreakdown::calculate(total_quantity, self.pack_quantity)
    }
}

/// 週次盤點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyInventory {
    pub product_code: String,
    pub week: IsoWeek,
    /// 回報總數
    pub total_quantity: i64,
    /// 整箱數（衍生）
    pub no_of_cases: i64,
    /// 散裝數（衍生）
    pub loose: i64,
}

impl WeeklyInventory {
    /// 創建盤點紀錄並依主檔入數換算箱數
    pub fn new(week: IsoWeek, total_quantity: i64, master: &ProductMaster) -> Self {
        let breakdown = master.breakdown(total_quantity);
        Self {
            product_code: master.product_code.clone(),
            week,
            total_quantity,
            no_of_cases: breakdown.cases,
            loose: breakdown.loose,
        }
    }

    /// 入數變更後重算
    pub fn recalculate(&mut self, pack_quantity: i64) {
        let breakdown = CaseBreakdown::calculate(self.total_quantity, pack_quantity);
        self.no_of_cases = breakdown.cases;
        self.loose = breakdown.loose;
    }
}
