//! 週次紀錄模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{IsoWeek, LedgerError, Result};

/// 寫入帳本的輸入
///
/// 非歷史資料的 `outgoing_goods` 一律由引擎推算，輸入值會被忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    pub product_code: String,
    pub week: IsoWeek,
    pub incoming_goods: i64,
    pub inventory: i64,
    pub outgoing_goods: Option<i64>,
    pub is_historical: bool,
}

impl WeeklyEntry {
    /// 創建一般輸入（衍生欄位由引擎計算）
    pub fn new(product_code: String, week: IsoWeek, incoming_goods: i64, inventory: i64) -> Self {
        Self {
            product_code,
            week,
            incoming_goods,
            inventory,
            outgoing_goods: None,
            is_historical: false,
        }
    }

    /// 創建歷史輸入（出庫數照原樣保存）
    pub fn historical(
        product_code: String,
        week: IsoWeek,
        incoming_goods: i64,
        outgoing_goods: i64,
        inventory: i64,
    ) -> Self {
        Self {
            product_code,
            week,
            incoming_goods,
            inventory,
            outgoing_goods: Some(outgoing_goods),
            is_historical: true,
        }
    }

    /// 檢查數量欄位（皆不可為負）
    pub fn validate(&self) -> Result<()> {
        check_non_negative("incoming_goods", self.incoming_goods)?;
        check_non_negative("inventory", self.inventory)?;
        if let Some(outgoing) = self.outgoing_goods {
            check_non_negative("outgoing_goods", outgoing)?;
        }
        Ok(())
    }
}

fn check_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(LedgerError::InvalidQuantity {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// 引擎推算的欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFields {
    pub outgoing_goods: i64,
    pub remaining_weeks: Decimal,
}

/// 週次紀錄，以 (商品, 年, 週) 唯一識別
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    /// 紀錄ID
    pub id: Uuid,

    pub product_code: String,

    pub week: IsoWeek,

    /// 入庫數（操作員輸入）
    pub incoming_goods: i64,

    /// 出庫數（推算，歷史資料除外）
    pub outgoing_goods: i64,

    /// 在庫數（操作員輸入，以此為準）
    pub inventory: i64,

    /// 剩餘週數 = 在庫 / 週預測
    pub remaining_weeks: Decimal,

    /// 歷史匯入資料不重算
    pub is_historical: bool,
}

impl WeeklyRecord {
    /// 由輸入與推算欄位組成紀錄
    pub fn from_entry(entry: &WeeklyEntry, derived: DerivedFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_code: entry.product_code.clone(),
            week: entry.week,
            incoming_goods: entry.incoming_goods,
            outgoing_goods: derived.outgoing_goods,
            inventory: entry.inventory,
            remaining_weeks: derived.remaining_weeks,
            is_historical: entry.is_historical,
        }
    }

    /// 建構器模式：沿用既有紀錄的ID
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn year(&self) -> i32 {
        self.week.year()
    }

    pub fn week_no(&self) -> u32 {
        self.week.week_no()
    }

    /// 匯出用：剩餘週數四捨五入到小數一位
    pub fn remaining_weeks_rounded(&self) -> Decimal {
        self.remaining_weeks.round_dp(1)
    }
}
