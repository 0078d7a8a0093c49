//! 週次衍生欄位計算

use ledger_core::{DerivedFields, LedgerError, Result, WeeklyEntry, WeeklyRecord};
use rust_decimal::Decimal;

/// 週次衍生欄位計算器（純函數，不接觸儲存層）
pub struct LedgerDerivation;

impl LedgerDerivation {
    /// 計算出庫數與剩餘週數
    ///
    /// # 參數
    /// * `predecessor` - 同商品前一個 ISO 週的紀錄
    /// * `default_outgoing` - 商品預設出庫數（沒有前一週紀錄時使用，未設定為 0）
    /// * `forecast` - 商品週預測
    pub fn derive(
        entry: &WeeklyEntry,
        predecessor: Option<&WeeklyRecord>,
        default_outgoing: Option<i64>,
        forecast: Decimal,
    ) -> Result<DerivedFields> {
        let outgoing_goods = match predecessor {
            Some(prev) => Self::outgoing(prev.inventory, entry.incoming_goods, entry.inventory)?,
            None => default_outgoing.unwrap_or(0),
        };

        Ok(DerivedFields {
            outgoing_goods,
            remaining_weeks: Self::remaining_weeks(entry.inventory, forecast)?,
        })
    }

    /// 由守恆式 `前週在庫 + 入庫 - 出庫 = 在庫` 反推出庫數
    ///
    /// 取絕對值：在庫無入庫卻增加時，帶符號的差額為負，這裡會得到正的出庫數。
    /// 此行為與既有資料相容，但會掩蓋輸入錯誤。
    /// 超出 i64 範圍時返回 `InvalidQuantity`。
    pub fn outgoing(previous_inventory: i64, incoming_goods: i64, inventory: i64) -> Result<i64> {
        previous_inventory
            .checked_add(incoming_goods)
            .and_then(|supply| supply.checked_sub(inventory))
            .and_then(i64::checked_abs)
            .ok_or_else(|| LedgerError::InvalidQuantity {
                field: "outgoing_goods".to_string(),
                value: previous_inventory,
            })
    }

    /// 剩餘週數 = 在庫 / 週預測；預測 <= 0 時為 0
    ///
    /// 商數超出 `Decimal` 範圍（預測極小）時返回 `InvalidQuantity`。
    pub fn remaining_weeks(inventory: i64, forecast: Decimal) -> Result<Decimal> {
        if forecast <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Decimal::from(inventory)
            .checked_div(forecast)
            .ok_or_else(|| LedgerError::InvalidQuantity {
                field: "remaining_weeks".to_string(),
                value: inventory,
            })
    }
}
