//! 未來入庫計劃模型

use serde::{Deserialize, Serialize};

use crate::IsoWeek;

/// 未來入庫計劃：(商品, 週) → 預計入庫數
///
/// 只有預計入庫數大於 0 的計劃才會被保存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuturePlan {
    pub product_code: String,
    pub week: IsoWeek,
    pub planned_incoming: i64,
}

impl FuturePlan {
    pub fn new(product_code: String, week: IsoWeek, planned_incoming: i64) -> Self {
        Self {
            product_code,
            week,
            planned_incoming,
        }
    }

    /// 數量 <= 0 代表「沒有計劃」
    pub fn is_effective(&self) -> bool {
        self.planned_incoming > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_effectiveness() {
        let week = IsoWeek::new(2025, 3).unwrap();
        assert!(FuturePlan::new("P-1".to_string(), week, 12).is_effective());
        assert!(!FuturePlan::new("P-1".to_string(), week, 0).is_effective());
        assert!(!FuturePlan::new("P-1".to_string(), week, -4).is_effective());
    }
}
