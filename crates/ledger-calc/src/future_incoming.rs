//! 未來入庫計劃

use ledger_core::{FuturePlan, IsoWeek, LedgerError, Result};
use std::collections::HashMap;
use std::sync::RwLock;

/// 未來入庫計劃解析器
///
/// 操作員未輸入入庫數時，以計劃值作為預設；紀錄寫入後由呼叫端消化（刪除）該計劃。
#[derive(Debug, Default)]
pub struct FutureIncomingResolver {
    plans: RwLock<HashMap<(String, IsoWeek), i64>>,
}

fn lock_error() -> LedgerError {
    LedgerError::Storage("入庫計劃鎖已中毒".to_string())
}

impl FutureIncomingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 預設入庫數（沒有計劃為 0），不修改狀態
    pub fn default_incoming(&self, product_code: &str, week: IsoWeek) -> Result<i64> {
        let plans = self.plans.read().map_err(|_| lock_error())?;
        Ok(plans
            .get(&(product_code.to_string(), week))
            .copied()
            .unwrap_or(0))
    }

    /// 寫入或刪除計劃；數量 <= 0 代表沒有計劃
    ///
    /// 返回保存後的計劃（刪除時為 None）。
    pub fn upsert_plan(
        &self,
        product_code: &str,
        week: IsoWeek,
        planned_incoming: i64,
    ) -> Result<Option<FuturePlan>> {
        let plan = FuturePlan::new(product_code.to_string(), week, planned_incoming);
        let mut plans = self.plans.write().map_err(|_| lock_error())?;
        let key = (product_code.to_string(), week);

        if plan.is_effective() {
            plans.insert(key, planned_incoming);
            Ok(Some(plan))
        } else {
            plans.remove(&key);
            Ok(None)
        }
    }

    /// 紀錄已寫入，刪除該週計劃；返回被消化的數量
    pub fn materialize(&self, product_code: &str, week: IsoWeek) -> Result<Option<i64>> {
        let mut plans = self.plans.write().map_err(|_| lock_error())?;
        let consumed = plans.remove(&(product_code.to_string(), week));
        if let Some(quantity) = consumed {
            tracing::debug!("消化入庫計劃 {} {}: {}", product_code, week, quantity);
        }
        Ok(consumed)
    }

    /// 某商品的全部計劃（依週次排序）
    pub fn plans_for(&self, product_code: &str) -> Result<Vec<FuturePlan>> {
        let plans = self.plans.read().map_err(|_| lock_error())?;
        let mut result: Vec<FuturePlan> = plans
            .iter()
            .filter(|((code, _), _)| code == product_code)
            .map(|((code, week), quantity)| FuturePlan::new(code.clone(), *week, *quantity))
            .collect();
        result.sort_by_key(|plan| plan.week);
        Ok(result)
    }
}
