//! 商品模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 由月銷售預測推算週消耗預測：`月銷 / 30 * 7`
///
/// 預測值不會小於 0；先除後乘，結果不大於月銷預測本身。
pub fn weekly_forecast(monthly_sales_prediction: Decimal) -> Decimal {
    if monthly_sales_prediction <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (monthly_sales_prediction / Decimal::from(30))
        .checked_mul(Decimal::from(7))
        .unwrap_or(monthly_sales_prediction)
}

/// 商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 商品代碼（唯一）
    pub code: String,

    /// JAN 條碼
    pub jan_code: Option<String>,

    /// 商品名稱
    pub name: String,

    /// 分類（国外 / 国内）
    #[serde(default)]
    pub classification: Option<String>,

    /// 交期（天），例如 `45`、`45～60`
    #[serde(default)]
    pub lead_time: Option<String>,

    /// 規格
    #[serde(default)]
    pub specifications: Option<String>,

    /// 月銷售預測
    pub monthly_sales_prediction: Decimal,

    /// 週消耗預測（衍生值，隨月銷預測重算）
    pub forecast: Decimal,

    /// 是否啟用
    pub is_active: bool,
}

impl Product {
    /// 創建新商品
    pub fn new(code: String, name: String, monthly_sales_prediction: Decimal) -> Self {
        Self {
            code,
            jan_code: None,
            name,
            classification: None,
            lead_time: None,
            specifications: None,
            monthly_sales_prediction,
            forecast: weekly_forecast(monthly_sales_prediction),
            is_active: true,
        }
    }

    /// 建構器模式：設置 JAN 條碼
    pub fn with_jan_code(mut self, jan_code: String) -> Self {
        self.jan_code = Some(jan_code);
        self
    }

    /// 建構器模式：設置分類
    pub fn with_classification(mut self, classification: String) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn with_lead_time(mut self, lead_time: String) -> Self {
        self.lead_time = Some(lead_time);
        self
    }

    pub fn with_specifications(mut self, specifications: String) -> Self {
        self.specifications = Some(specifications);
        self
    }

    /// 建構器模式：設置為停用
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// 更新月銷預測並重算週預測
    pub fn set_monthly_sales_prediction(&mut self, prediction: Decimal) {
        self.monthly_sales_prediction = prediction;
        self.forecast = weekly_forecast(prediction);
    }

    /// 切換啟用狀態，返回切換後的狀態
    pub fn toggle_active(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }
}

/// 商品預設值（每個商品一筆，延遲建立）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDefaults {
    pub product_code: String,

    /// 首週沒有前一週紀錄時使用的出庫數
    pub default_outgoing: i64,
}

impl ProductDefaults {
    pub fn new(product_code: String) -> Self {
        Self {
            product_code,
            default_outgoing: 0,
        }
    }

    pub fn with_default_outgoing(mut self, default_outgoing: i64) -> Self {
        self.default_outgoing = default_outgoing;
        self
    }
}
