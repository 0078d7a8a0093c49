//! 帳本配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, ReferenceTables, Result};

/// 盤點表上傳的欄位名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadColumns {
    pub code: String,
    pub name: String,
    pub count: String,
}

impl Default for UploadColumns {
    fn default() -> Self {
        Self {
            code: "商品コード".to_string(),
            name: "商品名".to_string(),
            count: "総数".to_string(),
        }
    }
}

impl UploadColumns {
    pub fn required(&self) -> [&str; 3] {
        [self.code.as_str(), self.name.as_str(), self.count.as_str()]
    }
}

/// 歷史資料上傳的欄位名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalColumns {
    pub code: String,
    pub incoming: String,
    pub outgoing: String,
    pub inventory: String,
}

impl Default for HistoricalColumns {
    fn default() -> Self {
        Self {
            code: "yayoi_code".to_string(),
            incoming: "incoming".to_string(),
            outgoing: "outgoing".to_string(),
            inventory: "inventory".to_string(),
        }
    }
}

impl HistoricalColumns {
    pub fn required(&self) -> [&str; 4] {
        [
            self.code.as_str(),
            self.incoming.as_str(),
            self.outgoing.as_str(),
            self.inventory.as_str(),
        ]
    }
}

/// 帳本配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// 剩餘週數低於（含）此值即列入「需注意」
    pub attention_threshold_weeks: Decimal,

    /// 盤點表欄位
    pub upload_columns: UploadColumns,

    /// 歷史資料欄位
    pub historical_columns: HistoricalColumns,

    /// 盤點表推算參照表
    pub reference_tables: ReferenceTables,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            attention_threshold_weeks: Decimal::from(5),
            upload_columns: UploadColumns::default(),
            historical_columns: HistoricalColumns::default(),
            reference_tables: ReferenceTables::default(),
        }
    }
}

impl LedgerConfig {
    /// 從 JSON 載入配置（未提供的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置需注意門檻
    pub fn with_attention_threshold(mut self, weeks: Decimal) -> Self {
        self.attention_threshold_weeks = weeks;
        self
    }

    /// 建構器模式：設置參照表
    pub fn with_reference_tables(mut self, tables: ReferenceTables) -> Self {
        self.reference_tables = tables;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.attention_threshold_weeks < Decimal::ZERO {
            return Err(LedgerError::InvalidConfig(format!(
                "需注意門檻不可為負: {}",
                self.attention_threshold_weeks
            )));
        }
        self.reference_tables.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.attention_threshold_weeks, Decimal::from(5));
        assert_eq!(config.upload_columns.required(), ["商品コード", "商品名", "総数"]);
        assert_eq!(config.historical_columns.code, "yayoi_code");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LedgerConfig::from_json_str(
            r#"{
                "attention_threshold_weeks": 3,
                "reference_tables": {
                    "category_weights": {"A": 10},
                    "group_rules": [
                        {"pattern": "pack", "family": "P", "subgroup": "P3", "multiplier": 3}
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.attention_threshold_weeks, Decimal::from(3));
        assert_eq!(config.reference_tables.weight("A"), 10);
        assert_eq!(config.reference_tables.group_rules.len(), 1);
        // 未提供的連結表沿用正式環境預設
        assert_eq!(config.reference_tables.link_map.len(), 12);
        assert_eq!(config.upload_columns, UploadColumns::default());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            LedgerConfig::from_json_str("{not json"),
            Err(LedgerError::InvalidConfig(_))
        ));
        assert!(LedgerConfig::from_json_str(r#"{"attention_threshold_weeks": -1}"#).is_err());
    }
}
