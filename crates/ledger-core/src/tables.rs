//! 盤點表推算用的靜態參照表

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{LedgerError, Result};

/// 分組規則：商品名包含 `pattern` 即歸入 `subgroup`
///
/// 同一 `family` 的列合計回報數；`multiplier` 為該子群組每列計入合計的倍數
/// （例如 3 個裝計為 3 倍）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    pub pattern: String,
    pub family: String,
    pub subgroup: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: i64,
}

fn default_multiplier() -> i64 {
    1
}

impl GroupRule {
    pub fn new(pattern: &str, family: &str, subgroup: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            family: family.to_string(),
            subgroup: subgroup.to_string(),
            multiplier: 1,
        }
    }

    /// 建構器模式：設置倍數
    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        name.contains(self.pattern.as_str())
    }
}

/// 參照表：品類權重、跨表連結、分組規則
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceTables {
    /// 商品代碼 → 品類權重
    pub category_weights: HashMap<String, i64>,

    /// 商品代碼 → 連結的商品代碼
    pub link_map: HashMap<String, String>,

    /// 依序比對的分組規則（先符合者優先）
    pub group_rules: Vec<GroupRule>,
}

impl ReferenceTables {
    /// 空的參照表
    pub fn empty() -> Self {
        Self {
            category_weights: HashMap::new(),
            link_map: HashMap::new(),
            group_rules: Vec::new(),
        }
    }

    /// 建構器模式：設置品類權重
    pub fn with_weight(mut self, code: &str, weight: i64) -> Self {
        self.category_weights.insert(code.to_string(), weight);
        self
    }

    /// 建構器模式：設置連結
    pub fn with_link(mut self, code: &str, linked: &str) -> Self {
        self.link_map.insert(code.to_string(), linked.to_string());
        self
    }

    /// 建構器模式：追加分組規則
    pub fn with_group_rule(mut self, rule: GroupRule) -> Self {
        self.group_rules.push(rule);
        self
    }

    /// 品類權重，未登錄為 0
    pub fn weight(&self, code: &str) -> i64 {
        self.category_weights.get(code).copied().unwrap_or(0)
    }

    pub fn linked_code(&self, code: &str) -> Option<&str> {
        self.link_map.get(code).map(String::as_str)
    }

    /// 第一個符合商品名的分組規則
    pub fn classify(&self, name: &str) -> Option<&GroupRule> {
        self.group_rules.iter().find(|rule| rule.matches(name))
    }

    pub fn validate(&self) -> Result<()> {
        for rule in &self.group_rules {
            if rule.pattern.is_empty() {
                return Err(LedgerError::InvalidConfig(format!(
                    "分組 {} 的比對字串為空",
                    rule.subgroup
                )));
            }
            if rule.family.is_empty() || rule.subgroup.is_empty() {
                return Err(LedgerError::InvalidConfig(format!(
                    "比對字串 {:?} 缺少分組名稱",
                    rule.pattern
                )));
            }
            if rule.multiplier <= 0 {
                return Err(LedgerError::InvalidConfig(format!(
                    "分組 {} 的倍數必須大於 0: {}",
                    rule.subgroup, rule.multiplier
                )));
            }
        }
        Ok(())
    }
}

/// 正式環境使用的參照表
impl Default for ReferenceTables {
    fn default() -> Self {
        let weights = [
            ("02-52-0001", 25),
            ("02-52-0002", 15),
            ("02-52-0003", 8),
            ("02-52-0004", 5),
            ("02-52-0005", 3),
            ("02-52-0006", 25),
            ("02-52-0007", 25),
            ("02-52-0008", 15),
            ("02-52-0009", 8),
            ("02-52-0010", 5),
            ("02-52-0011", 3),
            ("02-52-0012", 25),
        ];

        // 02-99-0059..0070 → 02-52-0001..0012
        let link_map = (1..=12)
            .map(|i| (format!("02-99-{:04}", 58 + i), format!("02-52-{:04}", i)))
            .collect();

        Self {
            category_weights: weights
                .iter()
                .map(|(code, weight)| (code.to_string(), *weight))
                .collect(),
            link_map,
            group_rules: vec![
                GroupRule::new("ねこちゃんにもやさしいみるく2", "C", "C1"),
                GroupRule::new("わんちゃんにもやさしいみるく300ml 3", "D", "D1"),
                GroupRule::new("わんちゃんにもやさしいみるく3個", "D", "D3").with_multiplier(3),
            ],
        }
    }
}
