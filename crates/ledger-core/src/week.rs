//! ISO 週次模型

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{LedgerError, Result};

/// 可接受的年份範圍
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// ISO 週次（年 + 週號 1..=53）
///
/// 欄位順序即為時間順序，`Ord` 依 (年, 週) 比較，不做字串比較。
/// 序列化格式為 `YYYY-Www`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoWeek {
    year: i32,
    week: u32,
}

impl IsoWeek {
    /// 創建週次，週號必須在 [1, 53]
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(LedgerError::InvalidWeek(format!("年份超出範圍: {}", year)));
        }
        if !(1..=53).contains(&week) {
            return Err(LedgerError::InvalidWeek(format!(
                "週號必須在 1..=53 之間: {}",
                week
            )));
        }
        Ok(Self { year, week })
    }

    /// 解析 `YYYY-Www` 格式（以字面 `-W` 分割）
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split("-W").collect();
        if parts.len() != 2 {
            return Err(LedgerError::InvalidWeek(format!(
                "格式必須為 YYYY-Www: {:?}",
                value
            )));
        }

        let year = parts[0].trim().parse::<i32>().map_err(|_| {
            LedgerError::InvalidWeek(format!("無法解析年份: {:?}", value))
        })?;
        let week = parts[1].trim().parse::<u32>().map_err(|_| {
            LedgerError::InvalidWeek(format!("無法解析週號: {:?}", value))
        })?;

        Self::new(year, week)
    }

    /// 取得某日期所在的 ISO 週次
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_no(&self) -> u32 {
        self.week
    }

    /// 某年最後一個 ISO 週（52 或 53）
    ///
    /// 12 月 28 日永遠落在該年最後一個 ISO 週。
    pub fn last_week_of(year: i32) -> u32 {
        NaiveDate::from_ymd_opt(year, 12, 28)
            .map(|date| date.iso_week().week())
            .unwrap_or(52)
    }

    /// 前一個 ISO 週
    ///
    /// 第 1 週的前一週是上一年的最後一週；0001-W01 沒有前一週。
    pub fn previous(&self) -> Option<Self> {
        if self.week > 1 {
            return Some(Self {
                year: self.year,
                week: self.week - 1,
            });
        }

        let prev_year = self.year - 1;
        if prev_year < MIN_YEAR {
            return None;
        }
        Some(Self {
            year: prev_year,
            week: Self::last_week_of(prev_year),
        })
    }

    /// 下一個 ISO 週
    pub fn next(&self) -> Option<Self> {
        if self.week < Self::last_week_of(self.year) {
            return Some(Self {
                year: self.year,
                week: self.week + 1,
            });
        }

        let next_year = self.year + 1;
        if next_year > MAX_YEAR {
            return None;
        }
        Some(Self {
            year: next_year,
            week: 1,
        })
    }

    /// 該週的週一（不存在的第 53 週返回錯誤）
    pub fn monday(&self) -> Result<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).ok_or_else(|| {
            LedgerError::InvalidWeek(format!("{} 年沒有第 {} 週", self.year, self.week))
        })
    }

    /// 以週日起算的週標籤（例：`23年12月31日週`）
    ///
    /// 標籤日期為 ISO 週一的前一天。
    pub fn week_label(&self) -> Result<String> {
        let sunday = self.monday()? - Duration::days(1);
        Ok(format!(
            "{}年{}月{}日週",
            sunday.format("%y"),
            sunday.month(),
            sunday.day()
        ))
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for IsoWeek {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IsoWeek {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<IsoWeek> for String {
    fn from(week: IsoWeek) -> Self {
        week.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-W05", 2024, 5)]
    #[case("2020-W53", 2020, 53)]
    #[case("1999-W1", 1999, 1)]
    fn test_parse_week(#[case] input: &str, #[case] year: i32, #[case] week: u32) {
        let parsed = IsoWeek::parse(input).unwrap();
        assert_eq!(parsed.year(), year);
        assert_eq!(parsed.week_no(), week);
    }

    #[rstest]
    #[case("2024-05")]
    #[case("2024-W")]
    #[case("2024-W00")]
    #[case("2024-W54")]
    #[case("abcd-W10")]
    #[case("2024-W10-W11")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            IsoWeek::parse(input),
            Err(LedgerError::InvalidWeek(_))
        ));
    }

    #[rstest]
    #[case(2020, 53)]
    #[case(2021, 52)]
    #[case(2023, 52)]
    #[case(2026, 53)]
    fn test_last_week_of_year(#[case] year: i32, #[case] expected: u32) {
        assert_eq!(IsoWeek::last_week_of(year), expected);
    }

    #[test]
    fn test_previous_week_crosses_year() {
        // 2023 年有 52 週
        let week = IsoWeek::new(2024, 1).unwrap();
        assert_eq!(week.previous(), Some(IsoWeek::new(2023, 52).unwrap()));

        // 2020 年有 53 週
        let week = IsoWeek::new(2021, 1).unwrap();
        assert_eq!(week.previous(), Some(IsoWeek::new(2020, 53).unwrap()));

        let week = IsoWeek::new(2024, 10).unwrap();
        assert_eq!(week.previous(), Some(IsoWeek::new(2024, 9).unwrap()));

        assert_eq!(IsoWeek::new(1, 1).unwrap().previous(), None);
    }

    #[test]
    fn test_next_week_crosses_year() {
        let week = IsoWeek::new(2020, 53).unwrap();
        assert_eq!(week.next(), Some(IsoWeek::new(2021, 1).unwrap()));

        let week = IsoWeek::new(2023, 52).unwrap();
        assert_eq!(week.next(), Some(IsoWeek::new(2024, 1).unwrap()));
    }

    #[test]
    fn test_chronological_ordering() {
        let mut weeks = vec![
            IsoWeek::parse("2024-W02").unwrap(),
            IsoWeek::parse("2023-W52").unwrap(),
            IsoWeek::parse("2024-W10").unwrap(),
            IsoWeek::parse("2024-W01").unwrap(),
        ];
        weeks.sort();

        let rendered: Vec<String> = weeks.iter().map(|w| w.to_string()).collect();
        assert_eq!(rendered, vec!["2023-W52", "2024-W01", "2024-W02", "2024-W10"]);
    }

    #[test]
    fn test_from_date() {
        // 2021-01-01 是週五，屬於 2020 年第 53 週
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(IsoWeek::from_date(date), IsoWeek::new(2020, 53).unwrap());
    }

    #[rstest]
    #[case(2024, 1, "23年12月31日週")]
    #[case(2025, 10, "25年3月2日週")]
    fn test_week_label(#[case] year: i32, #[case] week: u32, #[case] expected: &str) {
        let week = IsoWeek::new(year, week).unwrap();
        assert_eq!(week.week_label().unwrap(), expected);
    }

    #[test]
    fn test_week_53_in_short_year_has_no_monday() {
        let week = IsoWeek::new(2023, 53).unwrap();
        assert!(week.monday().is_err());
    }

    #[test]
    fn test_serde_round_trip_format() {
        let week = IsoWeek::new(2024, 7).unwrap();
        let json = serde_json::to_string(&week).unwrap();
        assert_eq!(json, "\"2024-W07\"");

        let bad: std::result::Result<IsoWeek, _> = serde_json::from_str("\"2024-W99\"");
        assert!(bad.is_err());
    }
}
