// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 上下文解析器
//!
//! 将原始标题/单元格文本映射为类型化字段的纯函数集合。
//! 全部解析失败软着陆：返回None/空值，绝不中断整次运行。

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static LONG_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)(?:st|nd|rd|th)?\s+day\s+of\s+(\w+)\s+(\d{4})").unwrap());

static HEARD_ON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)to\s+be\s+heard\s+on\s+.+?(\d+)(?:st|nd|rd|th)?\s+day\s+of\s+(\w+)\s+(\d{4})")
        .unwrap()
});

static COURT_NO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)COURT\s+NO\.?\s*(\d+)").unwrap());

static JUDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)COURT\s+NO\.?\s*\d+\s*/\s*([^/]+?)(?:\s*/|\s+To\s+be\s+heard)").unwrap()
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d{1,2}:\d{2}\s*[AP]M)").unwrap());

static MODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(HYBRID\s+MODE|PHYSICAL|VIRTUAL|ONLINE)").unwrap());

static TOTAL_CASES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)TOTAL\s+CASES\s+FOR\s+.+?=\s*(\d+)").unwrap());

static LIST_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:DATED|DATE):\s*(\d{1,2}-\d{1,2}-\d{4})").unwrap());

static BARE_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}-\d{1,2}-\d{4})").unwrap());

static PARTY_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+vs\.?\s+|\s+v\.?\s+").unwrap());

static IA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)IA\s+\d+/\d+").unwrap());

static PLAIN_IA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+/\d+$").unwrap());

static STATUS_DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})(?:\s+(\d{1,2}):(\d{2}))?").unwrap()
});

static STATUS_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)DATED:\s*(\d{1,2}-\d{1,2}-\d{4})").unwrap());

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn date_from_parts(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let month_lower = month.to_lowercase();
    let month_idx = MONTH_NAMES
        .iter()
        .position(|m| month_lower.starts_with(m))?;
    // from_ymd_opt rejects out-of-range values (e.g. 32nd day)
    NaiveDate::from_ymd_opt(year, month_idx as u32 + 1, day)
}

/// 解析 "23rd day of February 2026" 形式的日期短语
pub fn parse_long_date(text: &str) -> Option<NaiveDate> {
    let caps = LONG_DATE_RE.captures(text)?;
    date_from_parts(&caps[1], &caps[2], &caps[3])
}

/// 解析标题中 "To be heard on ... 23rd day of February 2026" 的日期部分
pub fn parse_heading_date(text: &str) -> Option<NaiveDate> {
    let caps = HEARD_ON_RE.captures(text)?;
    date_from_parts(&caps[1], &caps[2], &caps[3])
}

/// 从标题提取法庭编号，如 "COURT NO. 14" -> "14"
pub fn parse_court_number(text: &str) -> Option<String> {
    COURT_NO_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// 提取法官姓名
///
/// 取法庭编号标记与下一个分隔符（或尾随 "To be heard" 短语）
/// 之间的文本段
pub fn parse_judge(text: &str) -> Option<String> {
    JUDGE_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// 从标题提取时间，如 "10:30 AM"
pub fn parse_time(text: &str) -> Option<String> {
    TIME_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// 从标题提取听证方式，如 "HYBRID MODE"
pub fn parse_mode(text: &str) -> Option<String> {
    MODE_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// 解析 "TOTAL CASES FOR [name] = 14" -> 14
pub fn parse_total_cases(body_text: &str) -> Option<u32> {
    TOTAL_CASES_RE
        .captures(body_text)
        .and_then(|caps| caps[1].parse().ok())
}

/// 提取排期表日期横幅（"DATED: 23-02-2026"），带宽松的裸日期回退
pub fn parse_list_date(body_text: &str) -> Option<String> {
    LIST_DATE_RE
        .captures(body_text)
        .or_else(|| BARE_DATE_RE.captures(body_text))
        .map(|caps| caps[1].trim().to_string())
}

/// 拆分当事人文本为申请人与被申请人（按 " vs " / " v " 分隔）
pub fn split_parties(party_details: &str) -> (Option<String>, Option<String>) {
    let trimmed = party_details.trim();
    let mut parts = PARTY_SPLIT_RE.splitn(trimmed, 2);
    let petitioner = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    let respondent = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    (petitioner, respondent)
}

/// 解析案件列文本
///
/// 首行为案件编号，其余匹配临时申请模式的行成为子记录
pub fn parse_case_column(text: &str) -> (String, Vec<String>) {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let case_number = lines.next().unwrap_or_default().to_string();
    let interim_applications = lines
        .filter(|l| IA_RE.is_match(l) || PLAIN_IA_RE.is_match(l))
        .map(String::from)
        .collect();
    (case_number, interim_applications)
}

/// 解析状态页的 "DD-MM-YYYY[ HH:MM]" 时间戳
pub fn parse_status_datetime(text: &str) -> Option<NaiveDateTime> {
    let caps = STATUS_DATETIME_RE.captures(text.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps.get(4).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let minute: u32 = caps.get(5).map_or(Some(0), |m| m.as_str().parse().ok())?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

/// 从状态页文本提取状态日期
///
/// 形如 "CAUSE LIST UPLOADING STATUS DATED: 23-02-2026"
pub fn parse_status_date_heading(body_text: &str) -> Option<NaiveDate> {
    let caps = STATUS_HEADING_RE.captures(body_text)?;
    parse_status_datetime(caps[1].trim()).map(|dt| dt.date())
}

/// 判断文本是否为纯数字
pub fn is_numeric(text: &str) -> bool {
    DIGITS_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn ordinal_suffix(day: u32) -> &'static str {
        match (day % 10, day % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        }
    }

    fn format_long_date(date: NaiveDate) -> String {
        format!(
            "{}{} day of {} {}",
            date.day(),
            ordinal_suffix(date.day()),
            date.format("%B"),
            date.year()
        )
    }

    #[test]
    fn long_date_parse_inverts_format() {
        let mut date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        while date < end {
            assert_eq!(parse_long_date(&format_long_date(date)), Some(date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn long_date_rejects_garbage() {
        assert_eq!(parse_long_date("32nd day of February 2026"), None);
        assert_eq!(parse_long_date("3rd day of Smarch 2026"), None);
        assert_eq!(parse_long_date("no date here"), None);
        assert_eq!(parse_long_date(""), None);
    }

    #[test]
    fn heading_fields_extracted() {
        let heading = "COURT NO. 14 / THE HON'BLE SRI JUSTICE X / HYBRID MODE To be heard on the 23rd day of February 2026";
        assert_eq!(parse_court_number(heading), Some("14".to_string()));
        assert_eq!(
            parse_judge(heading),
            Some("THE HON'BLE SRI JUSTICE X".to_string())
        );
        assert_eq!(parse_mode(heading), Some("HYBRID MODE".to_string()));
        assert_eq!(
            parse_heading_date(heading),
            NaiveDate::from_ymd_opt(2026, 2, 23)
        );
    }

    #[test]
    fn judge_stops_at_heard_phrase() {
        let heading = "COURT NO. 3 / THE HON'BLE JUSTICE Y To be heard on the 1st day of March 2026";
        assert_eq!(parse_judge(heading), Some("THE HON'BLE JUSTICE Y".to_string()));
    }

    #[test]
    fn time_and_mode() {
        assert_eq!(parse_time("AT 10:30 AM"), Some("10:30 AM".to_string()));
        assert_eq!(parse_time("no time"), None);
        assert_eq!(parse_mode("PHYSICAL hearing"), Some("PHYSICAL".to_string()));
    }

    #[test]
    fn total_cases_banner() {
        assert_eq!(
            parse_total_cases("TOTAL CASES FOR D NARENDAR NAIK = 14"),
            Some(14)
        );
        assert_eq!(parse_total_cases("TOTAL CASES = nothing"), None);
    }

    #[test]
    fn list_date_with_fallback() {
        assert_eq!(
            parse_list_date("CAUSE LIST DATED: 23-02-2026"),
            Some("23-02-2026".to_string())
        );
        assert_eq!(
            parse_list_date("as of 5-3-2026 noon"),
            Some("5-3-2026".to_string())
        );
        assert_eq!(parse_list_date("no date"), None);
    }

    #[test]
    fn party_split_variants() {
        let (p, r) = split_parties("STATE OF TELANGANA vs JOHN DOE");
        assert_eq!(p.as_deref(), Some("STATE OF TELANGANA"));
        assert_eq!(r.as_deref(), Some("JOHN DOE"));

        let (p, r) = split_parties("A B C v X Y Z");
        assert_eq!(p.as_deref(), Some("A B C"));
        assert_eq!(r.as_deref(), Some("X Y Z"));

        let (p, r) = split_parties("SOLO PARTY");
        assert_eq!(p.as_deref(), Some("SOLO PARTY"));
        assert_eq!(r, None);
    }

    #[test]
    fn case_column_with_interim_applications() {
        let (case, ias) = parse_case_column("WP 123/2026\nIA 45/2026");
        assert_eq!(case, "WP 123/2026");
        assert_eq!(ias, vec!["IA 45/2026".to_string()]);

        let (case, ias) = parse_case_column("WA 9/2026\n12/2026\nnot an ia");
        assert_eq!(case, "WA 9/2026");
        assert_eq!(ias, vec!["12/2026".to_string()]);
    }

    #[test]
    fn status_datetime_variants() {
        let dt = parse_status_datetime("23-02-2026 10:45").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2026, 2, 23).unwrap());
        assert_eq!(dt.format("%H:%M").to_string(), "10:45");

        let dt = parse_status_datetime("23-02-2026").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "00:00");

        assert_eq!(parse_status_datetime("31-02-2026"), None);
        assert_eq!(parse_status_datetime(""), None);
    }

    #[test]
    fn status_heading_date() {
        assert_eq!(
            parse_status_date_heading("CAUSE LIST UPLOADING STATUS DATED: 23-02-2026"),
            NaiveDate::from_ymd_opt(2026, 2, 23)
        );
        assert_eq!(parse_status_date_heading("no banner"), None);
    }
}
