// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 律师排期提取
//!
//! 结果页是多段表格：每段对应一个法庭/列表，标题携带上下文。
//! 折叠出的候选记录必须按查询姓名过滤，页面偶尔会混入
//! 不相关律师的行。

use crate::domain::models::hearing::HearingCandidate;
use crate::extract::navigator::CourtSite;
use crate::extract::{context, section, ExtractError};
use chrono::NaiveDate;
use scraper::Html;
use std::sync::Arc;

/// 一次律师排期提取的产出
#[derive(Debug, Clone)]
pub struct AdvocateExtraction {
    /// 实际用于查询与过滤的姓名
    pub advocate_name: String,
    /// 页面汇总横幅声明的案件总数
    pub total_cases: u32,
    /// 排期表日期横幅原文，如 "23-02-2026"
    pub cause_list_date: Option<String>,
    /// 过滤后的听证候选记录
    pub hearings: Vec<HearingCandidate>,
}

fn mentions_advocate(candidate: &HearingCandidate, needle: &str) -> bool {
    let matches = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(needle))
    };
    matches(&candidate.petitioner_advocate) || matches(&candidate.respondent_advocate)
}

/// 解析结果页HTML为过滤后的提取产出
///
/// # 参数
///
/// * `html` - 结果页完整HTML
/// * `advocate_name` - 查询姓名，过滤为大小写不敏感子串匹配
/// * `fallback_date` - 标题无日期时使用的提取日
pub fn extract_hearings(
    html: &str,
    advocate_name: &str,
    fallback_date: NaiveDate,
) -> Result<AdvocateExtraction, ExtractError> {
    let document = Html::parse_document(html);
    let body_text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    let total_cases = context::parse_total_cases(&body_text).unwrap_or(0);
    let cause_list_date = context::parse_list_date(&body_text);

    let sections = section::collect_sections(html);
    let all = section::fold_sections(&sections, fallback_date);

    let needle = advocate_name.to_lowercase();
    let hearings: Vec<HearingCandidate> = all
        .into_iter()
        .filter(|c| mentions_advocate(c, &needle))
        .collect();

    Ok(AdvocateExtraction {
        advocate_name: advocate_name.to_string(),
        total_cases,
        cause_list_date,
        hearings,
    })
}

/// 律师排期提取引擎
pub struct AdvocateEngine<S: CourtSite> {
    site: Arc<S>,
}

impl<S: CourtSite> AdvocateEngine<S> {
    pub fn new(site: Arc<S>) -> Self {
        Self { site }
    }

    /// 执行一次完整的律师排期提取
    ///
    /// # 参数
    ///
    /// * `advocate_name` - 查询的律师姓名
    /// * `fallback_date` - 标题无日期时使用的提取日
    pub async fn run(
        &self,
        advocate_name: &str,
        fallback_date: NaiveDate,
    ) -> Result<AdvocateExtraction, ExtractError> {
        let snapshot = self.site.advocate_results(advocate_name).await?;
        let extraction = extract_hearings(&snapshot.html, advocate_name, fallback_date)?;
        if extraction.hearings.len() as u32 != extraction.total_cases {
            tracing::warn!(
                banner = extraction.total_cases,
                parsed = extraction.hearings.len(),
                "Parsed hearing count differs from page banner"
            );
        }
        tracing::info!(
            advocate = %extraction.advocate_name,
            rows = extraction.hearings.len(),
            "Advocate extraction parsed"
        );
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <p>HIGH COURT FOR THE STATE OF TELANGANA DATED: 23-02-2026</p>
          <p>TOTAL CASES FOR D NARENDAR NAIK = 2</p>
          <p>DAILY LIST</p>
          <h3>COURT NO. 14 / THE HON'BLE SRI JUSTICE X / HYBRID MODE
              To be heard on the 23rd day of February 2026</h3>
          <table>
            <tr><td>1</td><td>WP 123/2026</td><td>A vs B</td><td>D NARENDAR NAIK</td><td>GP FOR HOME</td></tr>
            <tr><td>2</td><td>WP 200/2026</td><td>C vs D</td><td>SOMEONE ELSE</td><td>OTHER GP</td></tr>
            <tr><td>3</td><td>WA 9/2026</td><td>E vs F</td><td>SRI COUNSEL</td><td>D NARENDAR NAIK</td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn filter_keeps_only_matching_advocate() {
        let extraction = extract_hearings(RESULTS_PAGE, "D NARENDAR NAIK", fallback()).unwrap();
        assert_eq!(extraction.total_cases, 2);
        assert_eq!(extraction.cause_list_date.as_deref(), Some("23-02-2026"));
        assert_eq!(extraction.hearings.len(), 2);
        assert!(extraction
            .hearings
            .iter()
            .all(|h| h.case_number != "WP 200/2026"));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let extraction = extract_hearings(RESULTS_PAGE, "narendar naik", fallback()).unwrap();
        assert_eq!(extraction.hearings.len(), 2);
    }

    #[test]
    fn respondent_side_match_is_kept() {
        let extraction = extract_hearings(RESULTS_PAGE, "D NARENDAR NAIK", fallback()).unwrap();
        assert!(extraction
            .hearings
            .iter()
            .any(|h| h.case_number == "WA 9/2026"));
    }

    #[test]
    fn empty_page_yields_empty_extraction() {
        let extraction = extract_hearings("<html><body></body></html>", "X", fallback()).unwrap();
        assert_eq!(extraction.total_cases, 0);
        assert_eq!(extraction.cause_list_date, None);
        assert!(extraction.hearings.is_empty());
    }
}
