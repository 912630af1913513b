// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 排期表分段采集与折叠
//!
//! 先把页面切成"表格 + 前置标题"的分段快照，再带着粘性上下文
//! 逐段折叠出听证候选记录。标题解析失败时继承上一段的上下文。

use crate::domain::models::hearing::HearingCandidate;
use crate::extract::context;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static TR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static TD_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

static LIST_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(AFTER\s+ADJOURNED\s+MOTION\s+LIST|AFTER\s+MOTION\s+LIST|MOTION\s+LIST|DAILY\s+LIST)")
        .unwrap()
});

/// 前置标题向上回溯的兄弟元素数量上限
const HEADING_LOOKBACK: usize = 5;

/// 单个表格分段的快照
#[derive(Debug, Clone)]
pub struct TableSection {
    /// 紧邻表格的前一个元素中识别出的列表类型
    pub list_type: Option<String>,
    /// 表格前最多5个兄弟元素的文本，按文档顺序拼接
    pub heading_text: String,
    /// 表格行，每行为单元格文本列表
    pub rows: Vec<Vec<String>>,
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 采集页面中所有表格分段，按文档顺序返回
pub fn collect_sections(html: &str) -> Vec<TableSection> {
    let document = Html::parse_document(html);
    let mut sections = Vec::new();

    for table in document.select(&TABLE_SEL) {
        // prev_siblings走近到远，取前5个元素后反转回文档顺序
        let preceding: Vec<ElementRef<'_>> = table
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .take(HEADING_LOOKBACK)
            .collect();

        let list_type = preceding
            .first()
            .map(|el| element_text(*el))
            .and_then(|text| {
                LIST_TYPE_RE
                    .captures(&text)
                    .map(|caps| caps[1].trim().to_string())
            });

        let heading_text = preceding
            .iter()
            .rev()
            .map(|el| element_text(*el))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let rows = table
            .select(&TR_SEL)
            .map(|tr| tr.select(&TD_SEL).map(element_text).collect::<Vec<_>>())
            .filter(|cells: &Vec<String>| !cells.is_empty())
            .collect();

        sections.push(TableSection {
            list_type,
            heading_text,
            rows,
        });
    }

    sections
}

/// 折叠过程中的粘性上下文
///
/// 标题能解析出的字段覆盖，解析不出的字段保留上一段的值
#[derive(Debug, Default, Clone)]
struct HearingContext {
    list_type: Option<String>,
    category: Option<String>,
    court_number: Option<String>,
    judge: Option<String>,
    hearing_date: Option<NaiveDate>,
    hearing_time: Option<String>,
    hearing_mode: Option<String>,
}

impl HearingContext {
    fn absorb_heading(&mut self, heading: &str) {
        if let Some(v) = context::parse_court_number(heading) {
            self.court_number = Some(v);
        }
        if let Some(v) = context::parse_judge(heading) {
            self.judge = Some(v);
        }
        if let Some(v) = context::parse_heading_date(heading)
            .or_else(|| context::parse_long_date(heading))
        {
            self.hearing_date = Some(v);
        }
        if let Some(v) = context::parse_time(heading) {
            self.hearing_time = Some(v);
        }
        if let Some(v) = context::parse_mode(heading) {
            self.hearing_mode = Some(v);
        }
    }
}

/// 把分段序列折叠为听证候选记录
///
/// # 参数
///
/// * `sections` - [`collect_sections`] 的产出
/// * `fallback_date` - 标题中无日期时使用的提取日
///
/// # 返回值
///
/// 未经律师过滤的全部候选记录
pub fn fold_sections(sections: &[TableSection], fallback_date: NaiveDate) -> Vec<HearingCandidate> {
    let mut ctx = HearingContext::default();
    let mut out = Vec::new();

    for section in sections {
        if let Some(list_type) = &section.list_type {
            ctx.list_type = Some(list_type.clone());
        }
        ctx.absorb_heading(&section.heading_text);

        for cells in &section.rows {
            // 单格非数字行是分类标题行
            if cells.len() == 1 {
                let text = cells[0].trim();
                if !text.is_empty() && !context::is_numeric(text) {
                    ctx.category = Some(text.to_string());
                }
                continue;
            }
            if cells.len() < 5 {
                continue;
            }

            let sl_no = Some(cells[0].trim())
                .filter(|t| context::is_numeric(t))
                .and_then(|t| t.parse::<i32>().ok());
            let (case_number, interim_applications) = context::parse_case_column(&cells[1]);
            if case_number.is_empty() {
                continue;
            }
            let (petitioner_name, respondent_name) = context::split_parties(&cells[2]);
            let petitioner_advocate = Some(cells[3].trim())
                .filter(|t| !t.is_empty())
                .map(String::from);
            let respondent_advocate = Some(cells[4].trim())
                .filter(|t| !t.is_empty())
                .map(String::from);
            let district = cells
                .get(5)
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(String::from);

            out.push(HearingCandidate {
                sl_no,
                case_number,
                hearing_date: ctx.hearing_date.unwrap_or(fallback_date),
                hearing_time: ctx.hearing_time.clone(),
                hearing_mode: ctx.hearing_mode.clone(),
                court_number: ctx.court_number.clone(),
                judge: ctx.judge.clone(),
                list_type: ctx.list_type.clone(),
                category: ctx.category.clone(),
                petitioner_name,
                respondent_name,
                petitioner_advocate,
                respondent_advocate,
                district,
                interim_applications,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
          <p>DAILY LIST</p>
          <h3>COURT NO. 14 / THE HON'BLE SRI JUSTICE X / HYBRID MODE
              To be heard on the 23rd day of February 2026 AT 10:30 AM</h3>
          <table>
            <tr><td>FOR ADMISSION</td></tr>
            <tr><td>1</td><td>WP 123/2026
IA 45/2026</td><td>A vs B</td><td>D NARENDAR NAIK</td><td>GP FOR HOME</td><td>HYDERABAD</td></tr>
            <tr><td>2</td><td>WA 9/2026</td><td>C vs D</td><td>OTHER COUNSEL</td><td></td></tr>
          </table>
          <h3>COURT NO. 15</h3>
          <table>
            <tr><td>3</td><td>CRLP 7/2026</td><td>E vs F</td><td>D NARENDAR NAIK</td><td>PP</td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn sections_capture_heading_and_rows() {
        let sections = collect_sections(PAGE);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].list_type, None);
        assert!(sections[0].heading_text.contains("DAILY LIST"));
        assert!(sections[0].heading_text.contains("COURT NO. 14"));
        assert_eq!(sections[0].rows.len(), 3);
        assert_eq!(sections[0].rows[0].len(), 1);
        assert!(sections[1].heading_text.contains("COURT NO. 15"));
    }

    #[test]
    fn immediate_preceding_list_type_detected() {
        let html = r#"<body><div>MOTION LIST</div><table><tr><td>x</td></tr></table></body>"#;
        let sections = collect_sections(html);
        assert_eq!(sections[0].list_type.as_deref(), Some("MOTION LIST"));
    }

    #[test]
    fn fold_applies_sticky_context() {
        let sections = collect_sections(PAGE);
        let hearings = fold_sections(&sections, fallback());
        assert_eq!(hearings.len(), 3);

        let first = &hearings[0];
        assert_eq!(first.sl_no, Some(1));
        assert_eq!(first.case_number, "WP 123/2026");
        assert_eq!(first.interim_applications, vec!["IA 45/2026".to_string()]);
        assert_eq!(first.category.as_deref(), Some("FOR ADMISSION"));
        assert_eq!(first.court_number.as_deref(), Some("14"));
        assert_eq!(first.judge.as_deref(), Some("THE HON'BLE SRI JUSTICE X"));
        assert_eq!(first.hearing_time.as_deref(), Some("10:30 AM"));
        assert_eq!(first.hearing_mode.as_deref(), Some("HYBRID MODE"));
        assert_eq!(
            first.hearing_date,
            NaiveDate::from_ymd_opt(2026, 2, 23).unwrap()
        );
        assert_eq!(first.district.as_deref(), Some("HYDERABAD"));

        // second row has empty fifth cell and no district
        assert_eq!(hearings[1].respondent_advocate, None);
        assert_eq!(hearings[1].district, None);

        // second section inherits judge/date/time but updates court number
        let third = &hearings[2];
        assert_eq!(third.court_number.as_deref(), Some("15"));
        assert_eq!(third.judge.as_deref(), Some("THE HON'BLE SRI JUSTICE X"));
        assert_eq!(
            third.hearing_date,
            NaiveDate::from_ymd_opt(2026, 2, 23).unwrap()
        );
    }

    #[test]
    fn headingless_section_falls_back_to_extraction_day() {
        let html = r#"<body><table>
            <tr><td>1</td><td>WP 1/2026</td><td>A vs B</td><td>X</td><td>Y</td></tr>
        </table></body>"#;
        let sections = collect_sections(html);
        let hearings = fold_sections(&sections, fallback());
        assert_eq!(hearings.len(), 1);
        assert_eq!(hearings[0].hearing_date, fallback());
        assert_eq!(hearings[0].court_number, None);
    }

    #[test]
    fn short_rows_and_numeric_single_cells_skipped() {
        let html = r#"<body><table>
            <tr><td>42</td></tr>
            <tr><td>1</td><td>WP 1/2026</td><td>A vs B</td></tr>
        </table></body>"#;
        let hearings = fold_sections(&collect_sections(html), fallback());
        assert!(hearings.is_empty());
    }

    #[test]
    fn category_carries_across_list_types_until_replaced() {
        let html = r#"<body>
            <p>MOTION LIST</p>
            <table>
              <tr><td>FOR ADMISSION</td></tr>
              <tr><td>1</td><td>WP 1/2026</td><td>A vs B</td><td>X</td><td>Y</td></tr>
            </table>
            <p>AFTER MOTION LIST</p>
            <table>
              <tr><td>2</td><td>WP 2/2026</td><td>C vs D</td><td>X</td><td>Y</td></tr>
              <tr><td>FOR ORDERS</td></tr>
              <tr><td>3</td><td>WP 3/2026</td><td>E vs F</td><td>X</td><td>Y</td></tr>
            </table>
        </body>"#;
        let hearings = fold_sections(&collect_sections(html), fallback());
        assert_eq!(hearings[0].list_type.as_deref(), Some("MOTION LIST"));
        assert_eq!(hearings[0].category.as_deref(), Some("FOR ADMISSION"));
        // 分类跨列表类型延续，只有新的单格分类行才替换
        assert_eq!(hearings[1].list_type.as_deref(), Some("AFTER MOTION LIST"));
        assert_eq!(hearings[1].category.as_deref(), Some("FOR ADMISSION"));
        assert_eq!(hearings[2].category.as_deref(), Some("FOR ORDERS"));
    }
}
