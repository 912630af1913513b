// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 上传状态提取
//!
//! 状态页是单表结构：每行一个法庭，含合议庭、列表类型、
//! 上传状态与排期表文档链接。日期取自页面横幅。

use crate::domain::models::hall_status::HallStatusCandidate;
use crate::extract::navigator::CourtSite;
use crate::extract::{context, ExtractError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use url::Url;

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static TR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static TD_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static A_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// 文档链接列的下标（序号、法庭、合议庭、列表类型、状态、上传时间之后）
const LINK_CELL_IDX: usize = 6;

fn cell_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_on_leave(status: &str) -> bool {
    status.to_uppercase().contains("ON LEAVE")
}

/// 解析状态页HTML为上传状态候选记录
///
/// # 参数
///
/// * `html` - 状态页完整HTML
/// * `page_url` - 页面URL，用于把相对文档链接解析为绝对链接
///
/// # 返回值
///
/// 候选记录列表；页面缺少状态日期、表格或有效行时返回结构错误
pub fn extract_hall_statuses(
    html: &str,
    page_url: &Url,
) -> Result<Vec<HallStatusCandidate>, ExtractError> {
    let document = Html::parse_document(html);

    let body_text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    let status_date = context::parse_status_date_heading(&body_text).ok_or_else(|| {
        ExtractError::Structure("Status date banner not found on status page".to_string())
    })?;

    let table = document
        .select(&TABLE_SEL)
        .next()
        .ok_or_else(|| ExtractError::Structure("No table found on status page".to_string()))?;

    let mut out = Vec::new();
    for row in table.select(&TR_SEL) {
        let cells: Vec<ElementRef<'_>> = row.select(&TD_SEL).collect();
        if cells.len() < 5 {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(|c| cell_text(*c)).collect();

        let court_hall_no = texts[1].trim().to_string();
        let bench_name = Some(texts[2].trim())
            .filter(|t| !t.is_empty())
            .map(String::from);
        let status = texts[4].trim().to_string();
        // 表头行与装饰行没有实际内容
        if court_hall_no.is_empty() && bench_name.is_none() && status.is_empty() {
            continue;
        }

        let sl_no = Some(texts[0].trim())
            .filter(|t| context::is_numeric(t))
            .and_then(|t| t.parse::<i32>().ok());
        let list_type = Some(texts[3].trim())
            .filter(|t| !t.is_empty())
            .map(String::from);
        let uploaded_at = texts.get(5).and_then(|t| context::parse_status_datetime(t));

        // 链接优先取文档列，列内没有再扫整行
        let href = cells
            .get(LINK_CELL_IDX)
            .and_then(|c| c.select(&A_SEL).next())
            .or_else(|| row.select(&A_SEL).next())
            .and_then(|a| a.value().attr("href"));
        let document_url = if is_on_leave(&status) {
            None
        } else {
            href.and_then(|h| page_url.join(h).ok()).map(String::from)
        };

        out.push(HallStatusCandidate {
            sl_no,
            court_hall_no,
            bench_name,
            list_type,
            status,
            uploaded_at,
            document_url,
            status_date,
        });
    }

    if out.is_empty() {
        return Err(ExtractError::Structure(
            "Status page yielded zero rows".to_string(),
        ));
    }
    Ok(out)
}

/// 上传状态提取引擎
///
/// 组合站点导航与解析，产出可直接持久化的候选记录
pub struct LiveStatusEngine<S: CourtSite> {
    site: Arc<S>,
}

impl<S: CourtSite> LiveStatusEngine<S> {
    pub fn new(site: Arc<S>) -> Self {
        Self { site }
    }

    pub async fn run(&self) -> Result<Vec<HallStatusCandidate>, ExtractError> {
        let snapshot = self.site.status_page().await?;
        let statuses = extract_hall_statuses(&snapshot.html, &snapshot.url)?;
        tracing::info!(rows = statuses.len(), "Live status extraction parsed");
        Ok(statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn page_url() -> Url {
        Url::parse("https://causelist.tshc.gov.in/showCauselistUploadStatus").unwrap()
    }

    const STATUS_PAGE: &str = r#"
        <html><body>
          <h2>CAUSE LIST UPLOADING STATUS DATED: 23-02-2026</h2>
          <table>
            <tr><th>Sl</th><th>Court Hall</th><th>Bench</th><th>List</th><th>Status</th><th>Time</th><th>View</th></tr>
            <tr><td>1</td><td>1</td><td>CJ BENCH</td><td>DAILY LIST</td><td>UPLOADED</td>
                <td>23-02-2026 09:15</td><td><a href="/pdfs/court1.pdf">View</a></td></tr>
            <tr><td>2</td><td>14</td><td>JUSTICE X</td><td>DAILY LIST</td><td>JUDGE IS ON LEAVE</td>
                <td></td><td><a href="/pdfs/court14.pdf">View</a></td></tr>
            <tr><td></td><td></td><td></td><td></td><td></td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn parses_rows_and_resolves_links() {
        let statuses = extract_hall_statuses(STATUS_PAGE, &page_url()).unwrap();
        // header row uses th cells and the all-empty row is skipped
        assert_eq!(statuses.len(), 2);
        let uploaded = statuses
            .iter()
            .find(|s| s.court_hall_no == "1")
            .expect("court hall 1 present");
        assert_eq!(uploaded.sl_no, Some(1));
        assert_eq!(uploaded.bench_name.as_deref(), Some("CJ BENCH"));
        assert_eq!(uploaded.status, "UPLOADED");
        assert_eq!(
            uploaded.document_url.as_deref(),
            Some("https://causelist.tshc.gov.in/pdfs/court1.pdf")
        );
        assert_eq!(
            uploaded.status_date,
            NaiveDate::from_ymd_opt(2026, 2, 23).unwrap()
        );
        let uploaded_at = uploaded.uploaded_at.unwrap();
        assert_eq!(uploaded_at.format("%H:%M").to_string(), "09:15");
    }

    #[test]
    fn on_leave_clears_document_link() {
        let statuses = extract_hall_statuses(STATUS_PAGE, &page_url()).unwrap();
        let on_leave = statuses
            .iter()
            .find(|s| s.court_hall_no == "14")
            .expect("court hall 14 present");
        assert_eq!(on_leave.document_url, None);
        assert_eq!(on_leave.uploaded_at, None);
    }

    #[test]
    fn missing_date_banner_is_structural_failure() {
        let html = "<html><body><table><tr><td>1</td><td>1</td><td>B</td><td>L</td><td>S</td></tr></table></body></html>";
        let err = extract_hall_statuses(html, &page_url()).unwrap_err();
        assert!(matches!(err, ExtractError::Structure(_)));
    }

    #[test]
    fn missing_table_is_structural_failure() {
        let html = "<html><body><h2>DATED: 23-02-2026</h2></body></html>";
        let err = extract_hall_statuses(html, &page_url()).unwrap_err();
        assert!(matches!(err, ExtractError::Structure(_)));
    }

    #[test]
    fn zero_rows_is_structural_failure() {
        let html = r#"<html><body><h2>DATED: 23-02-2026</h2>
            <table><tr><td></td><td></td><td></td><td></td><td></td></tr></table>
        </body></html>"#;
        let err = extract_hall_statuses(html, &page_url()).unwrap_err();
        assert!(matches!(err, ExtractError::Structure(_)));
    }
}
