// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 站点导航器
//!
//! [`CourtSite`] 把"怎样拿到页面"与"怎样解析页面"分开：
//! 解析层只消费 [`PageSnapshot`]，测试时可以直接注入HTML。
//! [`ChromiumSite`] 是生产实现，每次运行独立启动并回收浏览器，
//! 避免长驻Chrome带来的会话串扰。

use crate::config::settings::SiteSettings;
use crate::extract::ExtractError;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use url::Url;

static ADVOCATE_FORM_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)advocateCauseList").unwrap());
static ADVOCATE_VIEW_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)advocateWiseView").unwrap());

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 页面快照
///
/// 导航结束时的最终URL与完整HTML
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: Url,
    pub html: String,
}

/// 法院站点特质
///
/// 每个方法完成一条完整的导航路径并返回落点页面
#[async_trait]
pub trait CourtSite: Send + Sync {
    /// 取回排期表上传状态页
    async fn status_page(&self) -> Result<PageSnapshot, ExtractError>;
    /// 从首页走到指定律师的排期结果页
    ///
    /// # 参数
    ///
    /// * `advocate_name` - 查询表单中填写的律师姓名
    async fn advocate_results(&self, advocate_name: &str) -> Result<PageSnapshot, ExtractError>;
}

/// 基于chromiumoxide的站点实现
pub struct ChromiumSite {
    settings: SiteSettings,
}

impl ChromiumSite {
    pub fn new(settings: SiteSettings) -> Self {
        Self { settings }
    }

    /// 启动一次性浏览器实例及其事件处理任务
    async fn launch(&self) -> Result<(Browser, JoinHandle<()>), ExtractError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .request_timeout(Duration::from_secs(self.settings.nav_timeout_secs))
            .build()
            .map_err(ExtractError::Navigation)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExtractError::Navigation(format!("Browser launch failed: {}", e)))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handle))
    }

    /// 关闭浏览器并回收事件任务
    async fn teardown(mut browser: Browser, handle: JoinHandle<()>) {
        if let Err(e) = browser.close().await {
            tracing::warn!("Browser close failed: {}", e);
        }
        let _ = browser.wait().await;
        handle.abort();
    }

    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(self.settings.settle_ms)).await;
    }

    /// 轮询等待元素出现，超时失败
    async fn wait_for_element(&self, page: &Page, selector: &str) -> Result<(), ExtractError> {
        let deadline = Instant::now() + Duration::from_secs(self.settings.element_timeout_secs);
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ExtractError::Navigation(format!(
                    "Timed out waiting for element: {}",
                    selector
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// 轮询等待页面URL匹配目标模式
    async fn wait_for_url(&self, page: &Page, pattern: &Regex) -> Result<Url, ExtractError> {
        let deadline = Instant::now() + Duration::from_secs(self.settings.nav_timeout_secs);
        loop {
            if let Ok(Some(current)) = page.url().await {
                if pattern.is_match(&current) {
                    return Url::parse(&current).map_err(|e| {
                        ExtractError::Navigation(format!("Unparseable page URL {}: {}", current, e))
                    });
                }
            }
            if Instant::now() >= deadline {
                return Err(ExtractError::Navigation(format!(
                    "Timed out waiting for URL matching {}",
                    pattern.as_str()
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// 按可见文本点击链接
    ///
    /// 站点链接没有稳定的id/class，只能按文本匹配
    async fn click_link_by_text(&self, page: &Page, pattern: &str) -> Result<(), ExtractError> {
        let script = format!(
            r#"(() => {{
                const re = new RegExp({pattern:?}, 'i');
                const link = Array.from(document.querySelectorAll('a'))
                    .find(a => re.test((a.textContent || '').trim()));
                if (!link) return false;
                link.click();
                return true;
            }})()"#,
        );
        let clicked: bool = page
            .evaluate(script)
            .await
            .map_err(|e| ExtractError::Navigation(format!("Link click script failed: {}", e)))?
            .into_value()
            .map_err(|e| ExtractError::Navigation(format!("Link click result invalid: {}", e)))?;
        if !clicked {
            return Err(ExtractError::Navigation(format!(
                "Link matching /{}/ not found",
                pattern
            )));
        }
        Ok(())
    }

    async fn snapshot(&self, page: &Page) -> Result<PageSnapshot, ExtractError> {
        let current = page
            .url()
            .await
            .map_err(|e| ExtractError::Navigation(e.to_string()))?
            .ok_or_else(|| ExtractError::Navigation("Page has no URL".to_string()))?;
        let url = Url::parse(&current)
            .map_err(|e| ExtractError::Navigation(format!("Unparseable page URL: {}", e)))?;
        let html = page
            .content()
            .await
            .map_err(|e| ExtractError::Navigation(format!("Content capture failed: {}", e)))?;
        Ok(PageSnapshot { url, html })
    }
}

#[async_trait]
impl CourtSite for ChromiumSite {
    async fn status_page(&self) -> Result<PageSnapshot, ExtractError> {
        let (browser, handle) = self.launch().await?;

        let result = async {
            let page = browser
                .new_page(self.settings.status_url.as_str())
                .await
                .map_err(|e| ExtractError::Navigation(format!("Status page load failed: {}", e)))?;
            self.wait_for_element(&page, "table").await?;
            self.settle().await;
            self.snapshot(&page).await
        }
        .await;

        Self::teardown(browser, handle).await;
        result
    }

    async fn advocate_results(&self, advocate_name: &str) -> Result<PageSnapshot, ExtractError> {
        let (browser, handle) = self.launch().await?;

        let result = async {
            let page = browser
                .new_page(self.settings.homepage_url.as_str())
                .await
                .map_err(|e| ExtractError::Navigation(format!("Homepage load failed: {}", e)))?;
            self.settle().await;

            self.click_link_by_text(&page, r"daily\s*list").await?;
            self.settle().await;

            self.click_link_by_text(&page, r"advocate\s*wise").await?;
            self.wait_for_url(&page, &ADVOCATE_FORM_URL_RE).await?;

            self.wait_for_element(&page, "input[type='text']").await?;
            let input = page
                .find_element("input[type='text']")
                .await
                .map_err(|e| ExtractError::Navigation(format!("Search input missing: {}", e)))?;
            input
                .click()
                .await
                .map_err(|e| ExtractError::Navigation(format!("Search input focus failed: {}", e)))?;
            input
                .type_str(advocate_name)
                .await
                .map_err(|e| ExtractError::Navigation(format!("Search input fill failed: {}", e)))?;

            self.click_submit(&page).await?;
            self.wait_for_url(&page, &ADVOCATE_VIEW_URL_RE).await?;
            self.settle().await;

            self.snapshot(&page).await
        }
        .await;

        Self::teardown(browser, handle).await;
        result
    }
}

impl ChromiumSite {
    /// 点击提交控件（按钮文本或submit输入值为 "SUBMIT"）
    async fn click_submit(&self, page: &Page) -> Result<(), ExtractError> {
        let script = r#"(() => {
            const re = /submit/i;
            const candidates = Array.from(
                document.querySelectorAll("button, input[type='submit'], input[type='button']")
            );
            const target = candidates.find(el =>
                re.test((el.textContent || '').trim()) || re.test(el.value || ''));
            if (!target) return false;
            target.click();
            return true;
        })()"#;
        let clicked: bool = page
            .evaluate(script)
            .await
            .map_err(|e| ExtractError::Navigation(format!("Submit click script failed: {}", e)))?
            .into_value()
            .map_err(|e| ExtractError::Navigation(format!("Submit click result invalid: {}", e)))?;
        if !clicked {
            return Err(ExtractError::Navigation(
                "Submit control not found on search form".to_string(),
            ));
        }
        Ok(())
    }
}
