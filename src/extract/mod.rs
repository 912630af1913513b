// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 提取模块
//!
//! 负责从法院站点取回页面并解析为结构化记录。
//! 导航由 [`navigator`] 的站点特质隔离，解析全部是
//! 可离线测试的纯函数。

pub mod advocate;
pub mod context;
pub mod live_status;
pub mod navigator;
pub mod section;

use thiserror::Error;

/// 提取错误
///
/// 导航失败与结构性解析失败都是致命错误，任务进入重试；
/// 字段级解析失败不在此列，它们软着陆为空值
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 浏览器导航失败（超时、元素缺失、页面未跳转）
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 页面结构不符合预期（无表格、无状态日期、零行）
    #[error("Structural parse failed: {0}")]
    Structure(String),
}
