// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 法院实体（主体注册表）
///
/// 任务及其产出记录关联的站点身份。当前部署只有一条记录
/// （Telangana高等法院），但记录仍落库以保证可追溯性。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    /// 法院唯一标识符
    pub id: Uuid,
    /// 法院全称
    pub name: String,
    /// 法院代码，业务唯一约束
    pub code: String,
    /// 排期网站入口URL
    pub url: String,
    /// 管辖区
    pub jurisdiction: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}

/// Telangana高等法院的固定主体信息
pub struct CourtSeed {
    pub name: &'static str,
    pub code: &'static str,
    pub url: &'static str,
    pub jurisdiction: &'static str,
}

/// 当前建模的唯一法院
pub const TSHC: CourtSeed = CourtSeed {
    name: "High Court for the State of Telangana",
    code: "TSHC",
    url: "https://causelist.tshc.gov.in/",
    jurisdiction: "Telangana",
};
