// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 法庭排期表上传状态实体
///
/// 自然键为 (court_hall_no, status_date)。同一天的重复提取
/// 原地更新，绝不产生重复行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtHallStatus {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 关联的法院（主体）ID
    pub court_id: Uuid,
    /// 状态表中的序号
    pub sl_no: Option<i32>,
    /// 法庭编号（自然键成分）
    pub court_hall_no: String,
    /// 合议庭名称
    pub bench_name: Option<String>,
    /// 列表类型
    pub list_type: Option<String>,
    /// 上传状态原文
    pub status: String,
    /// 上传时间（站点本地时间，无时区）
    pub uploaded_at: Option<NaiveDateTime>,
    /// 排期表文档链接，法官休假时为空
    pub document_url: Option<String>,
    /// 状态所属日期（自然键成分）
    pub status_date: NaiveDate,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 提取产出的上传状态候选记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallStatusCandidate {
    pub sl_no: Option<i32>,
    pub court_hall_no: String,
    pub bench_name: Option<String>,
    pub list_type: Option<String>,
    pub status: String,
    pub uploaded_at: Option<NaiveDateTime>,
    pub document_url: Option<String>,
    pub status_date: NaiveDate,
}
