// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 听证记录实体
///
/// 自然键为 (court_id, case_number, hearing_date)。同一键的
/// 重复提取只更新可变字段，绝不产生第二行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingRecord {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 关联的法院（主体）ID
    pub court_id: Uuid,
    /// 列表中的序号
    pub sl_no: Option<i32>,
    /// 案件编号（自然键成分）
    pub case_number: String,
    /// 听证日期（自然键成分）
    pub hearing_date: NaiveDate,
    /// 听证时间，如 "10:30 AM"
    pub hearing_time: Option<String>,
    /// 听证方式，如 "HYBRID MODE"
    pub hearing_mode: Option<String>,
    /// 法庭编号（标题中解析出的裸数字），如 "14"
    pub court_number: Option<String>,
    /// 法官姓名
    pub judge: Option<String>,
    /// 列表类型，如 "DAILY LIST"
    pub list_type: Option<String>,
    /// 案件类别（来自单格类别行）
    pub category: Option<String>,
    /// 申请人姓名
    pub petitioner_name: Option<String>,
    /// 被申请人姓名
    pub respondent_name: Option<String>,
    /// 申请人律师
    pub petitioner_advocate: Option<String>,
    /// 被申请人律师
    pub respondent_advocate: Option<String>,
    /// 地区
    pub district: Option<String>,
    /// 提取时的原始载荷，便于排查上游页面变化
    pub raw_payload: serde_json::Value,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
    /// 子记录：临时申请编号，每次重提取整体替换
    pub interim_applications: Vec<String>,
}

/// 提取产出的听证候选记录
///
/// 尚未分配ID与主体，Worker在持久化时补齐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HearingCandidate {
    pub sl_no: Option<i32>,
    pub case_number: String,
    pub hearing_date: NaiveDate,
    pub hearing_time: Option<String>,
    pub hearing_mode: Option<String>,
    pub court_number: Option<String>,
    pub judge: Option<String>,
    pub list_type: Option<String>,
    pub category: Option<String>,
    pub petitioner_name: Option<String>,
    pub respondent_name: Option<String>,
    pub petitioner_advocate: Option<String>,
    pub respondent_advocate: Option<String>,
    pub district: Option<String>,
    pub interim_applications: Vec<String>,
}

impl HearingCandidate {
    /// 构造持久化用的原始载荷
    ///
    /// # 参数
    ///
    /// * `advocate_name` - 触发本次提取的查询姓名
    pub fn raw_payload(&self, advocate_name: &str) -> serde_json::Value {
        serde_json::json!({
            "advocate_name": advocate_name,
            "sl_no": self.sl_no,
            "interim_applications": self.interim_applications,
            "petitioner_name": self.petitioner_name,
            "respondent_name": self.respondent_name,
            "petitioner_advocate": self.petitioner_advocate,
            "respondent_advocate": self.respondent_advocate,
            "district": self.district,
            "court_number": self.court_number,
            "judge": self.judge,
            "hearing_time": self.hearing_time,
            "hearing_mode": self.hearing_mode,
            "list_type": self.list_type,
            "category": self.category,
        })
    }
}
