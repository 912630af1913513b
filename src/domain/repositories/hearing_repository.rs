// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hearing::{HearingCandidate, HearingRecord};
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// 听证查询参数
#[derive(Debug, Default, Clone)]
pub struct HearingQueryParams {
    pub court_id: Option<Uuid>,
    /// 案件编号子串，大小写不敏感
    pub case_number: Option<String>,
    /// 律师姓名子串，匹配任意一方律师，大小写不敏感
    pub advocate: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: u64,
    pub offset: u64,
}

/// 听证仓库特质
///
/// 写入接口按自然键 (court_id, case_number, hearing_date) 幂等：
/// 不存在则插入，存在则只更新可变字段；子记录整体替换
#[async_trait]
pub trait HearingRepository: Send + Sync {
    /// 按自然键幂等写入一条候选记录，并替换其临时申请子集
    ///
    /// # 参数
    ///
    /// * `court_id` - 主体法院ID
    /// * `candidate` - 提取产出的候选记录
    /// * `raw_payload` - 随记录保存的原始载荷
    ///
    /// # 返回值
    ///
    /// 持久化后的记录（含子记录）
    async fn upsert(
        &self,
        court_id: Uuid,
        candidate: &HearingCandidate,
        raw_payload: serde_json::Value,
    ) -> Result<HearingRecord, RepositoryError>;
    /// 分页查询听证记录，按听证日期倒序、案件编号正序
    async fn query(
        &self,
        params: HearingQueryParams,
    ) -> Result<(Vec<HearingRecord>, u64), RepositoryError>;
}
