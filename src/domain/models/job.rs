// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 提取任务实体
///
/// 表示一次对法院网站的数据提取请求：实时上传状态或按律师
/// 检索的听证列表。任务具有状态、幂等键、重试机制和锁定机制。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 任务类型，决定使用哪个提取引擎
    pub job_type: JobType,
    /// 任务状态，跟踪任务在其生命周期中的当前阶段
    pub status: JobStatus,
    /// 幂等键，用于去重任务提交（业务唯一约束）
    pub idempotency_key: String,
    /// 任务参数（律师检索任务携带 advocate_name）
    pub params: serde_json::Value,
    /// 已尝试次数
    pub attempt_count: i32,
    /// 最大尝试次数
    pub max_attempts: i32,
    /// 计划执行时间，重试退避通过该字段实现
    pub scheduled_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
    /// 锁定令牌，持有该任务的工作器ID
    pub lock_token: Option<Uuid>,
    /// 锁定过期时间，超过后任务可被重新获取
    pub lock_expires_at: Option<DateTime<FixedOffset>>,
}

/// 任务类型枚举
///
/// 封闭的两种任务类型。新增类型需要配套新的提取引擎变体，
/// 因此这里不使用开放的字符串分发表。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// 实时状态提取：各法庭的排期表上传状态
    #[default]
    LiveStatus,
    /// 律师检索提取：会话 + 搜索 + 过滤结果集
    AdvocateSearch,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobType::LiveStatus => write!(f, "live_status"),
            JobType::AdvocateSearch => write!(f, "advocate_search"),
        }
    }
}

impl FromStr for JobType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live_status" => Ok(JobType::LiveStatus),
            "advocate_search" => Ok(JobType::AdvocateSearch),
            _ => Err(()),
        }
    }
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Queued → Active → Completed/Failed（失败可退避后重新回到 Queued）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 已入队，任务已创建但尚未开始执行
    #[default]
    Queued,
    /// 活跃中，任务正在被执行
    Active,
    /// 已完成，任务成功执行完成
    Completed,
    /// 已失败，任务执行失败且已达到最大尝试次数
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Active => write!(f, "active"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "active" => Ok(JobStatus::Active),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition")]
    InvalidStateTransition,
}

/// 默认的律师检索名称（空白输入时使用）
pub const DEFAULT_ADVOCATE_NAME: &str = "D NARENDAR NAIK";

impl ExtractionJob {
    /// 创建按需的实时状态任务
    ///
    /// 幂等键包含毫秒时间戳，重复手动触发不会冲突
    pub fn live_status() -> Self {
        let key = format!("live-status-{}", Utc::now().timestamp_millis());
        Self::new(JobType::LiveStatus, key, serde_json::json!({}))
    }

    /// 创建每日定时的实时状态任务
    ///
    /// 幂等键按自然日取值，同一天内的重复触发会被去重
    pub fn live_status_daily(day: chrono::NaiveDate) -> Self {
        let key = format!("live-status-daily-{}", day.format("%Y-%m-%d"));
        Self::new(JobType::LiveStatus, key, serde_json::json!({}))
    }

    /// 创建律师检索任务
    ///
    /// # 参数
    ///
    /// * `advocate_name` - 律师姓名，去除首尾空白；空白时使用默认示例姓名
    pub fn advocate_search(advocate_name: &str) -> Self {
        let name = advocate_name.trim();
        let name = if name.is_empty() {
            DEFAULT_ADVOCATE_NAME
        } else {
            name
        };
        let key = format!(
            "advocate-{}-{}",
            urlencoding::encode(name),
            Utc::now().timestamp_millis()
        );
        Self::new(
            JobType::AdvocateSearch,
            key,
            serde_json::json!({ "advocate_name": name }),
        )
    }

    fn new(job_type: JobType, idempotency_key: String, params: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_type,
            status: JobStatus::Queued,
            idempotency_key,
            params,
            attempt_count: 0,
            max_attempts: 3,
            scheduled_at: None,
            created_at: Utc::now().into(),
            started_at: None,
            completed_at: None,
            updated_at: Utc::now().into(),
            lock_token: None,
            lock_expires_at: None,
        }
    }

    /// 读取律师检索参数
    ///
    /// # 返回值
    ///
    /// 参数中的律师姓名，缺失时返回默认示例姓名
    pub fn advocate_name(&self) -> String {
        self.params
            .get("advocate_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_ADVOCATE_NAME)
            .to_string()
    }

    /// 判断任务是否还有剩余尝试额度
    pub fn can_retry(&self) -> bool {
        self.attempt_count < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advocate_job_defaults_blank_name() {
        let job = ExtractionJob::advocate_search("   ");
        assert_eq!(job.advocate_name(), DEFAULT_ADVOCATE_NAME);
        assert!(job.idempotency_key.starts_with("advocate-D%20NARENDAR"));
    }

    #[test]
    fn advocate_job_trims_name() {
        let job = ExtractionJob::advocate_search("  JANE DOE ");
        assert_eq!(job.advocate_name(), "JANE DOE");
        assert_eq!(job.job_type, JobType::AdvocateSearch);
    }

    #[test]
    fn daily_key_is_stable_per_day() {
        let day = chrono::NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let a = ExtractionJob::live_status_daily(day);
        let b = ExtractionJob::live_status_daily(day);
        assert_eq!(a.idempotency_key, b.idempotency_key);
        assert_eq!(a.idempotency_key, "live-status-daily-2026-02-23");
    }

    #[test]
    fn on_demand_keys_embed_timestamp() {
        let job = ExtractionJob::live_status();
        assert!(job.idempotency_key.starts_with("live-status-"));
        assert!(!job.idempotency_key.starts_with("live-status-daily-"));
    }

    #[test]
    fn job_type_round_trips() {
        assert_eq!(
            "advocate_search".parse::<JobType>().unwrap(),
            JobType::AdvocateSearch
        );
        assert_eq!(JobType::LiveStatus.to_string(), "live_status");
    }

    #[test]
    fn retry_budget() {
        let mut job = ExtractionJob::live_status();
        assert!(job.can_retry());
        job.attempt_count = 3;
        assert!(!job.can_retry());
    }
}
