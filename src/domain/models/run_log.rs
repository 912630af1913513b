// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 运行日志实体
///
/// 每次任务执行的审计记录：运行开始时创建，终态时恰好更新一次。
/// 由Worker独占写入，其余组件只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    /// 日志唯一标识符
    pub id: Uuid,
    /// 关联的法院（主体）ID
    pub court_id: Uuid,
    /// 运行状态
    pub status: RunStatus,
    /// 开始时间
    pub started_at: DateTime<FixedOffset>,
    /// 完成时间，运行中为空
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 本次运行持久化的记录数（失败时为部分进度）
    pub records_extracted: i32,
    /// 失败时捕获的错误信息
    pub error_message: Option<String>,
}

/// 运行状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// 运行中
    #[default]
    Running,
    /// 成功完成
    Completed,
    /// 运行失败
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for RunStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(RunStatus::Running),
            "completed" => Ok(RunStatus::Completed),
            "failed" => Ok(RunStatus::Failed),
            _ => Err(()),
        }
    }
}

impl RunLog {
    /// 计算运行时长（毫秒）
    ///
    /// # 返回值
    ///
    /// 已完成运行返回 completed - started，运行中返回None
    pub fn duration_ms(&self) -> Option<i64> {
        self.completed_at
            .map(|done| (done - self.started_at).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn duration_absent_while_running() {
        let log = RunLog {
            id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            status: RunStatus::Running,
            started_at: Utc::now().into(),
            completed_at: None,
            records_extracted: 0,
            error_message: None,
        };
        assert_eq!(log.duration_ms(), None);
    }

    #[test]
    fn duration_computed_when_completed() {
        let started: DateTime<FixedOffset> = Utc::now().into();
        let log = RunLog {
            id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            status: RunStatus::Completed,
            started_at: started,
            completed_at: Some(started + chrono::Duration::milliseconds(1500)),
            records_extracted: 12,
            error_message: None,
        };
        assert_eq!(log.duration_ms(), Some(1500));
    }
}
