// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{ScheduleSettings, WorkerSettings};
use crate::domain::models::job::{ExtractionJob, JobType};
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::schedule_repository::ScheduleRepository;
use crate::queue::job_queue::{JobQueue, QueueError};
use chrono::{DateTime, Duration, Local};
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info, warn};

/// 任务调度器
///
/// 周期性检查持久化的cron条目并触发每日提取任务，同时承担
/// 队列维护工作：回收过期锁、修剪终态任务。触发本身不保证
/// 恰好一次，每日任务靠幂等键去重。
pub struct ExtractionScheduler<R, S, Q>
where
    R: JobRepository + Send + Sync + 'static,
    S: ScheduleRepository + Send + Sync + 'static,
    Q: JobQueue + Clone + Send + Sync + 'static,
{
    /// 任务仓库（维护操作直连仓库）
    job_repository: Arc<R>,
    /// 调度仓库
    schedule_repository: Arc<S>,
    /// 任务队列
    queue: Q,
    /// 调度配置
    schedule_settings: ScheduleSettings,
    /// Worker配置（锁超时用于卡死任务回收）
    worker_settings: WorkerSettings,
}

impl<R, S, Q> ExtractionScheduler<R, S, Q>
where
    R: JobRepository + Send + Sync + 'static,
    S: ScheduleRepository + Send + Sync + 'static,
    Q: JobQueue + Clone + Send + Sync + 'static,
{
    pub fn new(
        job_repository: Arc<R>,
        schedule_repository: Arc<S>,
        queue: Q,
        schedule_settings: ScheduleSettings,
        worker_settings: WorkerSettings,
    ) -> Self {
        Self {
            job_repository,
            schedule_repository,
            queue,
            schedule_settings,
            worker_settings,
        }
    }

    /// 核对每日调度条目
    ///
    /// 保证恰好存在一条与配置一致的实时状态cron条目：
    /// 缺失时创建，模式变更后删除旧条目。重复调用是无害的。
    pub async fn ensure_daily_schedule(&self) -> Result<(), QueueError> {
        let entries = self
            .schedule_repository
            .list_for_type(JobType::LiveStatus)
            .await?;

        let wanted = self.schedule_settings.daily_cron.as_str();
        let mut have_wanted = false;
        for entry in entries {
            if entry.cron_pattern == wanted && !have_wanted {
                have_wanted = true;
                continue;
            }
            info!(
                pattern = %entry.cron_pattern,
                "Removing stale daily schedule entry"
            );
            self.schedule_repository.delete(entry.id).await?;
        }

        if !have_wanted {
            self.schedule_repository
                .create(JobType::LiveStatus, wanted)
                .await?;
            info!(pattern = %wanted, "Registered daily live status schedule");
        }
        Ok(())
    }

    async fn tick(&self, window_start: DateTime<Local>, now: DateTime<Local>) {
        // 到期的每日条目入队；幂等键按自然日去重，多实例竞争无害
        match self
            .schedule_repository
            .list_for_type(JobType::LiveStatus)
            .await
        {
            Ok(entries) => {
                for entry in entries {
                    if due_within(&entry.cron_pattern, window_start, now) {
                        let job = ExtractionJob::live_status_daily(now.date_naive());
                        match self.queue.enqueue(job).await {
                            Ok(enqueued) => {
                                info!(
                                    job_id = %enqueued.id,
                                    key = %enqueued.idempotency_key,
                                    "Daily live status job enqueued"
                                );
                            }
                            Err(e) => error!("Failed to enqueue daily job: {}", e),
                        }
                    }
                }
            }
            Err(e) => error!("Failed to list schedule entries: {}", e),
        }

        let lock_timeout = Duration::seconds(self.worker_settings.lock_timeout_secs as i64);
        match self.job_repository.reset_stuck_jobs(lock_timeout).await {
            Ok(count) if count > 0 => info!("Reset {} stuck jobs", count),
            Ok(_) => {}
            Err(e) => error!("Failed to reset stuck jobs: {}", e),
        }

        match self
            .job_repository
            .prune_terminal_jobs(
                self.schedule_settings.keep_completed,
                self.schedule_settings.keep_failed,
            )
            .await
        {
            Ok(count) if count > 0 => info!("Pruned {} terminal jobs", count),
            Ok(_) => {}
            Err(e) => error!("Failed to prune terminal jobs: {}", e),
        }
    }

    /// 启动调度器后台任务
    ///
    /// # 返回值
    ///
    /// 返回后台任务的句柄
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let tick_secs = self.schedule_settings.tick_interval_secs;

        tokio::spawn(async move {
            let mut ticker = interval(TokioDuration::from_secs(tick_secs));
            let mut last_check = Local::now();

            loop {
                ticker.tick().await;
                let now = Local::now();
                self.tick(last_check, now).await;
                last_check = now;
            }
        })
    }
}

/// 判断cron条目在检查窗口 (window_start, now] 内是否到期
fn due_within(pattern: &str, window_start: DateTime<Local>, now: DateTime<Local>) -> bool {
    match croner::Cron::from_str(pattern) {
        Ok(cron) => match cron.find_next_occurrence(&window_start, false) {
            Ok(next) => next <= now,
            Err(e) => {
                warn!(pattern = %pattern, "Cron occurrence lookup failed: {}", e);
                false
            }
        },
        Err(e) => {
            warn!(pattern = %pattern, "Invalid cron pattern: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn six_am_cron_due_when_window_spans_it() {
        let window_start = local(2026, 2, 23, 5, 59);
        let now = local(2026, 2, 23, 6, 0);
        assert!(due_within("0 6 * * *", window_start, now));
    }

    #[test]
    fn six_am_cron_not_due_outside_window() {
        let window_start = local(2026, 2, 23, 6, 1);
        let now = local(2026, 2, 23, 6, 2);
        assert!(!due_within("0 6 * * *", window_start, now));
    }

    #[test]
    fn invalid_pattern_never_fires() {
        let window_start = local(2026, 2, 23, 0, 0);
        let now = local(2026, 2, 23, 23, 59);
        assert!(!due_within("not a cron", window_start, now));
    }
}
