// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::{Duration, Local};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::court::TSHC;
use crate::domain::models::job::{ExtractionJob, JobType};
use crate::domain::repositories::court_repository::CourtRepository;
use crate::domain::repositories::hall_status_repository::HallStatusRepository;
use crate::domain::repositories::hearing_repository::HearingRepository;
use crate::domain::repositories::run_log_repository::RunLogRepository;
use crate::extract::advocate::AdvocateEngine;
use crate::extract::live_status::LiveStatusEngine;
use crate::extract::navigator::CourtSite;
use crate::queue::job_queue::JobQueue;
use crate::utils::errors::WorkerError;

/// 重试退避基数（秒），第n次失败后等待 base * 2^(n-1)
const RETRY_BACKOFF_BASE_SECS: i64 = 5;

/// 提取工作者
///
/// 从队列领取任务，执行对应的提取引擎并持久化产出。
/// 每次执行写一条运行日志：开始时created，终态时恰好更新一次。
pub struct ExtractWorker<S>
where
    S: CourtSite + 'static,
{
    queue: Arc<dyn JobQueue>,
    court_repository: Arc<dyn CourtRepository>,
    run_log_repository: Arc<dyn RunLogRepository>,
    hearing_repository: Arc<dyn HearingRepository>,
    hall_status_repository: Arc<dyn HallStatusRepository>,
    live_status_engine: LiveStatusEngine<S>,
    advocate_engine: AdvocateEngine<S>,
    poll_interval: StdDuration,
    worker_id: Uuid,
}

impl<S> ExtractWorker<S>
where
    S: CourtSite + 'static,
{
    /// 创建新的提取工作器实例
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn JobQueue>,
        court_repository: Arc<dyn CourtRepository>,
        run_log_repository: Arc<dyn RunLogRepository>,
        hearing_repository: Arc<dyn HearingRepository>,
        hall_status_repository: Arc<dyn HallStatusRepository>,
        site: Arc<S>,
        poll_interval: StdDuration,
    ) -> Self {
        Self {
            queue,
            court_repository,
            run_log_repository,
            hearing_repository,
            hall_status_repository,
            live_status_engine: LiveStatusEngine::new(site.clone()),
            advocate_engine: AdvocateEngine::new(site),
            poll_interval,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行提取工作器
    pub async fn run(&self) {
        info!("Extract worker {} started", self.worker_id);

        loop {
            match self.process_next_job().await {
                Ok(processed) => {
                    if !processed {
                        sleep(self.poll_interval).await;
                    }
                }
                Err(e) => {
                    error!("Error processing job: {}", e);
                    sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn process_next_job(&self) -> Result<bool, WorkerError> {
        let job = self
            .queue
            .dequeue(self.worker_id)
            .await
            .map_err(|e| WorkerError::QueueError(e.to_string()))?;

        if let Some(job) = job {
            self.process_job(job).await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// 处理单个任务的完整生命周期
    ///
    /// 运行日志、持久化与重试决策都在这里收口；引擎失败不会
    /// 让工作器循环退出
    #[instrument(skip(self, job), fields(job_id = %job.id, job_type = %job.job_type))]
    pub async fn process_job(&self, job: ExtractionJob) -> Result<(), WorkerError> {
        info!("Processing extraction job");

        let court = self.court_repository.find_or_create(&TSHC).await?;
        let run_log = self.run_log_repository.create_running(court.id).await?;

        let (persisted, outcome) = self.execute(&job, court.id).await;

        match outcome {
            Ok(()) => {
                self.run_log_repository
                    .mark_completed(run_log.id, persisted)
                    .await?;
                self.queue
                    .complete(job.id)
                    .await
                    .map_err(|e| WorkerError::QueueError(e.to_string()))?;
                info!(records = persisted, "Extraction job completed");
                Ok(())
            }
            Err(e) => {
                // 部分持久化的进度留在日志里，记录本身是幂等的
                self.run_log_repository
                    .mark_failed(run_log.id, persisted, &e.to_string())
                    .await?;

                if job.can_retry() {
                    let delay = Duration::seconds(
                        RETRY_BACKOFF_BASE_SECS << (job.attempt_count - 1).max(0),
                    );
                    warn!(
                        attempt = job.attempt_count,
                        delay_secs = delay.num_seconds(),
                        "Extraction job failed, retrying: {}",
                        e
                    );
                    self.queue
                        .retry_in(job, delay)
                        .await
                        .map_err(|qe| WorkerError::QueueError(qe.to_string()))?;
                } else {
                    error!(
                        attempt = job.attempt_count,
                        "Extraction job failed permanently: {}",
                        e
                    );
                    self.queue
                        .fail(job.id)
                        .await
                        .map_err(|qe| WorkerError::QueueError(qe.to_string()))?;
                }
                Ok(())
            }
        }
    }

    /// 执行提取并持久化，返回已持久化数量与最终结果
    async fn execute(&self, job: &ExtractionJob, court_id: Uuid) -> (i32, Result<(), WorkerError>) {
        let mut persisted = 0;

        let result = match job.job_type {
            JobType::LiveStatus => {
                match self.live_status_engine.run().await {
                    Ok(statuses) => {
                        let mut failure = None;
                        for candidate in &statuses {
                            match self
                                .hall_status_repository
                                .upsert(court_id, candidate)
                                .await
                            {
                                Ok(_) => persisted += 1,
                                Err(e) => {
                                    failure = Some(WorkerError::from(e));
                                    break;
                                }
                            }
                        }
                        failure.map_or(Ok(()), Err)
                    }
                    Err(e) => Err(WorkerError::from(e)),
                }
            }
            JobType::AdvocateSearch => {
                let advocate_name = job.advocate_name();
                let today = Local::now().date_naive();
                match self.advocate_engine.run(&advocate_name, today).await {
                    Ok(extraction) => {
                        let mut failure = None;
                        for candidate in &extraction.hearings {
                            let payload = candidate.raw_payload(&advocate_name);
                            match self
                                .hearing_repository
                                .upsert(court_id, candidate, payload)
                                .await
                            {
                                Ok(_) => persisted += 1,
                                Err(e) => {
                                    failure = Some(WorkerError::from(e));
                                    break;
                                }
                            }
                        }
                        failure.map_or(Ok(()), Err)
                    }
                    Err(e) => Err(WorkerError::from(e)),
                }
            }
        };

        (persisted, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let delays: Vec<i64> = (1..=3)
            .map(|attempt: i32| RETRY_BACKOFF_BASE_SECS << (attempt - 1).max(0))
            .collect();
        assert_eq!(delays, vec![5, 10, 20]);
    }
}
