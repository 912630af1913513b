// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::court_repository::CourtRepository;
use crate::domain::repositories::hall_status_repository::HallStatusRepository;
use crate::domain::repositories::hearing_repository::HearingRepository;
use crate::domain::repositories::run_log_repository::RunLogRepository;
use crate::extract::navigator::CourtSite;
use crate::queue::job_queue::JobQueue;
use crate::workers::extract_worker::ExtractWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 创建并监护提取工作器。站点对并发访问敏感，默认只起一个。
pub struct WorkerManager<S>
where
    S: CourtSite + 'static,
{
    queue: Arc<dyn JobQueue>,
    court_repository: Arc<dyn CourtRepository>,
    run_log_repository: Arc<dyn RunLogRepository>,
    hearing_repository: Arc<dyn HearingRepository>,
    hall_status_repository: Arc<dyn HallStatusRepository>,
    site: Arc<S>,
    poll_interval: Duration,
    handles: Vec<JoinHandle<()>>,
}

impl<S> WorkerManager<S>
where
    S: CourtSite + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        queue: Arc<dyn JobQueue>,
        court_repository: Arc<dyn CourtRepository>,
        run_log_repository: Arc<dyn RunLogRepository>,
        hearing_repository: Arc<dyn HearingRepository>,
        hall_status_repository: Arc<dyn HallStatusRepository>,
        site: Arc<S>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            court_repository,
            run_log_repository,
            hearing_repository,
            hall_status_repository,
            site,
            poll_interval,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = ExtractWorker::new(
                self.queue.clone(),
                self.court_repository.clone(),
                self.run_log_repository.clone(),
                self.hearing_repository.clone(),
                self.hall_status_repository.clone(),
                self.site.clone(),
                self.poll_interval,
            );

            let handle = tokio::spawn(async move {
                worker.run().await;
            });
            self.handles.push(handle);
        }
        info!("Started {} extract workers", count);
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}
