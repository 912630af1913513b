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

use axum::Extension;
use causelistrs::config::settings::Settings;
use causelistrs::domain::repositories::court_repository::CourtRepository;
use causelistrs::domain::repositories::hall_status_repository::HallStatusRepository;
use causelistrs::domain::repositories::hearing_repository::HearingRepository;
use causelistrs::domain::repositories::run_log_repository::RunLogRepository;
use causelistrs::extract::navigator::ChromiumSite;
use causelistrs::infrastructure::database::connection;
use causelistrs::infrastructure::repositories::court_repo_impl::CourtRepositoryImpl;
use causelistrs::infrastructure::repositories::hall_status_repo_impl::HallStatusRepositoryImpl;
use causelistrs::infrastructure::repositories::hearing_repo_impl::HearingRepositoryImpl;
use causelistrs::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use causelistrs::infrastructure::repositories::run_log_repo_impl::RunLogRepositoryImpl;
use causelistrs::infrastructure::repositories::schedule_repo_impl::ScheduleRepositoryImpl;
use causelistrs::presentation::routes::routes;
use causelistrs::queue::job_queue::{JobQueue, PostgresJobQueue};
use causelistrs::queue::scheduler::ExtractionScheduler;
use causelistrs::utils::telemetry;
use causelistrs::workers::manager::WorkerManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting causelistrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories and queue
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let schedule_repo = Arc::new(ScheduleRepositoryImpl::new(db.clone()));
    let court_repo: Arc<dyn CourtRepository> = Arc::new(CourtRepositoryImpl::new(db.clone()));
    let run_log_repo: Arc<dyn RunLogRepository> = Arc::new(RunLogRepositoryImpl::new(db.clone()));
    let hearing_repo: Arc<dyn HearingRepository> = Arc::new(HearingRepositoryImpl::new(db.clone()));
    let hall_status_repo: Arc<dyn HallStatusRepository> =
        Arc::new(HallStatusRepositoryImpl::new(db.clone()));

    let queue: Arc<dyn JobQueue> = Arc::new(PostgresJobQueue::new(job_repo.clone()));

    // 5. Initialize headless browser site access
    let site = Arc::new(ChromiumSite::new(settings.site.clone()));

    // 6. Start scheduler
    let scheduler = Arc::new(ExtractionScheduler::new(
        job_repo.clone(),
        schedule_repo.clone(),
        queue.clone(),
        settings.schedule.clone(),
        settings.worker.clone(),
    ));
    // 调度条目核对失败不阻塞启动，下一次部署或重启会补上
    if let Err(e) = scheduler.ensure_daily_schedule().await {
        warn!("Failed to reconcile daily schedule, continuing: {}", e);
    }
    let _scheduler_handle = scheduler.start();
    info!("Scheduler started");

    // 7. Start workers
    let mut worker_manager = WorkerManager::new(
        queue.clone(),
        court_repo,
        run_log_repo.clone(),
        hearing_repo.clone(),
        hall_status_repo.clone(),
        site,
        Duration::from_secs(settings.worker.poll_interval_secs),
    );
    worker_manager.start_workers(settings.worker.concurrency).await;

    // 8. Start HTTP server
    let app = routes()
        .layer(Extension(queue.clone()))
        .layer(Extension(run_log_repo))
        .layer(Extension(hearing_repo))
        .layer(Extension(hall_status_repo))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = worker_manager.wait_for_shutdown() => {}
    }

    Ok(())
}
