// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Worker流水线集成测试
//!
//! 用内存仓库与固定页面快照驱动完整的任务处理路径：
//! 提取、持久化、运行日志与重试决策。

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use url::Url;
use uuid::Uuid;

use causelistrs::domain::models::court::{Court, CourtSeed};
use causelistrs::domain::models::hall_status::{CourtHallStatus, HallStatusCandidate};
use causelistrs::domain::models::hearing::{HearingCandidate, HearingRecord};
use causelistrs::domain::models::job::ExtractionJob;
use causelistrs::domain::models::run_log::{RunLog, RunStatus};
use causelistrs::domain::repositories::court_repository::CourtRepository;
use causelistrs::domain::repositories::hall_status_repository::HallStatusRepository;
use causelistrs::domain::repositories::hearing_repository::{HearingQueryParams, HearingRepository};
use causelistrs::domain::repositories::job_repository::RepositoryError;
use causelistrs::domain::repositories::run_log_repository::RunLogRepository;
use causelistrs::extract::navigator::{CourtSite, PageSnapshot};
use causelistrs::extract::ExtractError;
use causelistrs::queue::job_queue::{JobQueue, QueueError};
use causelistrs::workers::extract_worker::ExtractWorker;

const STATUS_PAGE: &str = r#"
    <html><body>
      <h2>CAUSE LIST UPLOADING STATUS DATED: 23-02-2026</h2>
      <table>
        <tr><th>Sl</th><th>Court Hall</th><th>Bench</th><th>List</th><th>Status</th><th>Time</th><th>View</th></tr>
        <tr><td>1</td><td>1</td><td>CJ BENCH</td><td>DAILY LIST</td><td>UPLOADED</td>
            <td>23-02-2026 09:15</td><td><a href="/pdfs/court1.pdf">View</a></td></tr>
        <tr><td>2</td><td>14</td><td>JUSTICE X</td><td>DAILY LIST</td><td>JUDGE IS ON LEAVE</td>
            <td></td><td><a href="/pdfs/court14.pdf">View</a></td></tr>
      </table>
    </body></html>
"#;

const RESULTS_PAGE: &str = r#"
    <html><body>
      <p>HIGH COURT FOR THE STATE OF TELANGANA DATED: 23-02-2026</p>
      <p>TOTAL CASES FOR D NARENDAR NAIK = 2</p>
      <p>DAILY LIST</p>
      <h3>COURT NO. 14 / THE HON'BLE SRI JUSTICE X / HYBRID MODE
          To be heard on the 23rd day of February 2026</h3>
      <table>
        <tr><td>1</td><td>WP 123/2026</td><td>A vs B</td><td>D NARENDAR NAIK</td><td>GP FOR HOME</td></tr>
        <tr><td>2</td><td>WP 200/2026</td><td>C vs D</td><td>SOMEONE ELSE</td><td>OTHER GP</td></tr>
        <tr><td>3</td><td>WA 9/2026</td><td>E vs F</td><td>SRI COUNSEL</td><td>D NARENDAR NAIK</td></tr>
      </table>
    </body></html>
"#;

/// 返回固定页面快照的站点桩，可配置为导航失败
struct FakeCourtSite {
    fail: bool,
}

#[async_trait]
impl CourtSite for FakeCourtSite {
    async fn status_page(&self) -> Result<PageSnapshot, ExtractError> {
        if self.fail {
            return Err(ExtractError::Navigation("connection refused".to_string()));
        }
        Ok(PageSnapshot {
            url: Url::parse("https://causelist.tshc.gov.in/showCauselistUploadStatus").unwrap(),
            html: STATUS_PAGE.to_string(),
        })
    }

    async fn advocate_results(&self, _advocate_name: &str) -> Result<PageSnapshot, ExtractError> {
        if self.fail {
            return Err(ExtractError::Navigation("connection refused".to_string()));
        }
        Ok(PageSnapshot {
            url: Url::parse("https://causelist.tshc.gov.in/advocateWiseView").unwrap(),
            html: RESULTS_PAGE.to_string(),
        })
    }
}

/// 记录终态调用的队列桩
#[derive(Default)]
struct RecordingQueue {
    completed: Mutex<Vec<Uuid>>,
    failed: Mutex<Vec<Uuid>>,
    retries: Mutex<Vec<(Uuid, i64)>>,
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn enqueue(&self, job: ExtractionJob) -> Result<ExtractionJob, QueueError> {
        Ok(job)
    }

    async fn dequeue(&self, _worker_id: Uuid) -> Result<Option<ExtractionJob>, QueueError> {
        Ok(None)
    }

    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.completed.lock().unwrap().push(job_id);
        Ok(())
    }

    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.failed.lock().unwrap().push(job_id);
        Ok(())
    }

    async fn retry_in(
        &self,
        job: ExtractionJob,
        delay: chrono::Duration,
    ) -> Result<ExtractionJob, QueueError> {
        self.retries
            .lock()
            .unwrap()
            .push((job.id, delay.num_seconds()));
        Ok(job)
    }
}

#[derive(Default)]
struct InMemoryCourtRepo {
    court: Mutex<Option<Court>>,
}

#[async_trait]
impl CourtRepository for InMemoryCourtRepo {
    async fn find_or_create(&self, seed: &CourtSeed) -> Result<Court, RepositoryError> {
        let mut slot = self.court.lock().unwrap();
        if let Some(court) = slot.as_ref() {
            return Ok(court.clone());
        }
        let court = Court {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            code: seed.code.to_string(),
            url: seed.url.to_string(),
            jurisdiction: Some(seed.jurisdiction.to_string()),
            created_at: Utc::now().into(),
        };
        *slot = Some(court.clone());
        Ok(court)
    }
}

#[derive(Default)]
struct InMemoryRunLogRepo {
    logs: Mutex<Vec<RunLog>>,
}

#[async_trait]
impl RunLogRepository for InMemoryRunLogRepo {
    async fn create_running(&self, court_id: Uuid) -> Result<RunLog, RepositoryError> {
        let log = RunLog {
            id: Uuid::new_v4(),
            court_id,
            status: RunStatus::Running,
            started_at: Utc::now().into(),
            completed_at: None,
            records_extracted: 0,
            error_message: None,
        };
        self.logs.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn mark_completed(&self, id: Uuid, records: i32) -> Result<(), RepositoryError> {
        let mut logs = self.logs.lock().unwrap();
        let log = logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepositoryError::NotFound)?;
        log.status = RunStatus::Completed;
        log.completed_at = Some(Utc::now().into());
        log.records_extracted = records;
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        records: i32,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        let mut logs = self.logs.lock().unwrap();
        let log = logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepositoryError::NotFound)?;
        log.status = RunStatus::Failed;
        log.completed_at = Some(Utc::now().into());
        log.records_extracted = records;
        log.error_message = Some(error_message.to_string());
        Ok(())
    }

    async fn list_recent(
        &self,
        court_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<RunLog>, RepositoryError> {
        let logs = self.logs.lock().unwrap();
        Ok(logs
            .iter()
            .rev()
            .filter(|l| court_id.is_none_or(|id| l.court_id == id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct InMemoryHearingRepo {
    records: Mutex<Vec<HearingRecord>>,
}

#[async_trait]
impl HearingRepository for InMemoryHearingRepo {
    async fn upsert(
        &self,
        court_id: Uuid,
        candidate: &HearingCandidate,
        raw_payload: serde_json::Value,
    ) -> Result<HearingRecord, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter_mut().find(|r| {
            r.court_id == court_id
                && r.case_number == candidate.case_number
                && r.hearing_date == candidate.hearing_date
        }) {
            existing.petitioner_advocate = candidate.petitioner_advocate.clone();
            existing.respondent_advocate = candidate.respondent_advocate.clone();
            existing.list_type = candidate.list_type.clone();
            existing.category = candidate.category.clone();
            existing.district = candidate.district.clone();
            existing.raw_payload = raw_payload;
            existing.updated_at = Utc::now().into();
            existing.interim_applications = candidate.interim_applications.clone();
            return Ok(existing.clone());
        }
        let record = HearingRecord {
            id: Uuid::new_v4(),
            court_id,
            sl_no: candidate.sl_no,
            case_number: candidate.case_number.clone(),
            hearing_date: candidate.hearing_date,
            hearing_time: candidate.hearing_time.clone(),
            hearing_mode: candidate.hearing_mode.clone(),
            court_number: candidate.court_number.clone(),
            judge: candidate.judge.clone(),
            list_type: candidate.list_type.clone(),
            category: candidate.category.clone(),
            petitioner_name: candidate.petitioner_name.clone(),
            respondent_name: candidate.respondent_name.clone(),
            petitioner_advocate: candidate.petitioner_advocate.clone(),
            respondent_advocate: candidate.respondent_advocate.clone(),
            district: candidate.district.clone(),
            raw_payload,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            interim_applications: candidate.interim_applications.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn query(
        &self,
        params: HearingQueryParams,
    ) -> Result<(Vec<HearingRecord>, u64), RepositoryError> {
        let records = self.records.lock().unwrap();
        let matched: Vec<HearingRecord> = records
            .iter()
            .filter(|r| params.court_id.is_none_or(|id| r.court_id == id))
            .cloned()
            .collect();
        let total = matched.len() as u64;
        Ok((matched, total))
    }
}

#[derive(Default)]
struct InMemoryHallStatusRepo {
    records: Mutex<Vec<CourtHallStatus>>,
}

#[async_trait]
impl HallStatusRepository for InMemoryHallStatusRepo {
    async fn upsert(
        &self,
        court_id: Uuid,
        candidate: &HallStatusCandidate,
    ) -> Result<CourtHallStatus, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter_mut().find(|r| {
            r.court_hall_no == candidate.court_hall_no && r.status_date == candidate.status_date
        }) {
            existing.sl_no = candidate.sl_no;
            existing.bench_name = candidate.bench_name.clone();
            existing.list_type = candidate.list_type.clone();
            existing.status = candidate.status.clone();
            existing.uploaded_at = candidate.uploaded_at;
            existing.document_url = candidate.document_url.clone();
            existing.updated_at = Utc::now().into();
            return Ok(existing.clone());
        }
        let record = CourtHallStatus {
            id: Uuid::new_v4(),
            court_id,
            sl_no: candidate.sl_no,
            court_hall_no: candidate.court_hall_no.clone(),
            bench_name: candidate.bench_name.clone(),
            list_type: candidate.list_type.clone(),
            status: candidate.status.clone(),
            uploaded_at: candidate.uploaded_at,
            document_url: candidate.document_url.clone(),
            status_date: candidate.status_date,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        status_date: Option<chrono::NaiveDate>,
        limit: u64,
    ) -> Result<Vec<CourtHallStatus>, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| status_date.is_none_or(|d| r.status_date == d))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

struct Harness {
    queue: Arc<RecordingQueue>,
    run_log_repo: Arc<InMemoryRunLogRepo>,
    hearing_repo: Arc<InMemoryHearingRepo>,
    hall_status_repo: Arc<InMemoryHallStatusRepo>,
    worker: ExtractWorker<FakeCourtSite>,
}

fn build_harness(fail_navigation: bool) -> Harness {
    let queue = Arc::new(RecordingQueue::default());
    let court_repo = Arc::new(InMemoryCourtRepo::default());
    let run_log_repo = Arc::new(InMemoryRunLogRepo::default());
    let hearing_repo = Arc::new(InMemoryHearingRepo::default());
    let hall_status_repo = Arc::new(InMemoryHallStatusRepo::default());
    let site = Arc::new(FakeCourtSite {
        fail: fail_navigation,
    });

    let worker = ExtractWorker::new(
        queue.clone() as Arc<dyn JobQueue>,
        court_repo as Arc<dyn CourtRepository>,
        run_log_repo.clone() as Arc<dyn RunLogRepository>,
        hearing_repo.clone() as Arc<dyn HearingRepository>,
        hall_status_repo.clone() as Arc<dyn HallStatusRepository>,
        site,
        StdDuration::from_millis(10),
    );

    Harness {
        queue,
        run_log_repo,
        hearing_repo,
        hall_status_repo,
        worker,
    }
}

/// 模拟队列领取后的任务状态：尝试次数已递增
fn acquired(mut job: ExtractionJob, attempt: i32) -> ExtractionJob {
    job.attempt_count = attempt;
    job
}

#[tokio::test]
async fn live_status_run_completes_and_persists() {
    let harness = build_harness(false);
    let job = acquired(ExtractionJob::live_status(), 1);
    let job_id = job.id;

    harness.worker.process_job(job).await.unwrap();

    let statuses = harness.hall_status_repo.list(None, 100).await.unwrap();
    assert_eq!(statuses.len(), 2);
    let on_leave = statuses
        .iter()
        .find(|s| s.court_hall_no == "14")
        .expect("court hall 14 persisted");
    assert_eq!(on_leave.document_url, None);

    let logs = harness.run_log_repo.list_recent(None, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, RunStatus::Completed);
    assert_eq!(logs[0].records_extracted, 2);
    assert!(logs[0].completed_at.is_some());

    assert_eq!(*harness.queue.completed.lock().unwrap(), vec![job_id]);
    assert!(harness.queue.failed.lock().unwrap().is_empty());
    assert!(harness.queue.retries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_live_status_run_is_idempotent() {
    let harness = build_harness(false);

    let day = chrono::NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
    harness
        .worker
        .process_job(acquired(ExtractionJob::live_status_daily(day), 1))
        .await
        .unwrap();
    harness
        .worker
        .process_job(acquired(ExtractionJob::live_status_daily(day), 1))
        .await
        .unwrap();

    // 第二次运行原地更新，不产生新行
    let statuses = harness.hall_status_repo.list(None, 100).await.unwrap();
    assert_eq!(statuses.len(), 2);

    // 但每次运行各有一条审计日志
    let logs = harness.run_log_repo.list_recent(None, 10).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.status == RunStatus::Completed));
}

#[tokio::test]
async fn navigation_failure_schedules_first_retry() {
    let harness = build_harness(true);
    let job = acquired(ExtractionJob::live_status(), 1);
    let job_id = job.id;

    harness.worker.process_job(job).await.unwrap();

    let logs = harness.run_log_repo.list_recent(None, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, RunStatus::Failed);
    assert_eq!(logs[0].records_extracted, 0);
    assert!(logs[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("connection refused"));

    assert_eq!(*harness.queue.retries.lock().unwrap(), vec![(job_id, 5)]);
    assert!(harness.queue.failed.lock().unwrap().is_empty());
    assert!(harness.queue.completed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn backoff_doubles_on_second_failure() {
    let harness = build_harness(true);
    let job = acquired(ExtractionJob::live_status(), 2);
    let job_id = job.id;

    harness.worker.process_job(job).await.unwrap();

    assert_eq!(*harness.queue.retries.lock().unwrap(), vec![(job_id, 10)]);
}

#[tokio::test]
async fn exhausted_attempts_fail_permanently() {
    let harness = build_harness(true);
    let job = acquired(ExtractionJob::live_status(), 3);
    let job_id = job.id;

    harness.worker.process_job(job).await.unwrap();

    assert!(harness.queue.retries.lock().unwrap().is_empty());
    assert_eq!(*harness.queue.failed.lock().unwrap(), vec![job_id]);

    let logs = harness.run_log_repo.list_recent(None, 10).await.unwrap();
    assert_eq!(logs[0].status, RunStatus::Failed);
}

#[tokio::test]
async fn advocate_run_filters_and_persists_hearings() {
    let harness = build_harness(false);
    let job = acquired(ExtractionJob::advocate_search("D NARENDAR NAIK"), 1);

    harness.worker.process_job(job).await.unwrap();

    let (records, total) = harness
        .hearing_repo
        .query(HearingQueryParams::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(records.iter().all(|r| r.case_number != "WP 200/2026"));

    let first = records
        .iter()
        .find(|r| r.case_number == "WP 123/2026")
        .expect("WP 123/2026 persisted");
    assert_eq!(first.petitioner_advocate.as_deref(), Some("D NARENDAR NAIK"));
    assert_eq!(first.court_number.as_deref(), Some("14"));
    assert_eq!(
        first.hearing_date,
        chrono::NaiveDate::from_ymd_opt(2026, 2, 23).unwrap()
    );
    assert_eq!(
        first.raw_payload.get("advocate_name").and_then(|v| v.as_str()),
        Some("D NARENDAR NAIK")
    );

    let logs = harness.run_log_repo.list_recent(None, 10).await.unwrap();
    assert_eq!(logs[0].records_extracted, 2);
}
