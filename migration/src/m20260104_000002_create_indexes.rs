use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index for job acquisition: status + scheduled_at + created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status_scheduled_at_created_at")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .col(Jobs::ScheduledAt)
                    .col(Jobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Natural key for hearings: one row per (court, case, hearing date)
        manager
            .create_index(
                Index::create()
                    .name("uq_hearings_court_case_date")
                    .table(Hearings::Table)
                    .col(Hearings::CourtId)
                    .col(Hearings::CaseNumber)
                    .col(Hearings::HearingDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Natural key for hall statuses: one row per (hall, status date)
        manager
            .create_index(
                Index::create()
                    .name("uq_court_hall_statuses_hall_date")
                    .table(CourtHallStatuses::Table)
                    .col(CourtHallStatuses::CourtHallNo)
                    .col(CourtHallStatuses::StatusDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Run log listing is always newest-first per court
        manager
            .create_index(
                Index::create()
                    .name("idx_run_logs_court_started_at")
                    .table(RunLogs::Table)
                    .col(RunLogs::CourtId)
                    .col(RunLogs::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_run_logs_court_started_at")
                    .table(RunLogs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uq_court_hall_statuses_hall_date")
                    .table(CourtHallStatuses::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uq_hearings_court_case_date")
                    .table(Hearings::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_jobs_status_scheduled_at_created_at")
                    .table(Jobs::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Status,
    ScheduledAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Hearings {
    Table,
    CourtId,
    CaseNumber,
    HearingDate,
}

#[derive(DeriveIden)]
enum CourtHallStatuses {
    Table,
    CourtHallNo,
    StatusDate,
}

#[derive(DeriveIden)]
enum RunLogs {
    Table,
    CourtId,
    StartedAt,
}
