use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create courts table (subject registry)
        manager
            .create_table(
                Table::create()
                    .table(Courts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courts::Name).string().not_null())
                    .col(
                        ColumnDef::new(Courts::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courts::Url).string().not_null())
                    .col(ColumnDef::new(Courts::Jurisdiction).string())
                    .col(
                        ColumnDef::new(Courts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create jobs table (durable extraction queue)
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::JobType).string().not_null())
                    .col(ColumnDef::new(Jobs::Status).string().not_null())
                    .col(
                        ColumnDef::new(Jobs::IdempotencyKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Jobs::Params).json().not_null())
                    .col(
                        ColumnDef::new(Jobs::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Jobs::MaxAttempts)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(ColumnDef::new(Jobs::ScheduledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Jobs::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Jobs::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Jobs::LockToken).uuid())
                    .col(ColumnDef::new(Jobs::LockExpiresAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Create schedules table (repeating entries)
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::JobType).string().not_null())
                    .col(ColumnDef::new(Schedules::CronPattern).string().not_null())
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create run_logs table (audit record per execution attempt)
        manager
            .create_table(
                Table::create()
                    .table(RunLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RunLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RunLogs::CourtId).uuid().not_null())
                    .col(ColumnDef::new(RunLogs::Status).string().not_null())
                    .col(
                        ColumnDef::new(RunLogs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(RunLogs::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(RunLogs::RecordsExtracted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(RunLogs::ErrorMessage).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_run_logs_court")
                            .from(RunLogs::Table, RunLogs::CourtId)
                            .to(Courts::Table, Courts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create hearings table
        manager
            .create_table(
                Table::create()
                    .table(Hearings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hearings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Hearings::CourtId).uuid().not_null())
                    .col(ColumnDef::new(Hearings::SlNo).integer())
                    .col(ColumnDef::new(Hearings::CaseNumber).string().not_null())
                    .col(ColumnDef::new(Hearings::HearingDate).date().not_null())
                    .col(ColumnDef::new(Hearings::HearingTime).string())
                    .col(ColumnDef::new(Hearings::HearingMode).string())
                    .col(ColumnDef::new(Hearings::CourtNumber).string())
                    .col(ColumnDef::new(Hearings::Judge).string())
                    .col(ColumnDef::new(Hearings::ListType).string())
                    .col(ColumnDef::new(Hearings::Category).string())
                    .col(ColumnDef::new(Hearings::PetitionerName).string())
                    .col(ColumnDef::new(Hearings::RespondentName).string())
                    .col(ColumnDef::new(Hearings::PetitionerAdvocate).string())
                    .col(ColumnDef::new(Hearings::RespondentAdvocate).string())
                    .col(ColumnDef::new(Hearings::District).string())
                    .col(ColumnDef::new(Hearings::RawPayload).json().not_null())
                    .col(
                        ColumnDef::new(Hearings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Hearings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hearings_court")
                            .from(Hearings::Table, Hearings::CourtId)
                            .to(Courts::Table, Courts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create interim_applications table (children, replaced wholesale)
        manager
            .create_table(
                Table::create()
                    .table(InterimApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InterimApplications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InterimApplications::HearingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterimApplications::Number)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interim_applications_hearing")
                            .from(InterimApplications::Table, InterimApplications::HearingId)
                            .to(Hearings::Table, Hearings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create court_hall_statuses table
        manager
            .create_table(
                Table::create()
                    .table(CourtHallStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourtHallStatuses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourtHallStatuses::CourtId).uuid().not_null())
                    .col(ColumnDef::new(CourtHallStatuses::SlNo).integer())
                    .col(
                        ColumnDef::new(CourtHallStatuses::CourtHallNo)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourtHallStatuses::BenchName).string())
                    .col(ColumnDef::new(CourtHallStatuses::ListType).string())
                    .col(ColumnDef::new(CourtHallStatuses::Status).string().not_null())
                    .col(ColumnDef::new(CourtHallStatuses::UploadedAt).timestamp())
                    .col(ColumnDef::new(CourtHallStatuses::DocumentUrl).string())
                    .col(ColumnDef::new(CourtHallStatuses::StatusDate).date().not_null())
                    .col(
                        ColumnDef::new(CourtHallStatuses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CourtHallStatuses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_court_hall_statuses_court")
                            .from(CourtHallStatuses::Table, CourtHallStatuses::CourtId)
                            .to(Courts::Table, Courts::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourtHallStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InterimApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hearings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RunLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Courts {
    Table,
    Id,
    Name,
    Code,
    Url,
    Jurisdiction,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    JobType,
    Status,
    IdempotencyKey,
    Params,
    AttemptCount,
    MaxAttempts,
    ScheduledAt,
    CreatedAt,
    StartedAt,
    CompletedAt,
    UpdatedAt,
    LockToken,
    LockExpiresAt,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
    JobType,
    CronPattern,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RunLogs {
    Table,
    Id,
    CourtId,
    Status,
    StartedAt,
    CompletedAt,
    RecordsExtracted,
    ErrorMessage,
}

#[derive(DeriveIden)]
enum Hearings {
    Table,
    Id,
    CourtId,
    SlNo,
    CaseNumber,
    HearingDate,
    HearingTime,
    HearingMode,
    CourtNumber,
    Judge,
    ListType,
    Category,
    PetitionerName,
    RespondentName,
    PetitionerAdvocate,
    RespondentAdvocate,
    District,
    RawPayload,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InterimApplications {
    Table,
    Id,
    HearingId,
    Number,
}

#[derive(DeriveIden)]
enum CourtHallStatuses {
    Table,
    Id,
    CourtId,
    SlNo,
    CourtHallNo,
    BenchName,
    ListType,
    Status,
    UploadedAt,
    DocumentUrl,
    StatusDate,
    CreatedAt,
    UpdatedAt,
}
