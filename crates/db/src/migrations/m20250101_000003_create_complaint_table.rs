//! Create complaint table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Complaint::Id).string_len(32).not_null().primary_key())
                    .col(
                        ColumnDef::new(Complaint::ReferenceNumber)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Complaint::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Complaint::Description).text().not_null())
                    .col(ColumnDef::new(Complaint::Category).string_len(128).not_null())
                    .col(ColumnDef::new(Complaint::Location).string_len(256))
                    .col(ColumnDef::new(Complaint::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Complaint::Priority).string_len(16).not_null())
                    .col(ColumnDef::new(Complaint::SubmittedBy).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Complaint::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Complaint::AssignedTo).string_len(256))
                    .col(ColumnDef::new(Complaint::AssignedDepartment).string_len(128))
                    .col(
                        ColumnDef::new(Complaint::Escalated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Complaint::EscalationLevel)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Complaint::EscalationReason).text())
                    .col(ColumnDef::new(Complaint::EscalatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Complaint::Attachments).json_binary().not_null())
                    .col(
                        ColumnDef::new(Complaint::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Complaint::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Complaint::LastUpdatedBy).string_len(256))
                    .to_owned(),
            )
            .await?;

        // Unique: a collision on the random reference suffix fails loudly
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_reference_number")
                    .table(Complaint::Table)
                    .col(Complaint::ReferenceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: submitter (citizen complaint listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_submitted_by")
                    .table(Complaint::Table)
                    .col(Complaint::SubmittedBy)
                    .to_owned(),
            )
            .await?;

        // Index: assignee (officer worklists and load counting)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_assigned_to")
                    .table(Complaint::Table)
                    .col(Complaint::AssignedTo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_status")
                    .table(Complaint::Table)
                    .col(Complaint::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_created_at")
                    .table(Complaint::Table)
                    .col(Complaint::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Complaint {
    Table,
    Id,
    ReferenceNumber,
    Title,
    Description,
    Category,
    Location,
    Status,
    Priority,
    SubmittedBy,
    IsAnonymous,
    AssignedTo,
    AssignedDepartment,
    Escalated,
    EscalationLevel,
    EscalationReason,
    EscalatedAt,
    Attachments,
    CreatedAt,
    LastUpdated,
    LastUpdatedBy,
}
