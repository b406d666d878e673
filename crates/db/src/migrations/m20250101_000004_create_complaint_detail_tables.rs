//! Create complaint reply, note and status history tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComplaintReply::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintReply::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintReply::ComplaintId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ComplaintReply::Author).string_len(256).not_null())
                    .col(ColumnDef::new(ComplaintReply::AuthorRole).string_len(32).not_null())
                    .col(ColumnDef::new(ComplaintReply::Message).text().not_null())
                    .col(
                        ColumnDef::new(ComplaintReply::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_reply_complaint_id")
                    .table(ComplaintReply::Table)
                    .col(ComplaintReply::ComplaintId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ComplaintNote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintNote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintNote::ComplaintId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ComplaintNote::Author).string_len(256).not_null())
                    .col(ColumnDef::new(ComplaintNote::Note).text().not_null())
                    .col(
                        ColumnDef::new(ComplaintNote::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ComplaintNote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_note_complaint_id")
                    .table(ComplaintNote::Table)
                    .col(ComplaintNote::ComplaintId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ComplaintStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintStatusHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintStatusHistory::ComplaintId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComplaintStatusHistory::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ComplaintStatusHistory::Note).text().not_null())
                    .col(
                        ColumnDef::new(ComplaintStatusHistory::ChangedBy)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComplaintStatusHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_status_history_complaint_id")
                    .table(ComplaintStatusHistory::Table)
                    .col(ComplaintStatusHistory::ComplaintId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComplaintStatusHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ComplaintNote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ComplaintReply::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ComplaintReply {
    Table,
    Id,
    ComplaintId,
    Author,
    AuthorRole,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum ComplaintNote {
    Table,
    Id,
    ComplaintId,
    Author,
    Note,
    IsPrivate,
    CreatedAt,
}

#[derive(Iden)]
enum ComplaintStatusHistory {
    Table,
    Id,
    ComplaintId,
    Status,
    Note,
    ChangedBy,
    CreatedAt,
}
