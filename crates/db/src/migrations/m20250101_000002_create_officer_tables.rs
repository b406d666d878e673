//! Create officer and pending officer tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Officer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Officer::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Officer::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(Officer::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Officer::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Officer::Department).string_len(128).not_null())
                    .col(ColumnDef::new(Officer::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Officer::CertificateUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Officer::ApprovedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Officer::CreatedAt)
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
                    .name("idx_officer_email")
                    .table(Officer::Table)
                    .col(Officer::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PendingOfficer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingOfficer::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PendingOfficer::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(PendingOfficer::Email).string_len(256).not_null())
                    .col(
                        ColumnDef::new(PendingOfficer::PasswordHash)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingOfficer::Department).string_len(128).not_null())
                    .col(ColumnDef::new(PendingOfficer::CertificateUrl).string_len(1024))
                    .col(
                        ColumnDef::new(PendingOfficer::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PendingOfficer::CreatedAt)
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
                    .name("idx_pending_officer_email")
                    .table(PendingOfficer::Table)
                    .col(PendingOfficer::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingOfficer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Officer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Officer {
    Table,
    Id,
    FullName,
    Email,
    PasswordHash,
    Department,
    Role,
    CertificateUrl,
    ApprovedAt,
    CreatedAt,
}

#[derive(Iden)]
enum PendingOfficer {
    Table,
    Id,
    FullName,
    Email,
    PasswordHash,
    Department,
    CertificateUrl,
    Approved,
    CreatedAt,
}
