//! Migration: Create generatedcontent table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GeneratedContent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedContent::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GeneratedContent::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(GeneratedContent::ContentType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneratedContent::Title).string_len(255).null())
                    .col(ColumnDef::new(GeneratedContent::Text).text().null())
                    .col(ColumnDef::new(GeneratedContent::ImagePath).text().null())
                    .col(ColumnDef::new(GeneratedContent::Metadata).json_binary().null())
                    .col(
                        ColumnDef::new(GeneratedContent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_generatedcontent_user_id")
                            .from(GeneratedContent::Table, GeneratedContent::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_generatedcontent_user_id")
                    .table(GeneratedContent::Table)
                    .col(GeneratedContent::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedContent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GeneratedContent {
    #[iden = "generatedcontent"]
    Table,
    Id,
    UserId,
    ContentType,
    Title,
    Text,
    ImagePath,
    Metadata,
    CreatedAt,
}
