//! 用户表迁移
//!
//! 账号、角色、头像、配对需求 (needs) 以及认证材料文件名都放在 users 表中。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Surname).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Password).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(1)
                            .not_null()
                            .default("C"),
                    )
                    .col(
                        ColumnDef::new(Users::Picture)
                            .string_len(255)
                            .not_null()
                            .default("default.jpg"),
                    )
                    .col(ColumnDef::new(Users::Description).text().null())
                    .col(
                        ColumnDef::new(Users::Needs)
                            .string_len(1)
                            .not_null()
                            .default("D"),
                    )
                    .col(ColumnDef::new(Users::CarteId).string_len(255).null())
                    .col(
                        ColumnDef::new(Users::CertificatScolaire)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // email 唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 候选人查询按 needs 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_needs")
                    .table(Users::Table)
                    .col(Users::Needs)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_users_needs").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_users_email").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Surname,
    Email,
    Password,
    Role,
    Picture,
    Description,
    Needs,
    CarteId,
    CertificatScolaire,
    Verified,
    CreatedAt,
}
