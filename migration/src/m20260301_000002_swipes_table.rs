//! 滑动记录表迁移
//!
//! 每一行是一个用户对另一个用户的 like / pass。
//! (user_id, target_id) 唯一，重复滑动只更新 liked。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Swipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Swipes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Swipes::UserId).integer().not_null())
                    .col(ColumnDef::new(Swipes::TargetId).integer().not_null())
                    .col(ColumnDef::new(Swipes::Liked).boolean().not_null())
                    .col(
                        ColumnDef::new(Swipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_swipes_user_target")
                    .table(Swipes::Table)
                    .col(Swipes::UserId)
                    .col(Swipes::TargetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 反向查询（谁 like 了我）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_swipes_target")
                    .table(Swipes::Table)
                    .col(Swipes::TargetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_swipes_target").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_swipes_user_target").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Swipes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Swipes {
    Table,
    Id,
    UserId,
    TargetId,
    Liked,
    CreatedAt,
}
