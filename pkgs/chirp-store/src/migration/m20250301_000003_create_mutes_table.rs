use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Mutes {
    Table,
    Id,
    UserId,
    MutedUserId,
    Muted,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000003_create_mutes_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mutes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mutes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mutes::UserId).string().not_null())
                    .col(ColumnDef::new(Mutes::MutedUserId).string().not_null())
                    .col(
                        ColumnDef::new(Mutes::Muted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_mutes_by_user")
                    .table(Mutes::Table)
                    .col(Mutes::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mutes::Table).to_owned())
            .await
    }
}
