use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Follows {
    Table,
    Id,
    FollowerId,
    FollowingId,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250310_000003_create_follows_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Follows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Follows::FollowerId).string().not_null())
                    .col(ColumnDef::new(Follows::FollowingId).string().not_null())
                    .col(ColumnDef::new(Follows::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_follows_by_both")
                    .table(Follows::Table)
                    .col(Follows::FollowerId)
                    .col(Follows::FollowingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_follows_by_follower", Follows::FollowerId),
            ("idx_follows_by_following", Follows::FollowingId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Follows::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await
    }
}
