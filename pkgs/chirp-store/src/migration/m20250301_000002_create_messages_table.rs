use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    SenderId,
    RecipientId,
    PayloadType,
    PayloadJson,
    SentAt,
    ReadAt,
    Archived,
    Muted,
    Blocked,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000002_create_messages_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::SenderId).string().not_null())
                    .col(ColumnDef::new(Messages::RecipientId).string().not_null())
                    .col(ColumnDef::new(Messages::PayloadType).string())
                    .col(ColumnDef::new(Messages::PayloadJson).string())
                    .col(ColumnDef::new(Messages::SentAt).big_integer().not_null())
                    .col(ColumnDef::new(Messages::ReadAt).big_integer())
                    .col(
                        ColumnDef::new(Messages::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Messages::Muted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Messages::Blocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        let indexes = [
            ("idx_messages_by_sender", vec![Messages::SenderId]),
            ("idx_messages_by_recipient", vec![Messages::RecipientId]),
            ("idx_messages_by_sent_at", vec![Messages::SentAt]),
            (
                "idx_messages_by_sender_and_recipient",
                vec![Messages::SenderId, Messages::RecipientId],
            ),
        ];

        for (name, columns) in indexes {
            let mut index = Index::create();
            index.if_not_exists().name(name).table(Messages::Table);
            for column in columns {
                index.col(column);
            }
            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}
