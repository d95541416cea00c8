use sea_orm_migration::prelude::*;

const CREATED_AT_INDEX: &str = "idx_posts_created_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Content,
    CreatedAt,
}

/// `posts`: serial id, text columns, and a creation time defaulted by the database.
fn create_posts_table() -> TableCreateStatement {
    Table::create()
        .table(Posts::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Posts::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Posts::Title).text().not_null())
        .col(ColumnDef::new(Posts::Content).text().not_null())
        .col(
            ColumnDef::new(Posts::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_created_at_index() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name(CREATED_AT_INDEX)
        .table(Posts::Table)
        .col(Posts::CreatedAt)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_posts_table()).await?;
        manager.create_index(create_created_at_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).if_exists().to_owned())
            .await
    }
}
