//! Post entity for SeaORM.

use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Listing row - the post columns without `content`.
#[derive(Debug, FromQueryResult)]
pub struct SummaryRow {
    pub id: i32,
    pub title: String,
    pub created_at: DateTimeWithTimeZone,
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for publisher_core::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            created_at: model.created_at.into(),
        }
    }
}

impl From<SummaryRow> for publisher_core::PostSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            created_at: row.created_at.into(),
        }
    }
}
