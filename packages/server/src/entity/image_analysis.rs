use common::scores::ImageScores;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image_analyses")]
pub struct Model {
    /// UUIDv4 assigned at upload time. Doubles as the storage path stem.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Public URL of the stored image. Set once, never mutated.
    pub url: String,

    /// Original client-supplied name, display-only.
    pub filename: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub scores: ImageScores,

    /// Assigned at save time; the sole sort key for listing (descending).
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
