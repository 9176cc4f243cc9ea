use chrono::Utc;
use common::scores::ImageScores;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder,
    QuerySelect,
};

use crate::entity::image_analysis;

/// Insert a finished analysis and return the materialized record, timestamp
/// included, so callers need not re-fetch it.
pub async fn save_analysis(
    db: &DatabaseConnection,
    id: String,
    url: String,
    filename: String,
    scores: ImageScores,
) -> Result<image_analysis::Model, DbErr> {
    let model = image_analysis::Model {
        id,
        url,
        filename,
        scores,
        created_at: Utc::now(),
    };

    image_analysis::Entity::insert(model.clone().into_active_model())
        .exec_without_returning(db)
        .await?;

    Ok(model)
}

/// Point lookup by primary key. `None` means "never existed or already
/// deleted", which is a regular outcome rather than an error.
pub async fn get_analysis(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<image_analysis::Model>, DbErr> {
    image_analysis::Entity::find_by_id(id).one(db).await
}

/// One page of records ordered by `created_at` descending, plus the
/// unfiltered total count.
pub async fn list_analyses(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
) -> Result<(Vec<image_analysis::Model>, u64), DbErr> {
    let total = image_analysis::Entity::find().count(db).await?;

    let rows = image_analysis::Entity::find()
        .order_by_desc(image_analysis::Column::CreatedAt)
        .offset((page - 1) * page_size)
        .limit(page_size)
        .all(db)
        .await?;

    Ok((rows, total))
}

/// Delete by primary key. Deleting a missing id is not an error.
pub async fn delete_analysis(db: &DatabaseConnection, id: &str) -> Result<(), DbErr> {
    image_analysis::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
