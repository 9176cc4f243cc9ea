use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema,
};

use crate::entity::image_analysis;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// Create the analyses table and its sort index if they are missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(image_analysis::Entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    // Listing always orders by created_at descending.
    let mut index = Index::create();
    index
        .name("idx_image_analyses_created_at")
        .table(image_analysis::Entity)
        .col(image_analysis::Column::CreatedAt)
        .if_not_exists();
    db.execute(backend.build(&index)).await?;

    Ok(())
}
