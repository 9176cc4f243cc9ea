use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/images", image_routes())
}

fn image_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(handlers::images::list_images))
        .routes(routes!(
            handlers::images::get_image,
            handlers::images::delete_image
        ))
        .routes(routes!(handlers::images::delete_images_batch))
        .routes(routes!(handlers::images::fetch_images_from_url))
        .routes(routes!(handlers::images::analyze_image_url))
        .routes(routes!(handlers::images::analyze_image_urls));

    let uploads = OpenApiRouter::new()
        .routes(routes!(handlers::images::analyze_image))
        .routes(routes!(handlers::images::analyze_batch))
        .layer(handlers::images::upload_body_limit());

    crud.merge(uploads)
}
