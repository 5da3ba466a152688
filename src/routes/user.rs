use axum::Json;
use axum::extract::Extension;

use crate::token::Identity;

pub(crate) async fn me(Extension(identity): Extension<Option<Identity>>) -> Json<Option<Identity>> {
    Json(identity)
}
