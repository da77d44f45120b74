//! Generic CRUD handlers shared by every record collection.
//!
//! The per-collection modules are thin axum/OpenAPI bindings that pick the
//! right `RecordService` out of `AppState` and delegate here.

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};

use crate::error::ApiError;
use crate::models::Record;
use crate::service::RecordService;

pub async fn create<R: Record>(
    service: &RecordService<R>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let Json(draft) = payload?;
    let record = service.create(draft).await?;

    tracing::info!("Created {} with id: {}", R::NOUN.to_lowercase(), record.id());
    Ok((StatusCode::OK, Json(record)))
}

pub async fn list<R: Record>(
    service: &RecordService<R>,
) -> Result<(StatusCode, Json<Vec<R>>), ApiError> {
    let records = service.get_all().await?;

    tracing::info!("Listed {} {} entries", records.len(), R::COLLECTION);
    Ok((StatusCode::OK, Json(records)))
}

pub async fn get_one<R: Record>(
    service: &RecordService<R>,
    id: String,
) -> Result<(StatusCode, Json<R>), ApiError> {
    match service.get_one(&id).await {
        Ok(record) => {
            tracing::info!("Retrieved {} with id: {}", R::NOUN.to_lowercase(), id);
            Ok((StatusCode::OK, Json(record)))
        }
        Err(e) => {
            log_miss::<R>(&e, &id);
            Err(e)
        }
    }
}

pub async fn update<R: Record>(
    service: &RecordService<R>,
    id: String,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    // Unknown ids are 404 whatever the body
    let result = match service.get_one(&id).await {
        Ok(_) => match payload {
            Ok(Json(patch)) => service.update(&id, patch).await,
            Err(rejection) => Err(rejection.into()),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(record) => {
            tracing::info!("Updated {} with id: {}", R::NOUN.to_lowercase(), id);
            Ok((StatusCode::OK, Json(record)))
        }
        Err(e) => {
            log_miss::<R>(&e, &id);
            Err(e)
        }
    }
}

pub async fn delete<R: Record>(
    service: &RecordService<R>,
    id: String,
) -> Result<(StatusCode, Json<R>), ApiError> {
    match service.delete(&id).await {
        Ok(record) => {
            tracing::info!("Deleted {} with id: {}", R::NOUN.to_lowercase(), id);
            Ok((StatusCode::OK, Json(record)))
        }
        Err(e) => {
            log_miss::<R>(&e, &id);
            Err(e)
        }
    }
}

fn log_miss<R: Record>(err: &ApiError, id: &str) {
    if matches!(err, ApiError::NotFound { .. }) {
        tracing::info!("{} not found with id: {}", R::NOUN, id);
    }
}
