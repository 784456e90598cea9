//! # Category Handlers

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::PartitionExtension;
use crate::error::ApiError;
use crate::models::category::Category;
use crate::repositories::CategoryRepository;
use crate::server::AppState;

/// Request payload for creating or renaming a category
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryRequestDto {
    #[schema(example = "Beverages")]
    pub name: String,
}

/// Category as returned to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    #[schema(example = "Beverages")]
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// List all categories in the partition
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories in the partition", body = [CategoryDto])
    ),
    tag = "catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let repo = CategoryRepository::new(&state.store, &partition);
    let categories = repo.list().await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequestDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 409, description = "Category name already exists", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Json(request): Json<CategoryRequestDto>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let repo = CategoryRepository::new(&state.store, &partition);
    let category = repo.create(&request.name).await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryRequestDto,
    responses(
        (status = 200, description = "Category renamed", body = CategoryDto),
        (status = 404, description = "Category not found", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn rename_category(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(id): Path<Uuid>,
    Json(request): Json<CategoryRequestDto>,
) -> Result<Json<CategoryDto>, ApiError> {
    let repo = CategoryRepository::new(&state.store, &partition);
    let category = repo.rename(id, &request.name).await?;

    Ok(Json(category.into()))
}

/// Delete a category that no product references
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ApiError),
        (status = 409, description = "Category still has products", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = CategoryRepository::new(&state.store, &partition);
    repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
