//! # Product Handlers

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::PartitionExtension;
use crate::error::ApiError;
use crate::models::product::Product;
use crate::repositories::{CreateProductRequest, ProductRepository, UpdateProductRequest};
use crate::server::AppState;

/// Request payload for creating a product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProductDto {
    #[schema(example = "Espresso beans 1kg")]
    pub name: String,
    /// Unit price in minor units
    #[schema(example = 45000)]
    pub price: i64,
    /// Opening stock level
    #[serde(default)]
    #[schema(example = 0)]
    pub quantity: i32,
    pub category_id: Uuid,
    pub image_path: Option<String>,
}

/// Request payload for updating a product; omitted fields stay unchanged
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductDto {
    pub name: Option<String>,
    /// Unit price in minor units
    pub price: Option<i64>,
    pub category_id: Option<Uuid>,
    pub image_path: Option<String>,
}

/// Product as returned to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    /// Unit price in minor units
    pub price: i64,
    /// Stock on hand
    pub quantity: i32,
    pub category_id: Uuid,
    pub image_path: Option<String>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            category_id: product.category_id,
            image_path: product.image_path,
        }
    }
}

/// Query parameters for product listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListParams {
    /// Restrict the listing to one category
    pub category: Option<Uuid>,
}

/// List products, optionally filtered by category
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListParams),
    responses(
        (status = 200, description = "Products in the partition", body = [ProductDto])
    ),
    tag = "catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let repo = ProductRepository::new(&state.store, &partition);
    let products = repo.list(params.category).await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 404, description = "Category not found", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Json(request): Json<CreateProductDto>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let repo = ProductRepository::new(&state.store, &partition);
    let product = repo
        .create(CreateProductRequest {
            name: request.name,
            price: request.price,
            quantity: request.quantity,
            category_id: request.category_id,
            image_path: request.image_path,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Fetch a single product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductDto),
        (status = 404, description = "Product not found", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDto>, ApiError> {
    let repo = ProductRepository::new(&state.store, &partition);
    let product = repo.get(id).await?;

    Ok(Json(product.into()))
}

/// Update a product's catalog fields
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 404, description = "Product or category not found", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductDto>,
) -> Result<Json<ProductDto>, ApiError> {
    let repo = ProductRepository::new(&state.store, &partition);
    let product = repo
        .update(
            id,
            UpdateProductRequest {
                name: request.name,
                price: request.price,
                category_id: request.category_id,
                image_path: request.image_path.map(Some),
            },
        )
        .await?;

    Ok(Json(product.into()))
}

/// Delete a product with no ledger history
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ApiError),
        (status = 409, description = "Product referenced by ledger rows", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ProductRepository::new(&state.store, &partition);
    repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
