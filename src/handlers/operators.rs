//! # Operator Handlers
//!
//! Tenant-local operator login. A credential mismatch is a regular response
//! with `authorized: false`, not an error.

use axum::{Extension, extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::PartitionExtension;
use crate::error::ApiError;
use crate::models::operator::Operator;
use crate::repositories::OperatorRepository;
use crate::server::AppState;

/// Request payload for operator login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

/// Operator account as returned to the client (no credential echo)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OperatorDto {
    pub id: Uuid,
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin")]
    pub role: String,
}

impl From<Operator> for OperatorDto {
    fn from(operator: Operator) -> Self {
        Self {
            id: operator.id,
            username: operator.username,
            role: operator.role,
        }
    }
}

/// Response payload for operator login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Whether the credentials matched
    pub authorized: bool,
    /// The matched operator account, when authorized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorDto>,
}

/// Check operator credentials within the resolved partition
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Credential check outcome", body = LoginResponseDto),
        (status = 401, description = "Missing license header", body = ApiError)
    ),
    tag = "operators"
)]
pub async fn login(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Json(request): Json<LoginRequestDto>,
) -> Result<Json<LoginResponseDto>, ApiError> {
    let repo = OperatorRepository::new(&state.store, &partition);
    let operator = repo
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponseDto {
        authorized: operator.is_some(),
        operator: operator.map(Into::into),
    }))
}
