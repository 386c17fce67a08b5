// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{Credential, Operation, require},
    error::AppError,
    models::{
        quiz::ActionResult,
        role::{AssignRoleRequest, Role, RoleResponse},
    },
    state::Gate,
};

#[derive(Debug, Deserialize)]
pub struct VerifySecretRequest {
    pub secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifySecretResponse {
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSecretRequest {
    pub old_secret: String,
    pub new_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCheckResponse {
    pub is_admin: bool,
}

/// Lets a client check the shared secret before caching it.
pub async fn verify_secret(
    State(gate): State<Gate>,
    Json(payload): Json<VerifySecretRequest>,
) -> Result<Json<VerifySecretResponse>, AppError> {
    let valid = gate.verify_secret(&payload.secret).await?;
    Ok(Json(VerifySecretResponse { valid }))
}

/// Rotates the shared secret.
///
/// The request credential passes the gate first; a mismatching `oldSecret` is then
/// reported as `{success: false}` rather than an error.
pub async fn change_secret(
    State(gate): State<Gate>,
    credential: Credential,
    Json(payload): Json<ChangeSecretRequest>,
) -> Result<Json<ActionResult>, AppError> {
    require(gate.as_ref(), Operation::ChangeSecret, &credential).await?;
    let result = gate
        .change_secret(&payload.old_secret, &payload.new_secret)
        .await?;
    Ok(Json(result))
}

pub async fn get_role(
    State(gate): State<Gate>,
    credential: Credential,
) -> Result<Json<RoleResponse>, AppError> {
    let caller = gate.role_of(&credential).await?;
    Ok(Json(RoleResponse {
        identity: caller.identity,
        role: caller.role,
    }))
}

pub async fn is_admin(
    State(gate): State<Gate>,
    credential: Credential,
) -> Result<Json<AdminCheckResponse>, AppError> {
    let caller = gate.role_of(&credential).await?;
    Ok(Json(AdminCheckResponse {
        is_admin: caller.role == Role::Admin,
    }))
}

/// guest -> user for the calling identity. Returns the resulting role.
pub async fn register(
    State(gate): State<Gate>,
    credential: Credential,
) -> Result<Json<RoleResponse>, AppError> {
    let role = gate.register(&credential).await?;
    let caller = gate.role_of(&credential).await?;
    Ok(Json(RoleResponse {
        identity: caller.identity,
        role,
    }))
}

/// Admin only. Moves any identity to any role, including demotion.
pub async fn assign_role(
    State(gate): State<Gate>,
    credential: Credential,
    Path(identity): Path<String>,
    Json(payload): Json<AssignRoleRequest>,
) -> Result<Json<RoleResponse>, AppError> {
    require(gate.as_ref(), Operation::AssignRole, &credential).await?;
    gate.assign_role(&identity, payload.role).await?;
    Ok(Json(RoleResponse {
        identity,
        role: payload.role,
    }))
}
