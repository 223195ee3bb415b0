use crate::error::PortalError;
use crate::middleware::auth::{CurrentUser, RequireAdmin};
use crate::router::PortalState;
use crate::types::api::{StudentCreate, StudentPatch, StudentRecord};
use crate::types::role::Role;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{error, info};

/// GET /students -> the full roster. Admin only.
pub async fn list_students(
    State(state): State<PortalState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<StudentRecord>>, PortalError> {
    let records = state.storage().list_students().await?;
    Ok(Json(records))
}

/// GET /students/owner/{ownerUserId} -> the record owned by that account.
/// Students may only read their own; admins may read any.
pub async fn get_student_by_owner(
    State(state): State<PortalState>,
    CurrentUser(user): CurrentUser,
    Path(owner_user_id): Path<i64>,
) -> Result<Json<StudentRecord>, PortalError> {
    if user.role != Role::Admin && user.id != owner_user_id {
        return Err(PortalError::Forbidden);
    }

    let record = state
        .storage()
        .get_student_by_owner(owner_user_id)
        .await?
        .ok_or(PortalError::StudentNotFound)
        .inspect_err(|e| error!(owner_user_id, "{e}"))?;
    Ok(Json(record))
}

/// POST /students -> create a roster record. Admin only.
pub async fn create_student(
    State(state): State<PortalState>,
    RequireAdmin(admin): RequireAdmin,
    Json(data): Json<StudentCreate>,
) -> Result<(StatusCode, Json<StudentRecord>), PortalError> {
    let record = state.storage().insert_student(&data).await?;
    info!(
        record_id = record.id,
        admin_id = admin.id,
        "roster record created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /students/{id} -> merge a partial update into the record.
/// Admins may edit any record; students only the one they own.
pub async fn update_student(
    State(state): State<PortalState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(patch): Json<StudentPatch>,
) -> Result<Json<StudentRecord>, PortalError> {
    let mut record = state
        .storage()
        .get_student_by_id(id)
        .await?
        .ok_or(PortalError::StudentNotFound)
        .inspect_err(|e| error!(record_id = id, "{e}"))?;

    if user.role != Role::Admin && record.owner_user_id != user.id {
        return Err(PortalError::Forbidden);
    }

    patch.apply(&mut record);
    state.storage().update_student(id, &record).await?;
    Ok(Json(record))
}

/// DELETE /students/{id} -> remove the record. Admin only.
pub async fn delete_student(
    State(state): State<PortalState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode, PortalError> {
    if !state.storage().delete_student(id).await? {
        error!(record_id = id, "delete failed: student record not found");
        return Err(PortalError::StudentNotFound);
    }
    info!(record_id = id, admin_id = admin.id, "roster record deleted");
    Ok(StatusCode::NO_CONTENT)
}
