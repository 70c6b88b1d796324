// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Patient record endpoints.
//!
//! Every operation is scoped to the authenticated doctor. A record that
//! exists but belongs to someone else is answered exactly like a record
//! that does not exist: 404 `Patient not found`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::Auth;
use crate::error::{ApiError, ApiJson};
use crate::models::{CreatePatientRequest, MessageResponse, UpdatePatientRequest};
use crate::state::AppState;
use crate::storage::Patient;

/// List the caller's patient records, newest first.
#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "Patients",
    responses(
        (status = 200, description = "Caller's records, newest first", body = [Patient]),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn list_patients(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.db.list_patients(&identity.doctor_id).map_err(|e| {
        tracing::error!(error = %e, "Failed to list patient records");
        ApiError::internal("Failed to fetch patients")
    })?;

    Ok(Json(patients))
}

/// Create a patient record owned by the caller.
#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "Patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Record created", body = Patient),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn create_patient(
    Auth(identity): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let gender = request.validate()?;
    let patient = Patient::new(&identity.doctor_id, request, gender);

    state.db.insert_patient(&patient).map_err(|e| {
        tracing::error!(error = %e, "Failed to store patient record");
        ApiError::internal("Failed to create patient")
    })?;

    tracing::info!(
        patient_id = %patient.id,
        doctor_id = %identity.doctor_id,
        "Patient record created"
    );
    Ok((StatusCode::CREATED, Json(patient)))
}

/// Fetch one of the caller's patient records.
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient record id")
    ),
    tag = "Patients",
    responses(
        (status = 200, description = "The record", body = Patient),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such record visible to the caller"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn get_patient(
    Auth(identity): Auth,
    Path(patient_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state
        .db
        .get_patient(&identity.doctor_id, &patient_id)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load patient record");
            ApiError::internal("Details fetch failed")
        })?;

    patient
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Patient not found"))
}

/// Partially update one of the caller's patient records.
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient record id")
    ),
    tag = "Patients",
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "The updated record", body = Patient),
        (status = 400, description = "Validation failed or unknown field"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such record visible to the caller"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn update_patient(
    Auth(identity): Auth,
    Path(patient_id): Path<String>,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UpdatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    let gender = patch.validate()?;

    let updated = state
        .db
        .update_patient(&identity.doctor_id, &patient_id, |patient| {
            patient.apply_update(patch, gender);
        })
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to update patient record");
            ApiError::internal("Update failed")
        })?;

    updated
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Patient not found"))
}

/// Delete one of the caller's patient records.
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient record id")
    ),
    tag = "Patients",
    responses(
        (status = 200, description = "Record deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such record visible to the caller"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn delete_patient(
    Auth(identity): Auth,
    Path(patient_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state
        .db
        .delete_patient(&identity.doctor_id, &patient_id)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to delete patient record");
            ApiError::internal("Delete failed")
        })?;

    if !removed {
        return Err(ApiError::not_found("Patient not found"));
    }

    tracing::info!(
        patient_id = %patient_id,
        doctor_id = %identity.doctor_id,
        "Patient record deleted"
    );
    Ok(Json(MessageResponse {
        message: "Patient deleted".to_string(),
    }))
}
