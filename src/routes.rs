use actix_web::{
    delete, get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde_json::json;

use crate::{db, errors::AppError, structs::ParticipantPayload, validation, AppState};

/// Service banner with the endpoint map.
#[get("/")]
pub async fn index_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Census API is running",
        "endpoints": { "participants": "/participants" }
    }))
}

#[post("/participants/add")]
pub async fn add_participant_handler(
    state: Data<AppState>,
    web::Json(payload): web::Json<ParticipantPayload>,
) -> Result<impl Responder, AppError> {
    let record = validation::validate_participant(&payload).map_err(AppError::Validation)?;
    db::add_participant(&state.db_pool, &record).await?;
    Ok(HttpResponse::Created().json(json!({ "message": "Participant added successfully" })))
}

#[get("/participants")]
pub async fn list_participants_handler(
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let participants = db::get_all_participants(&state.db_pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "participants": participants })))
}

/// Personal details of all participants, trimmed to name and email.
#[get("/participants/details")]
pub async fn participant_summaries_handler(
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let participants = db::get_participant_summaries(&state.db_pool).await?;
    Ok(HttpResponse::Ok().json(json!({ "participants": participants })))
}

#[get("/participants/details/{email}")]
pub async fn personal_details_handler(
    state: Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let email = path.into_inner();
    let details = db::get_personal_details(&state.db_pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "details": details })))
}

#[get("/participants/work/{email}")]
pub async fn work_details_handler(
    state: Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let email = path.into_inner();
    let work = db::get_work_details(&state.db_pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Participant or work details not found".to_string())
        })?;
    Ok(HttpResponse::Ok().json(json!({ "work": work })))
}

#[get("/participants/home/{email}")]
pub async fn home_details_handler(
    state: Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let email = path.into_inner();
    let home = db::get_home_details(&state.db_pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Participant or home details not found".to_string())
        })?;
    Ok(HttpResponse::Ok().json(json!({ "home": home })))
}

#[delete("/participants/{email}")]
pub async fn delete_participant_handler(
    state: Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let email = path.into_inner();
    db::delete_participant(&state.db_pool, &email).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Participant deleted successfully" })))
}

#[put("/participants/{email}")]
pub async fn update_participant_handler(
    state: Data<AppState>,
    path: web::Path<String>,
    web::Json(payload): web::Json<ParticipantPayload>,
) -> Result<impl Responder, AppError> {
    let email = path.into_inner();
    let record = validation::validate_participant(&payload).map_err(AppError::Validation)?;
    db::update_participant(&state.db_pool, &email, &record).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Participant updated successfully" })))
}

/// Fallback for any unmatched path.
pub async fn default_handler() -> impl Responder {
    HttpResponse::NotFound().json(json!({ "error": "Not found" }))
}
