use actix_web::error::InternalError;
use actix_web::{get, put, web, HttpResponse, Responder};
use log::error;

use crate::dtos::birthday::PutBirthdayIn;
use crate::services::birthday_services::{BirthdayService, ServiceError};

/// Fixed body for every validation failure.
const INVALID_REQUEST: &str = "Invalid request.";

/// GET /users/{username}
/// Greeting when the anchored birth date is today, countdown otherwise.
#[get("/users/{username}")]
pub async fn get_user_data(
    path: web::Path<String>,
    svc: web::Data<BirthdayService>,
) -> impl Responder {
    let username = path.into_inner();
    match svc.get_user_data(&username).await {
        Ok(message) => HttpResponse::Ok().body(message),
        Err(e) => error_response(e),
    }
}

/// PUT /users/{username}
/// Upserts the record; 204 with no body whether or not one existed.
#[put("/users/{username}")]
pub async fn put_user_data(
    path: web::Path<String>,
    svc: web::Data<BirthdayService>,
    body: web::Json<PutBirthdayIn>,
) -> impl Responder {
    let username = path.into_inner();
    match svc.put_user_data(&username, &body.date_of_birth).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// GET /health
/// Liveness probe for the gateway; no storage round trip.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Catch-all for unsupported methods and unknown paths.
pub async fn invalid_request() -> impl Responder {
    HttpResponse::BadRequest().body(INVALID_REQUEST)
}

/// Body deserialization failures get the same fixed 400 as every other
/// validation failure.
pub fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        InternalError::from_response(err, HttpResponse::BadRequest().body(INVALID_REQUEST)).into()
    })
}

fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation => HttpResponse::BadRequest().body(INVALID_REQUEST),
        ServiceError::NotFound(username) => {
            HttpResponse::NotFound().body(format!("Data is missing for {} user", username))
        }
        ServiceError::Storage(e) => {
            error!("Storage failure: {}", e);
            HttpResponse::InternalServerError().body("Internal server error.")
        }
    }
}
