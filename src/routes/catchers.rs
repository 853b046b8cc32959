use rocket::serde::json::Json;
use rocket::Request;

use crate::errors::ErrorResponse;

#[catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Bad request".to_string(),
    })
}

#[catch(401)]
pub fn unauthorized() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Missing or invalid credentials".to_string(),
    })
}

#[catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Endpoint not found".to_string(),
    })
}

#[catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: "Malformed JSON body".to_string(),
    })
}

#[catch(500)]
pub fn internal_error(req: &Request<'_>) -> Json<ErrorResponse> {
    log::error!("unhandled failure on {}", req.uri());
    Json(ErrorResponse {
        error: "Internal server error".to_string(),
    })
}
