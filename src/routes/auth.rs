use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::models::user::User;
use crate::store::{TokenBlacklist, UserStore};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: i64,
    user: User,
}

fn generate_jwt(
    username: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_owned(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn validate_jwt(token: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims.sub)
}

fn bearer_token<'r>(req: &'r Request<'_>) -> Option<&'r str> {
    req.headers()
        .get_one("Authorization")
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Request guard for a valid, non-blacklisted bearer token resolving to an
/// active user account.
pub struct AuthenticatedUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match bearer_token(req) {
            Some(t) => t,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let blacklist = match req.rocket().state::<TokenBlacklist>() {
            Some(b) => b,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };
        if blacklist.contains(token) {
            return Outcome::Error((Status::Unauthorized, ()));
        }

        let config = match req.rocket().state::<AppConfig>() {
            Some(c) => c,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };
        let username = match validate_jwt(token, &config.secret_key) {
            Ok(username) => username,
            Err(_) => return Outcome::Error((Status::Unauthorized, ())),
        };

        let users = match req.rocket().state::<UserStore>() {
            Some(u) => u,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };
        match users.find_by_username(&username) {
            Some(user) if user.is_active => Outcome::Success(AuthenticatedUser { user }),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// Raw bearer token, checked against the blacklist only. Used by logout,
/// which must accept the token it is about to revoke.
pub struct AuthToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match bearer_token(req) {
            Some(token) => Outcome::Success(AuthToken(token.to_string())),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

#[post("/auth/register", format = "json", data = "<req>")]
pub fn register(req: Json<RegisterRequest>, users: &State<UserStore>) -> Result<Json<User>, ApiError> {
    if req.username.trim().len() < 3 {
        return Err(ApiError::BadRequest(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if users.find_by_username(&req.username).is_some() {
        return Err(ApiError::Conflict("Username already registered".to_string()));
    }
    if users.find_by_email(&req.email).is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let hashed_password = hash(&req.password, DEFAULT_COST)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

    let user = User::new(req.username.clone(), req.email.clone(), hashed_password);
    if !users.insert(user.clone()) {
        return Err(ApiError::Conflict("Username already registered".to_string()));
    }

    log::info!("registered user {}", user.username);
    Ok(Json(user))
}

#[post("/auth/login", format = "json", data = "<credentials>")]
pub fn login(
    credentials: Json<LoginRequest>,
    users: &State<UserStore>,
    config: &State<AppConfig>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = users
        .find_by_username(&credentials.username)
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    if !verify(&credentials.password, &user.password).unwrap_or(false) {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }
    if !user.is_active {
        return Err(ApiError::Unauthorized(
            "User account is disabled".to_string(),
        ));
    }

    users.touch_login(&user.username);

    let access_token = generate_jwt(&user.username, &config.secret_key, config.token_ttl_minutes)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("token encoding failed: {e}")))?;

    // re-read so the response carries the fresh last_login
    let user = users
        .find_by_username(&user.username)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("user vanished during login")))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: config.token_ttl_minutes * 60,
        user,
    }))
}

#[post("/auth/logout")]
pub fn logout(token: AuthToken, blacklist: &State<TokenBlacklist>) -> Json<serde_json::Value> {
    blacklist.insert(&token.0);
    Json(serde_json::json!({ "message": "Token revoked successfully" }))
}

#[get("/auth/profile")]
pub fn profile(auth: AuthenticatedUser) -> Json<User> {
    Json(auth.user)
}
