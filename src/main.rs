#[macro_use]
extern crate rocket;

mod config;
mod crypto;
mod errors;
mod models;
mod routes;
mod store;
#[cfg(test)]
mod tests;

use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};

pub fn build_rocket() -> Rocket<Build> {
    let app_config = config::AppConfig::from_env();

    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .to_cors()
        .expect("invalid CORS configuration");

    rocket::custom(rocket::Config {
        address: "0.0.0.0".parse().expect("invalid bind address"),
        port: app_config.port,
        ..rocket::Config::default()
    })
    .attach(cors)
    .manage(app_config)
    .manage(store::UserStore::new())
    .manage(store::TokenBlacklist::new())
    .manage(store::KeyStore::new())
    .manage(store::OperationLog::new())
    .mount(
        "/",
        routes![
            routes::demo::preflight,
            routes::demo::index,
            routes::demo::algorithms,
            routes::demo::encrypt,
            routes::demo::encrypt_wrong_method,
            routes::demo::decrypt,
            routes::demo::decrypt_wrong_method,
            routes::demo::health,
            routes::auth::register,
            routes::auth::login,
            routes::auth::logout,
            routes::auth::profile,
        ],
    )
    .mount(
        "/api/v1",
        routes![
            routes::vault::create_key,
            routes::vault::list_keys,
            routes::vault::delete_key,
            routes::vault::encrypt,
            routes::vault::decrypt,
            routes::vault::operations,
        ],
    )
    .register(
        "/",
        catchers![
            routes::catchers::bad_request,
            routes::catchers::unauthorized,
            routes::catchers::not_found,
            routes::catchers::unprocessable,
            routes::catchers::internal_error,
        ],
    )
}

#[launch]
fn rocket() -> _ {
    let _ = env_logger::try_init();
    build_rocket()
}
