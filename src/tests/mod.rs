mod auth_api_tests;

use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::Value;

pub fn client() -> Client {
    Client::tracked(crate::build_rocket()).expect("valid rocket instance")
}

pub fn body_json(response: rocket::local::blocking::LocalResponse<'_>) -> Value {
    let body = response.into_string().expect("response body");
    serde_json::from_str(&body).expect("JSON response body")
}

/// Registers a fresh account and returns a bearer token for it.
pub fn register_and_login(client: &Client, username: &str) -> String {
    let register = client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(format!(
            r#"{{"username":"{username}","email":"{username}@example.com","password":"correct horse battery"}}"#
        ))
        .dispatch();
    assert_eq!(register.status(), Status::Ok);

    let login = client
        .post("/auth/login")
        .header(ContentType::JSON)
        .body(format!(
            r#"{{"username":"{username}","password":"correct horse battery"}}"#
        ))
        .dispatch();
    assert_eq!(login.status(), Status::Ok);

    body_json(login)["access_token"]
        .as_str()
        .expect("access_token in login response")
        .to_string()
}
