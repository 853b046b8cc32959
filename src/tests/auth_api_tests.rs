use rocket::http::{ContentType, Header, Status};

use super::{body_json, client, register_and_login};

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

#[test]
fn register_returns_the_user_without_the_password() {
    let client = client();
    let response = client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(r#"{"username":"alice","email":"alice@example.com","password":"hunter2hunter2"}"#)
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let json = body_json(response);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["role"], "user");
    assert_eq!(json["is_active"], true);
    assert!(json["id"].is_string());
    assert!(json.get("password").is_none());
}

#[test]
fn register_validates_its_inputs() {
    let client = client();
    let cases = [
        // username too short
        r#"{"username":"al","email":"al@example.com","password":"hunter2hunter2"}"#,
        // password too short
        r#"{"username":"alice","email":"alice@example.com","password":"short"}"#,
        // not an email
        r#"{"username":"alice","email":"nope","password":"hunter2hunter2"}"#,
    ];
    for body in cases {
        let response = client
            .post("/auth/register")
            .header(ContentType::JSON)
            .body(body)
            .dispatch();
        assert_eq!(response.status(), Status::BadRequest);
        assert!(body_json(response)["error"].is_string());
    }
}

#[test]
fn duplicate_registration_conflicts() {
    let client = client();
    let body = r#"{"username":"bob","email":"bob@example.com","password":"hunter2hunter2"}"#;
    let first = client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(body)
        .dispatch();
    assert_eq!(first.status(), Status::Ok);

    let duplicate = client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(body)
        .dispatch();
    assert_eq!(duplicate.status(), Status::Conflict);

    // same email under a different username is also rejected
    let same_email = client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(r#"{"username":"robert","email":"bob@example.com","password":"hunter2hunter2"}"#)
        .dispatch();
    assert_eq!(same_email.status(), Status::Conflict);
}

#[test]
fn login_issues_a_bearer_token_with_the_user() {
    let client = client();
    client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(r#"{"username":"carol","email":"carol@example.com","password":"hunter2hunter2"}"#)
        .dispatch();

    let response = client
        .post("/auth/login")
        .header(ContentType::JSON)
        .body(r#"{"username":"carol","password":"hunter2hunter2"}"#)
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let json = body_json(response);
    assert_eq!(json["token_type"], "bearer");
    assert!(json["expires_in"].as_i64().unwrap() > 0);
    assert!(json["access_token"].as_str().unwrap().contains('.'));
    assert_eq!(json["user"]["username"], "carol");
    assert!(json["user"]["last_login"].is_string());
}

#[test]
fn login_with_bad_credentials_is_401() {
    let client = client();
    client
        .post("/auth/register")
        .header(ContentType::JSON)
        .body(r#"{"username":"dave","email":"dave@example.com","password":"hunter2hunter2"}"#)
        .dispatch();

    for body in [
        r#"{"username":"dave","password":"wrong password"}"#,
        r#"{"username":"nobody","password":"hunter2hunter2"}"#,
    ] {
        let response = client
            .post("/auth/login")
            .header(ContentType::JSON)
            .body(body)
            .dispatch();
        assert_eq!(response.status(), Status::Unauthorized);
        assert!(body_json(response)["error"].is_string());
    }
}

#[test]
fn profile_requires_a_valid_token() {
    let client = client();

    let missing = client.get("/auth/profile").dispatch();
    assert_eq!(missing.status(), Status::Unauthorized);

    let garbage = client
        .get("/auth/profile")
        .header(bearer("not.a.jwt"))
        .dispatch();
    assert_eq!(garbage.status(), Status::Unauthorized);

    let token = register_and_login(&client, "erin");
    let response = client.get("/auth/profile").header(bearer(&token)).dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(body_json(response)["username"], "erin");
}

#[test]
fn logout_blacklists_the_token() {
    let client = client();
    let token = register_and_login(&client, "frank");

    let logout = client
        .post("/auth/logout")
        .header(bearer(&token))
        .dispatch();
    assert_eq!(logout.status(), Status::Ok);

    // the revoked token no longer authenticates
    let after = client.get("/auth/profile").header(bearer(&token)).dispatch();
    assert_eq!(after.status(), Status::Unauthorized);
}
