mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use jobly::auth::decode_token;

#[tokio::test]
async fn register_then_login() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let username = common::unique("new");

    let res = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": username,
            "password": "password",
            "firstName": "New",
            "lastName": "User",
            "email": "new@example.com",
            "isAdmin": true
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let token = common::data(res).await?["token"].as_str().unwrap().to_string();
    let claims = decode_token(&token)?;
    assert_eq!(claims.username, username);
    assert!(!claims.is_admin, "self registration never grants admin");

    let res = app
        .client
        .post(app.url("/auth/token"))
        .json(&json!({ "username": username, "password": "password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(common::data(res).await?["token"].is_string());

    let res = app
        .client
        .post(app.url("/auth/token"))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": username,
            "password": "password",
            "firstName": "Dup",
            "lastName": "User",
            "email": "dup@example.com"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn register_validates_fields() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let res = app
        .client
        .post(app.url("/auth/register"))
        .json(&json!({
            "username": common::unique("bad"),
            "password": "pw",
            "firstName": "Bad",
            "lastName": "User",
            "email": "not-an-email"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password"].is_string());
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn users_see_only_themselves() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let (me, token) = app.user_with_token(false).await?;
    let (other, _) = app.user_with_token(false).await?;

    let res = app
        .client
        .get(app.url(&format!("/users/{}", me.username)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::data(res).await?;
    assert_eq!(data["user"]["username"], me.username.as_str());
    assert_eq!(data["user"]["jobs"], json!([]));
    assert!(data["user"].get("password").is_none());

    let res = app
        .client
        .get(app.url(&format!("/users/{}", other.username)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.client.get(app.url("/users")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn user_update_rules() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let (me, token) = app.user_with_token(false).await?;
    let path = format!("/users/{}", me.username);

    let res = app
        .client
        .patch(app.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "firstName": "Renamed", "password": "newpassword" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::data(res).await?["user"]["firstName"], "Renamed");

    // the new password is hashed and usable
    let res = app
        .client
        .post(app.url("/auth/token"))
        .json(&json!({ "username": me.username, "password": "newpassword" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .client
        .patch(app.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "isAdmin": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .client
        .patch(app.url(&path))
        .bearer_auth(&token)
        .json(&json!({ "username": "someone-else" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admin_creates_and_removes_users() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let admin = app.admin_token().await?;
    let username = common::unique("made");

    let res = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&admin)
        .json(&json!({
            "username": username,
            "password": "password",
            "firstName": "Made",
            "lastName": "ByAdmin",
            "email": "made@example.com",
            "isAdmin": true
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let data = common::data(res).await?;
    assert_eq!(data["user"]["isAdmin"], true);
    assert!(data["token"].is_string());

    let res = app.client.get(app.url("/users")).bearer_auth(&admin).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::data(res).await?;
    assert!(data["users"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["username"] == username.as_str()));

    let path = format!("/users/{}", username);
    let res = app.client.delete(app.url(&path)).bearer_auth(&admin).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::data(res).await?["deleted"], username.as_str());

    let res = app.client.get(app.url(&path)).bearer_auth(&admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn apply_to_job() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let (me, token) = app.user_with_token(false).await?;
    let company = app.company(&common::unique("Apply"), None).await?;
    let job = app.job(&company.handle, "Tester", None, None).await?;

    let res = app
        .client
        .post(app.url(&format!("/users/{}/jobs/{}", me.username, job.id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::data(res).await?["applied"], job.id);

    let res = app
        .client
        .get(app.url(&format!("/users/{}", me.username)))
        .bearer_auth(&token)
        .send()
        .await?;
    let data = common::data(res).await?;
    assert_eq!(data["user"]["jobs"], json!([job.id]));

    let res = app
        .client
        .post(app.url(&format!("/users/{}/jobs/0", me.username)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
