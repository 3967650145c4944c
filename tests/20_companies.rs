mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn admin_creates_updates_and_deletes_company() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let admin = app.admin_token().await?;
    let handle = common::unique("new");

    let res = app
        .client
        .post(app.url("/companies"))
        .bearer_auth(&admin)
        .json(&json!({
            "handle": handle,
            "name": format!("New {}", handle),
            "description": "a company",
            "numEmployees": 10,
            "logoUrl": "http://new.img"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let data = common::data(res).await?;
    assert_eq!(data["company"]["handle"], handle.as_str());
    assert_eq!(data["company"]["numEmployees"], 10);

    // duplicate handle
    let res = app
        .client
        .post(app.url("/companies"))
        .bearer_auth(&admin)
        .json(&json!({ "handle": handle, "name": "Other", "description": "d" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .client
        .patch(app.url(&format!("/companies/{}", handle)))
        .bearer_auth(&admin)
        .json(&json!({ "numEmployees": null, "description": "changed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::data(res).await?;
    assert_eq!(data["company"]["description"], "changed");
    assert_eq!(data["company"]["numEmployees"], Value::Null);
    assert_eq!(data["company"]["logoUrl"], "http://new.img");

    let res = app
        .client
        .delete(app.url(&format!("/companies/{}", handle)))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::data(res).await?["deleted"], handle.as_str());

    let res = app.client.get(app.url(&format!("/companies/{}", handle))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_write_companies() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let (_, token) = app.user_with_token(false).await?;

    let res = app
        .client
        .post(app.url("/companies"))
        .bearer_auth(&token)
        .json(&json!({ "handle": "nope", "name": "Nope", "description": "d" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn update_rejects_empty_unknown_and_missing() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let admin = app.admin_token().await?;
    let company = app.company(&common::unique("Patchable"), Some(5)).await?;
    let path = format!("/companies/{}", company.handle);

    let res = app.client.patch(app.url(&path)).bearer_auth(&admin).json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "No data to update");

    let res = app
        .client
        .patch(app.url(&path))
        .bearer_auth(&admin)
        .json(&json!({ "handle": "renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .client
        .patch(app.url(&format!("/companies/{}", common::unique("missing"))))
        .bearer_auth(&admin)
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn company_filters_compose() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let tag = common::unique("Zq");
    let small = app.company(&format!("{} Small", tag), Some(1)).await?;
    let mid = app.company(&format!("{} Mid", tag), Some(50)).await?;
    let _big = app.company(&format!("{} Big", tag), Some(900)).await?;

    let res = app
        .client
        .get(app.url("/companies"))
        .query(&[("name", tag.to_lowercase().as_str()), ("maxEmployees", "50")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::data(res).await?;
    let handles: Vec<&str> = data["companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["handle"].as_str().unwrap())
        .collect();
    // ordered by name: "... Mid" before "... Small"
    assert_eq!(handles, vec![mid.handle.as_str(), small.handle.as_str()]);

    let res = app
        .client
        .get(app.url("/companies"))
        .query(&[("name", tag.as_str()), ("minEmployees", "50"), ("maxEmployees", "50")])
        .send()
        .await?;
    let data = common::data(res).await?;
    assert_eq!(data["companies"].as_array().unwrap().len(), 1);
    assert_eq!(data["companies"][0]["handle"], mid.handle.as_str());
    Ok(())
}

#[tokio::test]
async fn company_filter_validation() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };

    let res = app
        .client
        .get(app.url("/companies?minEmployees=10&maxEmployees=1"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.client.get(app.url("/companies?bogus=1")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.client.get(app.url("/companies?minEmployees=lots")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn company_detail_lists_jobs() -> Result<()> {
    let Some(app) = common::spawn_app().await? else { return Ok(()) };
    let name = common::unique("With Jobs");
    let company = app.company(&name, None).await?;
    let job = app.job(&company.handle, "Engineer", Some(100), Some("0.5")).await?;

    let res = app.client.get(app.url(&format!("/companies/{}", company.handle))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data = common::data(res).await?;
    assert_eq!(data["company"]["name"], name.as_str());
    assert_eq!(data["company"]["jobs"][0]["id"], job.id);
    assert_eq!(data["company"]["jobs"][0]["title"], "Engineer");
    Ok(())
}
