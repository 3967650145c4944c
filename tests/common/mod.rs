#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;

use jobly::app::{app, AppState};
use jobly::auth::create_token;
use jobly::config::{self, AppConfig};
use jobly::database::models::{Company, CompanyNew, Job, JobNew, User, UserNew};
use jobly::database::DatabaseManager;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert a user straight through the repository and sign a token for it
    pub async fn user_with_token(&self, is_admin: bool) -> Result<(User, String)> {
        let username = unique(if is_admin { "admin" } else { "user" });
        let user = self
            .state
            .users
            .register(UserNew {
                username: username.clone(),
                password: "password1".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("{}@example.com", username),
                is_admin,
            })
            .await?;
        let token = create_token(&user)?;
        Ok((user, token))
    }

    pub async fn admin_token(&self) -> Result<String> {
        Ok(self.user_with_token(true).await?.1)
    }

    pub async fn company(&self, name: &str, num_employees: Option<i32>) -> Result<Company> {
        let company = self
            .state
            .companies
            .create(CompanyNew {
                handle: unique("c"),
                name: name.to_string(),
                description: "test company".to_string(),
                num_employees,
                logo_url: None,
            })
            .await?;
        Ok(company)
    }

    pub async fn job(&self, company_handle: &str, title: &str, salary: Option<i32>, equity: Option<&str>) -> Result<Job> {
        let job = self
            .state
            .jobs
            .create(JobNew {
                title: title.to_string(),
                salary,
                equity: equity.map(|e| e.parse()).transpose()?,
                company_handle: company_handle.to_string(),
            })
            .await?;
        Ok(job)
    }
}

/// Short unique identifier usable as a company handle or username
pub fn unique(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &id[..10])
}

fn test_config() -> AppConfig {
    let mut config = config::config().clone();
    // bcrypt's minimum cost keeps fixtures fast
    config.security.bcrypt_work_factor = 4;
    config
}

async fn serve(state: AppState, config: &AppConfig) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let router = app(state, config);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

/// Start the app against the configured database. Returns `None` when
/// DATABASE_URL is unset so database-backed tests can skip.
pub async fn spawn_app() -> Result<Option<TestApp>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(None);
    }

    let config = test_config();
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;

    let state = AppState::new(pool, &config);
    let base_url = serve(state.clone(), &config).await?;

    Ok(Some(TestApp {
        base_url,
        client: reqwest::Client::new(),
        state,
    }))
}

/// Start the app with a pool that never connects up front, for routes that
/// are answered before any query runs.
pub async fn spawn_offline_app() -> Result<TestApp> {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://127.0.0.1:1/jobly_offline")?;

    let state = AppState::new(pool, &config);
    let base_url = serve(state.clone(), &config).await?;

    Ok(TestApp {
        base_url,
        client: reqwest::Client::new(),
        state,
    })
}

/// Pull the `data` member out of a success envelope
pub async fn data(res: reqwest::Response) -> Result<Value> {
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true, "not a success envelope: {}", body);
    Ok(body["data"].clone())
}
