use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::company::{COMPANY_COLUMNS, COMPANY_FIELDS};
use crate::database::models::{Company, CompanyDetail, CompanyFilter, CompanyJob, CompanyNew};
use crate::database::query_builder::{assemble, query_as_with};
use crate::sql::{build_update, build_where, SparseFields, SqlFragment, WhereCriteria};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a company; an existing handle is a conflict
    pub async fn create(&self, data: CompanyNew) -> Result<Company, DatabaseError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Conflict(format!("Duplicate company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = COMPANY_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from)
            .map_err(|e| {
                if e.is_unique_violation() {
                    DatabaseError::Conflict(format!("Duplicate company: {}", data.handle))
                } else {
                    e
                }
            })?;

        info!("Created company: {}", company.handle);
        Ok(company)
    }

    /// All companies matching `filter`, ordered by name
    pub async fn find_all(&self, filter: Option<&CompanyFilter>) -> Result<Vec<Company>, DatabaseError> {
        let SqlFragment { query: where_sql, params } = match filter {
            Some(f) if !f.is_empty() => build_where(f),
            _ => SqlFragment::empty(),
        };

        let select = format!("SELECT {} FROM companies", COMPANY_COLUMNS);
        let sql = assemble(&[&select, &where_sql, "ORDER BY name"]);
        let companies = query_as_with::<Company>(&sql, params)
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    /// One company with its jobs
    pub async fn get(&self, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_COLUMNS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))?;

        let jobs = sqlx::query_as::<_, CompanyJob>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(&self.pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update; the handle itself cannot change
    pub async fn update(&self, handle: &str, fields: SparseFields) -> Result<Company, DatabaseError> {
        let SqlFragment { query: set_cols, params } = build_update(fields, &COMPANY_FIELDS)?;
        let handle_idx = params.len() + 1;

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set_cols, handle_idx, COMPANY_COLUMNS
        );
        query_as_with::<Company>(&sql, params)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove(&self, handle: &str) -> Result<(), DatabaseError> {
        let deleted = sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?;

        match deleted {
            Some(_) => {
                info!("Removed company: {}", handle);
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("No company: {}", handle))),
        }
    }
}
