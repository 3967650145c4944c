use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::company::COMPANY_COLUMNS;
use crate::database::models::job::{JOB_COLUMNS, JOB_FIELDS};
use crate::database::models::{Company, Job, JobDetail, JobFilter, JobNew};
use crate::database::query_builder::{assemble, query_as_with};
use crate::sql::{build_update, build_where, SparseFields, SqlFragment, WhereCriteria};

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a job. The company handle is taken as given; a missing company
    /// surfaces as a storage error.
    pub async fn create(&self, data: JobNew) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(&self.pool)
            .await?;

        info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs matching `filter`, ordered by title
    pub async fn find_all(&self, filter: Option<&JobFilter>) -> Result<Vec<Job>, DatabaseError> {
        let SqlFragment { query: where_sql, params } = match filter {
            Some(f) if !f.is_empty() => build_where(f),
            _ => SqlFragment::empty(),
        };

        let select = format!("SELECT {} FROM jobs", JOB_COLUMNS);
        let sql = assemble(&[&select, &where_sql, "ORDER BY title"]);
        let jobs = query_as_with::<Job>(&sql, params)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    /// One job with the company that posted it
    pub async fn get(&self, id: i32) -> Result<JobDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))?;

        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_COLUMNS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&job.company_handle)
            .fetch_one(&self.pool)
            .await?;

        Ok(JobDetail { job, company })
    }

    /// Apply a partial update; id and company cannot change
    pub async fn update(&self, id: i32, fields: SparseFields) -> Result<Job, DatabaseError> {
        let SqlFragment { query: set_cols, params } = build_update(fields, &JOB_FIELDS)?;
        let id_idx = params.len() + 1;

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set_cols, id_idx, JOB_COLUMNS
        );
        query_as_with::<Job>(&sql, params)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove(&self, id: i32) -> Result<(), DatabaseError> {
        let deleted = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match deleted {
            Some(_) => {
                info!("Removed job: {}", id);
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("No job: {}", id))),
        }
    }
}
