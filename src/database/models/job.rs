use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::company::Company;
use super::double_option;
use crate::sql::{Condition, FieldMap, SparseFields, WhereCriteria};
use crate::validation::{FieldErrors, Validate};

pub const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

pub static JOB_FIELDS: FieldMap = FieldMap::new(&[("companyHandle", "company_handle")]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub company: Company,
}

fn equity_in_range(equity: Option<Decimal>) -> bool {
    equity.map_or(true, |e| e >= Decimal::ZERO && e <= Decimal::ONE)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobNew {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Validate for JobNew {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check(!self.title.trim().is_empty(), "title", "must not be empty")
            .check(self.salary.map_or(true, |s| s >= 0), "salary", "must be >= 0")
            .check(equity_in_range(self.equity), "equity", "must be between 0 and 1")
            .check(!self.company_handle.is_empty(), "companyHandle", "must not be empty");
        errors.into_result()
    }
}

/// Fields an admin may change on a job; id and company are fixed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<Decimal>>,
}

impl JobUpdate {
    pub fn into_fields(self) -> SparseFields {
        let mut fields = SparseFields::new();
        if let Some(v) = self.title {
            fields.set("title", v);
        }
        if let Some(v) = self.salary {
            fields.set("salary", v);
        }
        if let Some(v) = self.equity {
            fields.set("equity", v);
        }
        fields
    }
}

impl Validate for JobUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check(self.title.as_deref().map_or(true, |t| !t.trim().is_empty()), "title", "must not be empty")
            .check(self.salary.flatten().map_or(true, |s| s >= 0), "salary", "must be >= 0")
            .check(equity_in_range(self.equity.flatten()), "equity", "must be between 0 and 1");
        errors.into_result()
    }
}

/// Query-string filters for `GET /jobs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
    pub company_handle: Option<String>,
}

impl WhereCriteria for JobFilter {
    fn conditions(&self) -> Vec<Option<Condition>> {
        vec![
            self.min_salary.map(|s| Condition::gte("salary", s)),
            (self.has_equity == Some(true)).then(|| Condition::positive("equity")),
            self.title.as_ref().map(|t| Condition::contains("title", t.as_str())),
            self.company_handle
                .as_ref()
                .map(|h| Condition::contains(JOB_FIELDS.resolve("companyHandle"), h.as_str())),
        ]
    }
}

impl Validate for JobFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(self.min_salary.map_or(true, |s| s >= 0), "minSalary", "must be >= 0");
        errors.into_result()
    }
}
