use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{double_option, is_web_url};
use crate::sql::{Condition, FieldMap, SparseFields, WhereCriteria};
use crate::validation::{within_len, FieldErrors, Validate};

pub const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

pub static COMPANY_FIELDS: FieldMap = FieldMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A job as listed under its company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyNew {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Validate for CompanyNew {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check(within_len(&self.handle, 1, 25), "handle", "must be 1-25 characters")
            .check(
                self.handle.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'),
                "handle",
                "must be lowercase letters, digits, '-' or '_'",
            )
            .check(!self.name.trim().is_empty(), "name", "must not be empty")
            .check(self.num_employees.map_or(true, |n| n >= 0), "numEmployees", "must be >= 0")
            .check(self.logo_url.as_deref().map_or(true, is_web_url), "logoUrl", "must be an http(s) URL");
        errors.into_result()
    }
}

/// Fields an admin may change on a company; the handle is fixed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyUpdate {
    pub fn into_fields(self) -> SparseFields {
        let mut fields = SparseFields::new();
        if let Some(v) = self.name {
            fields.set("name", v);
        }
        if let Some(v) = self.description {
            fields.set("description", v);
        }
        if let Some(v) = self.num_employees {
            fields.set("numEmployees", v);
        }
        if let Some(v) = self.logo_url {
            fields.set("logoUrl", v);
        }
        fields
    }
}

impl Validate for CompanyUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check(self.name.as_deref().map_or(true, |n| !n.trim().is_empty()), "name", "must not be empty")
            .check(
                self.num_employees.flatten().map_or(true, |n| n >= 0),
                "numEmployees",
                "must be >= 0",
            )
            .check(
                self.logo_url.as_ref().and_then(|u| u.as_deref()).map_or(true, is_web_url),
                "logoUrl",
                "must be an http(s) URL",
            );
        errors.into_result()
    }
}

/// Query-string filters for `GET /companies`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl WhereCriteria for CompanyFilter {
    fn conditions(&self) -> Vec<Option<Condition>> {
        vec![
            self.name.as_ref().map(|n| Condition::contains("name", n.as_str())),
            self.min_employees
                .map(|n| Condition::gte(COMPANY_FIELDS.resolve("numEmployees"), n)),
            self.max_employees
                .map(|n| Condition::lte(COMPANY_FIELDS.resolve("numEmployees"), n)),
        ]
    }
}

impl Validate for CompanyFilter {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            errors.check(min <= max, "minEmployees", "cannot be greater than maxEmployees");
        }
        errors.into_result()
    }
}
