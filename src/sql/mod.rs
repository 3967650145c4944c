pub mod error;
pub mod field_map;
pub mod filter_where;
pub mod partial_update;
pub mod types;

pub use error::SqlError;
pub use field_map::FieldMap;
pub use filter_where::{build_where, Condition, FilterOp, WhereCriteria};
pub use partial_update::build_update;
pub use types::{SparseFields, SqlFragment, SqlValue};
