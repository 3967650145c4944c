use super::error::SqlError;
use super::field_map::{quote_identifier, FieldMap};
use super::types::{SparseFields, SqlFragment, SqlValue};

/// Build the `SET` list of a partial update.
///
/// Each field becomes `"<column>"=$n` with `n` counting from 1 in the order the
/// fields were inserted; the returned params line up with those positions.
/// Column names come from `field_map`, falling back to the field name itself.
/// Values are only ever bound, never written into the SQL text.
///
/// ```
/// use jobly::sql::{build_update, FieldMap, SparseFields};
///
/// static MAP: FieldMap = FieldMap::new(&[("logoUrl", "logo_url")]);
/// let fields = SparseFields::new().with("name", "Acme").with("logoUrl", "http://a.png");
/// let sql = build_update(fields, &MAP).unwrap();
/// assert_eq!(sql.query, r#""name"=$1, "logo_url"=$2"#);
/// assert_eq!(sql.params.len(), 2);
/// ```
pub fn build_update(fields: SparseFields, field_map: &FieldMap) -> Result<SqlFragment, SqlError> {
    if fields.is_empty() {
        return Err(SqlError::EmptyInput);
    }

    let (columns, params) = fields.into_iter().enumerate().fold(
        (Vec::new(), Vec::<SqlValue>::new()),
        |(mut columns, mut params), (idx, (field, value))| {
            let column = quote_identifier(field_map.resolve(&field));
            columns.push(format!("{}=${}", column, idx + 1));
            params.push(value);
            (columns, params)
        },
    );

    Ok(SqlFragment { query: columns.join(", "), params })
}
