use rust_decimal::Decimal;

/// A value bound to a positional parameter.
///
/// Every variant carries an `Option` so that SQL `NULL` is still sent with the
/// column's type rather than as untyped text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(Option<bool>),
    Int(Option<i32>),
    Text(Option<String>),
    Decimal(Option<Decimal>),
}

macro_rules! sql_value_from {
    ($ty:ty => $variant:ident) => {
        impl From<$ty> for SqlValue {
            fn from(v: $ty) -> Self {
                SqlValue::$variant(Some(v))
            }
        }

        impl From<Option<$ty>> for SqlValue {
            fn from(v: Option<$ty>) -> Self {
                SqlValue::$variant(v)
            }
        }
    };
}

sql_value_from!(bool => Bool);
sql_value_from!(i32 => Int);
sql_value_from!(String => Text);
sql_value_from!(Decimal => Decimal);

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

/// Generated SQL text plus the values for its `$n` placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub query: String,
    pub params: Vec<SqlValue>,
}

impl SqlFragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}

/// Insertion-ordered map of logical field name to new value.
///
/// Setting a field that is already present replaces its value but keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseFields {
    entries: Vec<(String, SqlValue)>,
}

impl SparseFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.entries.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for SparseFields {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for SparseFields
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = SparseFields::new();
        for (k, v) in iter {
            fields.set(k, v);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let fields = SparseFields::new()
            .with("zeta", 1)
            .with("alpha", "a")
            .with("mid", true);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn overwrite_keeps_position() {
        let fields = SparseFields::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(fields.get("a"), Some(&SqlValue::Int(Some(3))));
    }

    #[test]
    fn typed_nulls() {
        let v: SqlValue = Option::<i32>::None.into();
        assert_eq!(v, SqlValue::Int(None));
        assert_eq!(SqlValue::from(Option::<String>::None), SqlValue::Text(None));
    }
}
