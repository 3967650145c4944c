/// Static mapping from logical (API) field names to physical column names.
///
/// Only names that differ need an entry; anything else resolves to itself.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    pub fn resolve<'a>(&self, logical: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(from, _)| *from == logical)
            .map(|(_, to)| *to)
            .unwrap_or(logical)
    }
}

/// Quote an identifier for Postgres, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
