use rusqlite::types::Value;

use crate::models::Page;

/// Song attributes a listing may be filtered on. Only these map to column
/// names, so request input never reaches the SQL text as an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongFilter {
    Group(String),
    Title(String),
}

impl SongFilter {
    pub fn column(&self) -> &'static str {
        match self {
            SongFilter::Group(_) => "group_name",
            SongFilter::Title(_) => "song_name",
        }
    }

    fn value(&self) -> &str {
        match self {
            SongFilter::Group(v) | SongFilter::Title(v) => v,
        }
    }
}

/// Equality filters combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilters(Vec<SongFilter>);

impl SongFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: SongFilter) -> Self {
        self.0.push(filter);
        self
    }

    /// Add `filter` built from the trimmed `value` unless the value is missing
    /// or blank. Stored names are trimmed on insert, so filters match them.
    pub fn with_opt(self, value: Option<String>, filter: fn(String) -> SongFilter) -> Self {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => self.with(filter(v.to_string())),
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SongFilter> {
        self.0.iter()
    }
}

/// A SELECT statement plus the values for its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SongQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Build the filtered, paginated song listing. LIMIT and OFFSET always take
/// the last two parameter slots.
pub fn select_songs(filters: &SongFilters, page: Page) -> SongQuery {
    let mut sql =
        String::from("SELECT id, group_name, song_name, release_date, text, link FROM songs");
    let mut params = Vec::new();

    for (i, filter) in filters.iter().enumerate() {
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        params.push(Value::Text(filter.value().to_string()));
        sql.push_str(&format!("{} = ?{}", filter.column(), params.len()));
    }

    let limit_slot = params.len() + 1;
    sql.push_str(&format!(
        " ORDER BY id LIMIT ?{} OFFSET ?{}",
        limit_slot,
        limit_slot + 1
    ));
    params.push(Value::Integer(i64::from(page.limit)));
    params.push(Value::Integer(i64::from(page.offset)));

    SongQuery { sql, params }
}
