use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortField {
    /// When the entry was added to the catalog.
    #[default]
    #[value(alias = "downloaded_at")]
    Date,
    Title,
    FileSize,
    UploadDate,
    Duration,
}

impl SortField {
    pub(crate) fn order_expr(self) -> &'static str {
        match self {
            SortField::Date => "added_at",
            // Same Unicode folding as search.
            SortField::Title => "fold(title)",
            SortField::FileSize => "file_size",
            SortField::UploadDate => "upload_date",
            SortField::Duration => "duration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Which text columns a search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Title, description and uploader.
    #[default]
    All,
    Title,
    Description,
    Uploader,
}

impl SearchField {
    /// `?1` is bound to the already lowercased needle.
    pub(crate) fn predicate(self) -> &'static str {
        match self {
            SearchField::All => {
                "(instr(fold(title), ?1) > 0 \
                  OR instr(fold(description), ?1) > 0 \
                  OR instr(fold(uploader), ?1) > 0)"
            }
            SearchField::Title => "instr(fold(title), ?1) > 0",
            SearchField::Description => "instr(fold(description), ?1) > 0",
            SearchField::Uploader => "instr(fold(uploader), ?1) > 0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub sort: SortField,
    pub order: SortOrder,
    /// `None` returns every entry.
    pub limit: Option<u64>,
    pub offset: u64,
}

impl ListQuery {
    pub fn sorted(sort: SortField, order: SortOrder) -> Self {
        Self {
            sort,
            order,
            ..Self::default()
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// `ORDER BY ... LIMIT ... OFFSET ...` tail shared by list and search.
    /// Ties on the sort key fall back to `id` so the order is total.
    pub(crate) fn tail_sql(&self, limit_param: usize) -> String {
        format!(
            "ORDER BY {} {}, id ASC LIMIT ?{} OFFSET ?{}",
            self.sort.order_expr(),
            self.order.keyword(),
            limit_param,
            limit_param + 1
        )
    }

    pub(crate) fn limit_value(&self) -> i64 {
        // SQLite treats a negative LIMIT as unbounded.
        self.limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }

    pub(crate) fn offset_value(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub field: SearchField,
    pub order_by: ListQuery,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            field: SearchField::All,
            order_by: ListQuery::default(),
        }
    }

    pub fn field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    pub fn order_by(mut self, order_by: ListQuery) -> Self {
        self.order_by = order_by;
        self
    }
}
