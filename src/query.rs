//! List-endpoint query building.
//!
//! Translates raw query-string parameters into a typed, allow-listed store
//! query: equality/comparison filters, multi-key sort, field selection and
//! pagination. Used identically by the author and book collections; each
//! collection supplies its own [`FieldSchema`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Reserved parameter names, extracted before filters are built.
const RESERVED_PARAMS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Comparison operators accepted in `field[op]=value` filter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl ComparisonOp {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(ComparisonOp::Gt),
            "gte" => Some(ComparisonOp::Gte),
            "lt" => Some(ComparisonOp::Lt),
            "lte" => Some(ComparisonOp::Lte),
            "in" => Some(ComparisonOp::In),
            _ => None,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            // rendered as `col = ANY($n)` in where_clause
            ComparisonOp::In => "= ANY",
        }
    }
}

/// Value type a filterable field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Timestamp,
    Uuid,
}

/// One filterable/sortable field: its public parameter name and the SQL
/// column it maps to (qualified when the collection query uses a join).
pub struct FieldSpec {
    pub param: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

/// Per-collection allow-list of filterable/sortable/selectable fields.
pub struct FieldSchema {
    pub fields: &'static [FieldSpec],
}

impl FieldSchema {
    fn lookup(&self, param: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.param == param)
    }
}

/// A value ready to be bound into a store query.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    TextList(Vec<String>),
    DateList(Vec<NaiveDate>),
    TimestampList(Vec<DateTime<Utc>>),
    UuidList(Vec<Uuid>),
}

fn parse_scalar(kind: FieldKind, field: &str, raw: &str) -> AppResult<BindValue> {
    let invalid = || {
        AppError::Validation(format!(
            "Invalid filter value for field '{}': {}",
            field, raw
        ))
    };

    match kind {
        FieldKind::Text => Ok(BindValue::Text(raw.to_string())),
        FieldKind::Date => raw
            .parse::<NaiveDate>()
            .map(BindValue::Date)
            .map_err(|_| invalid()),
        FieldKind::Timestamp => raw
            .parse::<DateTime<Utc>>()
            .map(BindValue::Timestamp)
            .or_else(|_| {
                // Bare dates are accepted for timestamp fields (midnight UTC)
                raw.parse::<NaiveDate>()
                    .map(|d| BindValue::Timestamp(d.and_hms_opt(0, 0, 0).unwrap().and_utc()))
            })
            .map_err(|_| invalid()),
        FieldKind::Uuid => raw
            .parse::<Uuid>()
            .map(BindValue::Uuid)
            .map_err(|_| invalid()),
    }
}

fn parse_list(kind: FieldKind, field: &str, raw: &str) -> AppResult<BindValue> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let mut scalars = Vec::with_capacity(parts.len());
    for part in parts {
        scalars.push(parse_scalar(kind, field, part)?);
    }

    Ok(match kind {
        FieldKind::Text => BindValue::TextList(
            scalars
                .into_iter()
                .map(|v| match v {
                    BindValue::Text(s) => s,
                    _ => unreachable!(),
                })
                .collect(),
        ),
        FieldKind::Date => BindValue::DateList(
            scalars
                .into_iter()
                .map(|v| match v {
                    BindValue::Date(d) => d,
                    _ => unreachable!(),
                })
                .collect(),
        ),
        FieldKind::Timestamp => BindValue::TimestampList(
            scalars
                .into_iter()
                .map(|v| match v {
                    BindValue::Timestamp(t) => t,
                    _ => unreachable!(),
                })
                .collect(),
        ),
        FieldKind::Uuid => BindValue::UuidList(
            scalars
                .into_iter()
                .map(|v| match v {
                    BindValue::Uuid(u) => u,
                    _ => unreachable!(),
                })
                .collect(),
        ),
    })
}

/// A single filter term against one column.
#[derive(Debug)]
pub struct Filter {
    pub column: &'static str,
    pub op: ComparisonOp,
    pub value: BindValue,
}

/// One sort key, in listed order.
#[derive(Debug, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub descending: bool,
}

/// Parsed list query: filters, selection, sort and page window.
#[derive(Debug)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub limit: i64,
}

impl ListQuery {
    /// Build a query from raw request parameters against a field schema.
    ///
    /// Reserved keys (`select`, `sort`, `page`, `limit`) are removed first;
    /// every remaining key must name an allow-listed field, either bare
    /// (equality) or as `field[op]` with a known comparison operator.
    pub fn from_params(params: &HashMap<String, String>, schema: &FieldSchema) -> AppResult<Self> {
        let mut filters = Vec::new();

        for (key, raw) in params {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }

            let (field, op) = match (key.find('['), key.ends_with(']')) {
                (Some(open), true) => {
                    let token = &key[open + 1..key.len() - 1];
                    let op = ComparisonOp::from_token(token).ok_or_else(|| {
                        AppError::Validation(format!("Unknown filter operator: {}", token))
                    })?;
                    (&key[..open], op)
                }
                _ => (key.as_str(), ComparisonOp::Eq),
            };

            let spec = schema.lookup(field).ok_or_else(|| {
                AppError::Validation(format!("Cannot filter on unknown field: {}", field))
            })?;

            let value = match op {
                ComparisonOp::In => parse_list(spec.kind, field, raw)?,
                _ => parse_scalar(spec.kind, field, raw)?,
            };

            filters.push(Filter {
                column: spec.column,
                op,
                value,
            });
        }

        let select = match params.get("select") {
            Some(raw) => {
                let mut fields = Vec::new();
                for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if schema.lookup(name).is_none() {
                        return Err(AppError::Validation(format!(
                            "Cannot select unknown field: {}",
                            name
                        )));
                    }
                    fields.push(name.to_string());
                }
                Some(fields)
            }
            None => None,
        };

        let sort = match params.get("sort") {
            Some(raw) => {
                let mut keys = Vec::new();
                for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let (name, descending) = match entry.strip_prefix('-') {
                        Some(rest) => (rest, true),
                        None => (entry, false),
                    };
                    let spec = schema.lookup(name).ok_or_else(|| {
                        AppError::Validation(format!("Cannot sort on unknown field: {}", name))
                    })?;
                    keys.push(SortKey {
                        column: spec.column,
                        descending,
                    });
                }
                keys
            }
            None => Vec::new(),
        };

        let sort = if sort.is_empty() {
            // Default sort: newest first
            let created = schema
                .lookup("createdAt")
                .ok_or_else(|| AppError::Internal("schema has no createdAt field".to_string()))?;
            vec![SortKey {
                column: created.column,
                descending: true,
            }]
        } else {
            sort
        };

        let page = coerce_positive(params.get("page"), DEFAULT_PAGE);
        let limit = coerce_positive(params.get("limit"), DEFAULT_LIMIT);

        Ok(Self {
            filters,
            select,
            sort,
            page,
            limit,
        })
    }

    /// Render the WHERE clause with positional binds starting at `$1`.
    /// Returns an empty string when no filters apply.
    pub fn where_clause(&self) -> String {
        if self.filters.is_empty() {
            return String::new();
        }

        let conditions: Vec<String> = self
            .filters
            .iter()
            .enumerate()
            .map(|(i, f)| match f.op {
                ComparisonOp::In => format!("{} = ANY(${})", f.column, i + 1),
                _ => format!("{} {} ${}", f.column, f.op.sql(), i + 1),
            })
            .collect();

        format!("WHERE {}", conditions.join(" AND "))
    }

    /// Render the ORDER BY clause from the sort keys.
    pub fn order_by(&self) -> String {
        let keys: Vec<String> = self
            .sort
            .iter()
            .map(|k| {
                if k.descending {
                    format!("{} DESC", k.column)
                } else {
                    format!("{} ASC", k.column)
                }
            })
            .collect();
        format!("ORDER BY {}", keys.join(", "))
    }

    pub fn offset(&self) -> i64 {
        // saturating: page and limit are only bounded below, and a crafted
        // i64::MAX page must not overflow into a negative OFFSET
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Restrict serialized records to the selected fields plus `id`.
    /// No-op when `select` was not given.
    pub fn apply_select(&self, items: Vec<Value>) -> Vec<Value> {
        let Some(ref fields) = self.select else {
            return items;
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Value::Object(
                    map.into_iter()
                        .filter(|(key, _)| key == "id" || fields.iter().any(|f| f == key))
                        .collect(),
                ),
                other => other,
            })
            .collect()
    }
}

fn coerce_positive(raw: Option<&String>, default: i64) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// Link to an adjacent page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageLink {
    pub page: i64,
    pub limit: i64,
}

/// Pagination block of the list envelope. Absent directions are omitted
/// from the JSON, matching the API contract.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

/// Compute next/prev links: `next` exists iff records remain beyond the
/// current page, `prev` iff the page is past the first.
pub fn build_pagination(page: i64, limit: i64, total: i64) -> Pagination {
    Pagination {
        next: (page.saturating_mul(limit) < total).then(|| PageLink {
            page: page.saturating_add(1),
            limit,
        }),
        prev: (page > 1).then(|| PageLink {
            page: page - 1,
            limit,
        }),
    }
}

/// One page of serialized records plus its pagination links.
pub struct Page {
    pub items: Vec<Value>,
    pub pagination: Pagination,
}
