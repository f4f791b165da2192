use super::error::InvalidFilterError;
use super::types::{
    DEFAULT_LIMIT, DEFAULT_OFFSET, MAX_LIMIT, Pagination, QuerySpec, SearchParams,
    SortDirection,
};
use crate::index::schema::{FieldKind, IndexDescriptor, SchemaError};

/// Field the tracks index is filtered on.
pub const GENRE_FIELD: &str = "GenreId";
/// Field results are ordered by.
pub const ORDER_FIELD: &str = "TrackId";

/// A validated filter request, ready to be turned into a `QuerySpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRequest {
    pub filter: i64,
    pub pagination: Pagination,
    pub direction: Option<SortDirection>,
}

impl FilterRequest {
    pub fn parse(params: &SearchParams) -> Result<Self, InvalidFilterError> {
        let filter = parse_filter(params.genre_id.as_deref())?;
        let offset = parse_count("offset", params.offset.as_deref(), DEFAULT_OFFSET)?;
        let limit = parse_count("limit", params.limit.as_deref(), DEFAULT_LIMIT)?;
        let direction = match params.direction.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                SortDirection::parse(raw)
                    .ok_or_else(|| InvalidFilterError::Direction(raw.to_string()))?,
            ),
        };

        Ok(Self {
            filter,
            pagination: Pagination::new(offset, limit),
            direction,
        })
    }
}

/// Parses the filter value. Missing, blank and non-integer values are rejected.
pub fn parse_filter(raw: Option<&str>) -> Result<i64, InvalidFilterError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(InvalidFilterError::Missing);
    }
    raw.parse::<i64>()
        .map_err(|_| InvalidFilterError::NotAnInteger(raw.to_string()))
}

fn parse_count(
    name: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, InvalidFilterError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| InvalidFilterError::Pagination {
                name,
                value: value.to_string(),
            }),
    }
}

/// Builds range queries on one numeric field of an index.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    filter_field: String,
    sort_field: String,
    default_direction: SortDirection,
}

impl QueryBuilder {
    /// Binds the builder to `descriptor`. The filter field must be numeric and
    /// the sort field must exist.
    pub fn new(
        descriptor: &IndexDescriptor,
        filter_field: &str,
        sort_field: &str,
    ) -> Result<Self, SchemaError> {
        let filter = descriptor
            .get_field(filter_field)
            .ok_or_else(|| SchemaError::UnknownField(filter_field.to_string()))?;
        if filter.kind != FieldKind::Numeric {
            return Err(SchemaError::WrongKind {
                field: filter_field.to_string(),
                expected: FieldKind::Numeric,
            });
        }
        descriptor
            .get_field(sort_field)
            .ok_or_else(|| SchemaError::UnknownField(sort_field.to_string()))?;

        Ok(Self {
            filter_field: filter_field.to_string(),
            sort_field: sort_field.to_string(),
            default_direction: SortDirection::Desc,
        })
    }

    /// Genre filter, newest track first.
    pub fn for_tracks(descriptor: &IndexDescriptor) -> Result<Self, SchemaError> {
        Self::new(descriptor, GENRE_FIELD, ORDER_FIELD)
    }

    /// Exact-value query `[filter, filter]` in the default direction.
    pub fn build(&self, filter: i64, pagination: Pagination) -> QuerySpec {
        self.build_with_direction(filter, pagination, self.default_direction)
    }

    /// Like `build`, with an explicit direction. The limit is clamped into
    /// `1..=MAX_LIMIT` whatever window the caller passes.
    pub fn build_with_direction(
        &self,
        filter: i64,
        pagination: Pagination,
        direction: SortDirection,
    ) -> QuerySpec {
        QuerySpec {
            field: self.filter_field.clone(),
            range_low: filter,
            range_high: filter,
            sort_field: self.sort_field.clone(),
            sort_direction: direction,
            offset: pagination.offset,
            limit: pagination.limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn build_request(&self, request: &FilterRequest) -> QuerySpec {
        self.build_with_direction(
            request.filter,
            request.pagination,
            request.direction.unwrap_or(self.default_direction),
        )
    }
}
