use std::fmt::Display;

/// Builder for PostgREST query strings: `select=`, `col=eq.value`, `order=`
/// and `limit=`.
///
/// Parameters are emitted in a fixed order (select, filters in insertion
/// order, order, limit) so generated URLs are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project the given columns.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select = Some(
            columns
                .iter()
                .map(|c| urlencoding::encode(c).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        );
        self
    }

    /// Project every column (`select=*`).
    pub fn select_all(mut self) -> Self {
        self.select = Some("*".to_string());
        self
    }

    /// Equality filter, e.g. `confermato=eq.true`.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Ascending order on `column`.
    pub fn order(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.select.is_none()
            && self.filters.is_empty()
            && self.order.is_none()
            && self.limit.is_none()
    }

    /// Render without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(ref s) = self.select {
            params.push(format!("select={s}"));
        }
        for (column, op) in &self.filters {
            params.push(format!(
                "{}={}",
                urlencoding::encode(column),
                urlencoding::encode(op)
            ));
        }
        if let Some(ref o) = self.order {
            params.push(format!("order={}", urlencoding::encode(o)));
        }
        if let Some(l) = self.limit {
            params.push(format!("limit={l}"));
        }
        params.join("&")
    }
}
