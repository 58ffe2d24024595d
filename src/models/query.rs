use crate::utils::serde_helpers::parse_ts;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self {
            column: column.to_string(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Self {
            column: column.to_string(),
            op: FilterOp::Gte,
            value: value.into(),
        }
    }

    /// Evaluates the filter against a raw row as it arrives from the backend.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(field) = record.get(&self.column) else {
            return false;
        };

        match self.op {
            FilterOp::Eq => compare_values(field, &self.value) == Some(Ordering::Equal),
            FilterOp::Gte => matches!(
                compare_values(field, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }

    pub fn to_param(&self) -> (String, String) {
        let op = match self.op {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
        };

        (self.column.clone(), format!("{}.{}", op, value_to_param(&self.value)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// One entry of a select list, `name` or `relation(col, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub name: String,
    pub nested: Option<Vec<String>>,
}

/// PostgREST-shaped read request: table, projection, filters, order, limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from_table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: vec![],
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.split_whitespace().collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::gte(column, value));
        self
    }

    pub fn filter(mut self, filter: Option<&Filter>) -> Self {
        if let Some(filter) = filter {
            self.filters.push(filter.clone());
        }
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Query string parameters in PostgREST syntax.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];

        for filter in self.filters.iter() {
            params.push(filter.to_param());
        }

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    pub fn projection(&self) -> Vec<Projection> {
        let mut items = vec![];
        let mut depth = 0;
        let mut current = String::new();

        for c in self.columns.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => {
                    items.push(std::mem::take(&mut current));
                    continue;
                }
                _ => {}
            }
            current.push(c);
        }
        items.push(current);

        items
            .into_iter()
            .filter(|item| !item.is_empty())
            .map(|item| match item.split_once('(') {
                Some((name, rest)) => Projection {
                    name: name.to_string(),
                    nested: Some(
                        rest.trim_end_matches(')')
                            .split(',')
                            .filter(|c| !c.is_empty())
                            .map(str::to_string)
                            .collect(),
                    ),
                },
                None => Projection {
                    name: item,
                    nested: None,
                },
            })
            .collect()
    }
}

pub fn value_to_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Orders two JSON scalars the way the database would: numbers numerically,
/// timestamps chronologically, other strings lexically.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_ts(x), parse_ts(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_postgrest_params() {
        let query = Query::from_table("signals")
            .select("ts, symbol,\n side")
            .eq("agent", "crypto")
            .order("ts", false)
            .limit(100);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "ts,symbol,side".to_string()),
                ("agent".to_string(), "eq.crypto".to_string()),
                ("order".to_string(), "ts.desc".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn parses_embedded_relations_in_projection() {
        let query = Query::from_table("backtest_runs")
            .select("run_id, created_at, backtest_metrics ( sharpe, trades_count )");

        let projection = query.projection();
        assert_eq!(projection.len(), 3);
        assert_eq!(projection[2].name, "backtest_metrics");
        assert_eq!(
            projection[2].nested,
            Some(vec!["sharpe".to_string(), "trades_count".to_string()])
        );
    }

    #[test]
    fn filters_compare_numbers_and_timestamps() {
        let row = json!({"id": 1, "ts": "2025-10-14T08:00:00.5Z", "agent": "crypto"});

        assert!(Filter::eq("id", 1).matches(&row));
        assert!(Filter::eq("agent", "crypto").matches(&row));
        assert!(!Filter::eq("agent", "stocks").matches(&row));
        assert!(Filter::gte("ts", "2025-10-14T07:59:59+00:00").matches(&row));
        assert!(!Filter::gte("ts", "2025-10-14T10:00:00+00:00").matches(&row));
        assert!(!Filter::eq("missing", 1).matches(&row));
    }
}
