use crate::{
    models::{change_kind::ChangeKind, query::{Filter, Query}, row_event::RowEvent, traits::table_row::TableRow},
    utils::constants::DEFAULT_LIVE_TABLE_LIMIT,
};

/// Parameters of one live table. Any change to them means a fresh query and
/// subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTableConfig {
    pub table: String,
    pub columns: String,
    pub order_column: String,
    pub descending: bool,
    pub limit: usize,
    /// `None` accepts every row.
    pub filter: Option<Filter>,
    pub events: Vec<ChangeKind>,
}

impl LiveTableConfig {
    pub fn for_row<R: TableRow>() -> Self {
        Self {
            table: R::TABLE.to_string(),
            columns: R::COLUMNS.to_string(),
            order_column: R::ORDER_COLUMN.to_string(),
            descending: true,
            limit: DEFAULT_LIVE_TABLE_LIMIT,
            filter: None,
            events: vec![ChangeKind::Insert],
        }
    }

    pub fn initial_query(&self) -> Query {
        Query::from_table(&self.table)
            .select(&self.columns)
            .filter(self.filter.as_ref())
            .order(&self.order_column, !self.descending)
            .limit(self.limit)
    }

    /// Whether a pushed event belongs in this table's list.
    pub fn accepts(&self, event: &RowEvent) -> bool {
        event.table == self.table
            && self.events.contains(&event.kind)
            && self
                .filter
                .as_ref()
                .map_or(true, |filter| filter.matches(&event.record))
    }
}
