use crate::{
    data_sources::backend::Backend,
    models::{
        change_kind::ChangeKind,
        live_table::{live_table::LiveTable, live_table_config::LiveTableConfig},
        message_payloads::rows_changed_payload::RowsChangedPayload,
        query::Filter,
        traits::table_row::TableRow,
    },
};
use actix::Recipient;
use anyhow::{anyhow, Result};

pub struct LiveTableBuilder<R: TableRow> {
    pub backend: Option<Backend>,
    pub config: LiveTableConfig,
    pub observers: Vec<Recipient<RowsChangedPayload<R>>>,
}

impl<R: TableRow> LiveTableBuilder<R> {
    pub fn new() -> Self {
        LiveTableBuilder {
            backend: None,
            config: LiveTableConfig::for_row::<R>(),
            observers: vec![],
        }
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = limit;
        self
    }

    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn events(mut self, events: &[ChangeKind]) -> Self {
        self.config.events = events.to_vec();
        self
    }

    pub fn observer(mut self, observer: Recipient<RowsChangedPayload<R>>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<LiveTable<R>> {
        let backend = self
            .backend
            .ok_or(anyhow!("Backend is required to build LiveTable."))?;

        if self.config.limit == 0 {
            return Err(anyhow!("LiveTable limit must be at least 1."));
        }

        if self.config.events.is_empty() {
            return Err(anyhow!("LiveTable needs at least one change kind to listen for."));
        }

        let mut table = LiveTable::new(backend, self.config);
        table.observers = self.observers;

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_sources::dummy::dummy_backend::DummyBackend,
        models::rows::trade_row::TradeRow,
    };

    #[test]
    fn requires_a_backend() {
        let err = LiveTableBuilder::<TradeRow>::new().limit(20).build().err().unwrap();
        assert_eq!(err.to_string(), "Backend is required to build LiveTable.");
    }

    #[test]
    fn rejects_zero_limit() {
        let built = LiveTableBuilder::<TradeRow>::new()
            .backend(Backend::Dummy(DummyBackend::new()))
            .limit(0)
            .build();
        assert!(built.is_err());
    }

    #[test]
    fn carries_configuration_into_the_table() {
        let table = LiveTableBuilder::<TradeRow>::new()
            .backend(Backend::Dummy(DummyBackend::new()))
            .limit(20)
            .filter(Some(Filter::eq("agent", "crypto")))
            .build()
            .unwrap();

        assert_eq!(table.config.table, "trades");
        assert_eq!(table.config.limit, 20);
        assert!(table.loading);
        assert!(table.rows.is_empty());
    }
}
