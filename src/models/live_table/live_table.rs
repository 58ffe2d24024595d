use crate::{
    data_sources::backend::Backend,
    models::{
        dashboard_error::DashboardError,
        live_table::live_table_config::LiveTableConfig,
        message_payloads::{
            get_rows_payload::GetRowsPayload, observe_rows_payload::ObserveRowsPayload,
            reconfigure_payload::ReconfigurePayload, rows_changed_payload::RowsChangedPayload,
            stop_payload::StopPayload,
        },
        row_event::RowEvent,
        traits::table_row::TableRow,
    },
};
use actix::{
    Actor, ActorContext, ActorFutureExt, AsyncContext, Context, Handler, MessageResult, Recipient,
    SpawnHandle, StreamHandler, WrapFuture,
};
use tracing::{debug, warn};

/// View model over one backend table: an initial page of rows kept fresh by
/// prepending pushed change events and truncating to the configured limit.
///
/// The actor owns its subscription. Stopping it, or reconfiguring it, drops
/// the subscription and nothing it would still have delivered is applied.
pub struct LiveTable<R: TableRow> {
    pub backend: Backend,
    pub config: LiveTableConfig,
    pub rows: Vec<R>,
    pub error: Option<String>,
    pub loading: bool,
    pub observers: Vec<Recipient<RowsChangedPayload<R>>>,
    handles: Vec<SpawnHandle>,
    generation: u64,
}

impl<R: TableRow> LiveTable<R> {
    pub fn new(backend: Backend, config: LiveTableConfig) -> Self {
        Self {
            backend,
            config,
            rows: vec![],
            error: None,
            loading: true,
            observers: vec![],
            handles: vec![],
            generation: 0,
        }
    }

    pub fn snapshot(&self) -> RowsChangedPayload<R> {
        RowsChangedPayload {
            rows: self.rows.clone(),
            error: self.error.clone(),
            loading: self.loading,
        }
    }

    /// Merges one pushed event. Returns whether the list changed.
    pub fn apply_event(&mut self, event: RowEvent) -> bool {
        if !self.config.accepts(&event) {
            return false;
        }

        match serde_json::from_value::<R>(event.record) {
            Ok(row) => {
                self.rows.insert(0, row);
                self.rows.truncate(self.config.limit);
                true
            }
            Err(e) => {
                warn!(table = %self.config.table, error = %e, "discarding undecodable row event");
                false
            }
        }
    }

    fn notify(&mut self) {
        self.observers.retain(|observer| observer.connected());

        for observer in self.observers.iter() {
            observer.do_send(self.snapshot());
        }
    }

    fn activate(&mut self, ctx: &mut Context<Self>) {
        self.generation += 1;
        let generation = self.generation;

        let backend = self.backend.clone();
        let query = self.config.initial_query();
        let initial = async move { backend.select_rows::<R>(&query).await }
            .into_actor(self)
            .map(move |res, act, _ctx| {
                if act.generation != generation {
                    return;
                }

                act.loading = false;
                match res {
                    Ok(rows) => {
                        debug!(table = %act.config.table, rows = rows.len(), "initial rows loaded");
                        act.rows = rows;
                    }
                    Err(e) => {
                        warn!(table = %act.config.table, error = %e, "initial query failed");
                        act.error = Some(e.to_string());
                    }
                }
                act.notify();
            });
        self.handles.push(ctx.spawn(initial));

        let backend = self.backend.clone();
        let table = self.config.table.clone();
        let kinds = self.config.events.clone();
        let subscribe = async move { backend.subscribe(&table, &kinds).await }
            .into_actor(self)
            .map(move |res, act, ctx| {
                if act.generation != generation {
                    return;
                }

                match res {
                    Ok(subscription) => {
                        let handle = ctx.add_stream(subscription);
                        act.handles.push(handle);
                    }
                    Err(e) => {
                        warn!(table = %act.config.table, error = %e, "subscription failed");
                        act.error = Some(e.to_string());
                        act.notify();
                    }
                }
            });
        self.handles.push(ctx.spawn(subscribe));
    }

    fn deactivate(&mut self, ctx: &mut Context<Self>) {
        for handle in self.handles.drain(..) {
            ctx.cancel_future(handle);
        }
    }
}

impl<R: TableRow> Actor for LiveTable<R> {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!(table = %self.config.table, limit = self.config.limit, "live table started");
        self.activate(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        debug!(table = %self.config.table, "live table stopped");
    }
}

impl<R: TableRow> StreamHandler<RowEvent> for LiveTable<R> {
    fn handle(&mut self, event: RowEvent, _ctx: &mut Self::Context) {
        if self.apply_event(event) {
            self.notify();
        }
    }

    fn finished(&mut self, _ctx: &mut Self::Context) {
        // The feed ended on its own; keep the rows, surface the loss.
        let error = DashboardError::subscription(&self.config.table, "verbinding verbroken");
        warn!(table = %self.config.table, "subscription ended");
        self.error = Some(error.to_string());
        self.notify();
    }
}

impl<R: TableRow> Handler<ObserveRowsPayload<R>> for LiveTable<R> {
    type Result = ();

    fn handle(&mut self, msg: ObserveRowsPayload<R>, _ctx: &mut Self::Context) -> Self::Result {
        msg.observer.do_send(self.snapshot());
        self.observers.push(msg.observer);
    }
}

impl<R: TableRow> Handler<GetRowsPayload<R>> for LiveTable<R> {
    type Result = MessageResult<GetRowsPayload<R>>;

    fn handle(&mut self, _msg: GetRowsPayload<R>, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.snapshot())
    }
}

impl<R: TableRow> Handler<ReconfigurePayload> for LiveTable<R> {
    type Result = ();

    fn handle(&mut self, msg: ReconfigurePayload, ctx: &mut Self::Context) -> Self::Result {
        if msg.config == self.config {
            return;
        }

        self.deactivate(ctx);
        self.config = msg.config;
        self.rows.clear();
        self.error = None;
        self.loading = true;
        self.notify();
        self.activate(ctx);
    }
}

impl<R: TableRow> Handler<StopPayload> for LiveTable<R> {
    type Result = ();

    fn handle(&mut self, _msg: StopPayload, ctx: &mut Self::Context) -> Self::Result {
        self.deactivate(ctx);
        ctx.stop();
    }
}
