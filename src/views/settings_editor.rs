use crate::{
    data_sources::backend::Backend,
    models::{
        change_kind::ChangeKind,
        live_table::{live_table::LiveTable, live_table_builder::LiveTableBuilder},
        message_payloads::{
            edit_settings_payload::EditSettingsPayload, get_settings_payload::GetSettingsPayload,
            observe_settings_payload::ObserveSettingsPayload, rows_changed_payload::RowsChangedPayload,
            save_settings_payload::SaveSettingsPayload, settings_changed_payload::SettingsChangedPayload,
            stop_payload::StopPayload,
        },
        query::Filter,
        rows::settings_row::SettingsRow,
        traits::table_row::TableRow,
    },
    utils::constants::{SETTINGS_ID, STATUS_CLEAR_DELAY},
    views::settings_form::SettingsForm,
};
use actix::{
    Actor, ActorContext, ActorFutureExt, Addr, AsyncContext, Context, Handler, MessageResult,
    Recipient, WrapFuture,
};
use serde::Serialize;
use tracing::{info, warn};

pub const STATUS_SAVING: &str = "Opslaan…";
pub const STATUS_SAVED: &str = "Opgeslagen ✅";
pub const SAVE_BLOCKED: &str = "Instellingen niet geladen, opslaan is uitgeschakeld";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsEditorState {
    pub form: SettingsForm,
    /// False until the first load attempt has finished.
    pub loaded: bool,
    pub status: Option<String>,
    pub validation_error: Option<String>,
    pub load_error: Option<String>,
}

/// Read-modify-write editor for the singleton settings record.
///
/// The record is followed through a one-row live table, so every insert or
/// update that reaches the backend replaces the form wholesale. Unsaved
/// edits are lost when that happens. Saving is refused until a load has
/// succeeded, so a failed read never turns into a write of defaults.
pub struct SettingsEditor {
    backend: Backend,
    form: SettingsForm,
    loaded: bool,
    status: Option<String>,
    validation_error: Option<String>,
    load_error: Option<String>,
    last_row: Option<SettingsRow>,
    observers: Vec<Recipient<SettingsChangedPayload>>,
    record: Option<Addr<LiveTable<SettingsRow>>>,
}

impl SettingsEditor {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            form: SettingsForm::default(),
            loaded: false,
            status: None,
            validation_error: None,
            load_error: None,
            last_row: None,
            observers: vec![],
            record: None,
        }
    }

    pub fn state(&self) -> SettingsEditorState {
        SettingsEditorState {
            form: self.form.clone(),
            loaded: self.loaded,
            status: self.status.clone(),
            validation_error: self.validation_error.clone(),
            load_error: self.load_error.clone(),
        }
    }

    fn notify(&mut self) {
        self.observers.retain(|observer| observer.connected());

        for observer in self.observers.iter() {
            observer.do_send(SettingsChangedPayload { state: self.state() });
        }
    }
}

impl Actor for SettingsEditor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let record = LiveTableBuilder::<SettingsRow>::new()
            .backend(self.backend.clone())
            .limit(1)
            .filter(Some(Filter::eq("id", SETTINGS_ID)))
            .events(&[ChangeKind::Insert, ChangeKind::Update])
            .observer(ctx.address().recipient())
            .build();

        match record {
            Ok(record) => self.record = Some(record.start()),
            Err(e) => {
                warn!(error = %e, "unable to follow settings record");
                self.loaded = true;
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(record) = self.record.take() {
            record.do_send(StopPayload);
        }
    }
}

impl Handler<RowsChangedPayload<SettingsRow>> for SettingsEditor {
    type Result = ();

    fn handle(&mut self, msg: RowsChangedPayload<SettingsRow>, _ctx: &mut Self::Context) -> Self::Result {
        if msg.loading {
            return;
        }

        let first_load = !self.loaded;
        self.loaded = true;
        self.load_error = msg.error;

        match msg.rows.into_iter().next() {
            Some(row) if self.last_row.as_ref() != Some(&row) => {
                if !first_load {
                    info!("settings changed on the server, reloading form");
                }
                self.form = SettingsForm::from_row(&row);
                self.last_row = Some(row);
            }
            None if first_load => self.form = SettingsForm::default(),
            _ => {}
        }

        self.notify();
    }
}

impl Handler<EditSettingsPayload> for SettingsEditor {
    type Result = ();

    fn handle(&mut self, msg: EditSettingsPayload, _ctx: &mut Self::Context) -> Self::Result {
        self.form = msg.form;

        if self.validation_error.take().is_some() {
            self.notify();
        }
    }
}

impl Handler<SaveSettingsPayload> for SettingsEditor {
    type Result = ();

    fn handle(&mut self, msg: SaveSettingsPayload, ctx: &mut Self::Context) -> Self::Result {
        if let Some(form) = msg.form {
            self.form = form;
        }

        if !self.loaded || self.load_error.is_some() {
            warn!(load_error = ?self.load_error, "refusing to save settings that were never loaded");
            self.validation_error = Some(SAVE_BLOCKED.to_string());
            self.notify();
            return;
        }

        let row = match self.form.validate() {
            Ok(row) => row,
            Err(e) => {
                self.validation_error = Some(e.to_string());
                self.notify();
                return;
            }
        };

        let record = match serde_json::to_value(&row) {
            Ok(record) => record,
            Err(e) => {
                self.status = Some(format!("Fout: {}", e));
                self.notify();
                return;
            }
        };

        self.validation_error = None;
        self.status = Some(STATUS_SAVING.to_string());
        self.notify();

        let backend = self.backend.clone();
        let fut = async move { backend.upsert(SettingsRow::TABLE, &record).await }
            .into_actor(self)
            .map(|res, act, ctx| {
                act.status = Some(match res {
                    Ok(()) => STATUS_SAVED.to_string(),
                    Err(e) => {
                        warn!(error = %e, "saving settings failed");
                        format!("Fout: {}", e)
                    }
                });
                act.notify();

                ctx.run_later(STATUS_CLEAR_DELAY, |act, _ctx| {
                    act.status = None;
                    act.notify();
                });
            });

        ctx.spawn(fut);
    }
}

impl Handler<GetSettingsPayload> for SettingsEditor {
    type Result = MessageResult<GetSettingsPayload>;

    fn handle(&mut self, _msg: GetSettingsPayload, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.state())
    }
}

impl Handler<ObserveSettingsPayload> for SettingsEditor {
    type Result = ();

    fn handle(&mut self, msg: ObserveSettingsPayload, _ctx: &mut Self::Context) -> Self::Result {
        msg.observer.do_send(SettingsChangedPayload { state: self.state() });
        self.observers.push(msg.observer);
    }
}

impl Handler<StopPayload> for SettingsEditor {
    type Result = ();

    fn handle(&mut self, _msg: StopPayload, ctx: &mut Self::Context) -> Self::Result {
        ctx.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_sources::dummy::dummy_backend::DummyBackend,
        utils::test_helpers::{settle, wait_for},
    };
    use serde_json::json;
    use std::time::Duration;

    fn settings_record() -> serde_json::Value {
        json!({
            "id": 1,
            "fx_source": "manual",
            "fallback_usdt_eur": 0.93,
            "whitelist": ["BTCEUR"],
            "strategy_crypto": null,
            "strategy_stocks": null,
            "use_ai_crypto": true,
            "use_ai_stocks": false,
            "ai_conf_min": 0.6,
        })
    }

    async fn loaded_editor(dummy: &DummyBackend) -> Addr<SettingsEditor> {
        let addr = SettingsEditor::new(Backend::Dummy(dummy.clone())).start();

        let ready = wait_for(|| async {
            let state = addr.send(GetSettingsPayload).await.unwrap();
            (state.loaded && dummy.subscriber_count() == 1).then_some(())
        })
        .await;
        assert!(ready.is_some(), "settings never loaded");

        addr
    }

    async fn current(addr: &Addr<SettingsEditor>) -> SettingsEditorState {
        addr.send(GetSettingsPayload).await.unwrap()
    }

    #[actix::test]
    async fn loads_server_values_into_the_form() {
        let dummy = DummyBackend::new();
        dummy.insert("settings", settings_record());

        let addr = loaded_editor(&dummy).await;
        let state = current(&addr).await;

        assert_eq!(state.form.fallback_usdt_eur, "0.93");
        assert_eq!(state.form.whitelist, "BTCEUR");
        assert!(state.form.use_ai_crypto);
        assert_eq!(state.form.strategy_crypto.timeframe, "4h");
        assert!(state.load_error.is_none());
    }

    #[actix::test]
    async fn missing_record_shows_defaults() {
        let dummy = DummyBackend::new();
        let addr = loaded_editor(&dummy).await;

        let state = current(&addr).await;
        assert_eq!(state.form, SettingsForm::default());
        assert_eq!(state.form.whitelist, "BTCEUR,ETHEUR");
    }

    #[actix::test]
    async fn invalid_fallback_rate_blocks_the_write() {
        let dummy = DummyBackend::new();
        dummy.insert("settings", settings_record());
        let addr = loaded_editor(&dummy).await;

        let mut form = current(&addr).await.form;
        form.fallback_usdt_eur = "0.4".to_string();
        addr.send(SaveSettingsPayload { form: Some(form) }).await.unwrap();
        settle().await;

        let state = current(&addr).await;
        assert!(state.validation_error.is_some());
        assert!(state.status.is_none());
        assert_eq!(dummy.writes(), 0);
        assert_eq!(dummy.rows("settings")[0]["fallback_usdt_eur"], 0.93);
    }

    #[actix::test]
    async fn valid_save_upserts_the_full_record() {
        let dummy = DummyBackend::new();
        dummy.insert("settings", settings_record());
        let addr = loaded_editor(&dummy).await;

        let mut form = current(&addr).await.form;
        form.fallback_usdt_eur = "0.92".to_string();
        form.whitelist = " BTCEUR, ,ETHEUR ,".to_string();
        addr.send(SaveSettingsPayload { form: Some(form) }).await.unwrap();

        let saved = wait_for(|| async {
            let state = current(&addr).await;
            (state.status.as_deref() == Some(STATUS_SAVED)).then_some(state)
        })
        .await;
        assert!(saved.is_some());

        let rows = dummy.rows("settings");
        assert_eq!(dummy.writes(), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["fallback_usdt_eur"], 0.92);
        assert_eq!(rows[0]["whitelist"], json!(["BTCEUR", "ETHEUR"]));
        assert_eq!(rows[0]["use_ai_crypto"], true);
        assert_eq!(rows[0]["strategy_stocks"]["interval"], "1d");
    }

    #[actix::test]
    async fn failed_write_reports_status_and_keeps_the_form() {
        let dummy = DummyBackend::new();
        dummy.insert("settings", settings_record());
        let addr = loaded_editor(&dummy).await;

        dummy.fail_table("settings", "permission denied");
        let mut form = current(&addr).await.form;
        form.whitelist = "ADAEUR".to_string();
        addr.send(SaveSettingsPayload { form: Some(form) }).await.unwrap();

        let failed = wait_for(|| async {
            let state = current(&addr).await;
            (state.status.as_deref() == Some("Fout: permission denied")).then_some(state)
        })
        .await
        .unwrap();
        assert_eq!(failed.form.whitelist, "ADAEUR");
    }

    #[actix::test]
    async fn failed_load_blocks_the_write() {
        let dummy = DummyBackend::new();
        dummy.insert("settings", settings_record());
        dummy.fail_table("settings", "permission denied");

        let addr = SettingsEditor::new(Backend::Dummy(dummy.clone())).start();
        let state = wait_for(|| async {
            let state = current(&addr).await;
            state.loaded.then_some(state)
        })
        .await
        .unwrap();
        assert!(state.load_error.unwrap().contains("permission denied"));

        addr.send(SaveSettingsPayload::default()).await.unwrap();
        settle().await;

        let state = current(&addr).await;
        assert_eq!(state.validation_error.as_deref(), Some(SAVE_BLOCKED));
        assert!(state.status.is_none());
        assert_eq!(dummy.writes(), 0);
        assert_eq!(dummy.rows("settings")[0]["fallback_usdt_eur"], 0.93);
    }

    #[actix::test]
    async fn a_malformed_column_does_not_reset_the_stored_record() {
        let dummy = DummyBackend::new();
        dummy.insert(
            "settings",
            json!({
                "id": 1,
                "fallback_usdt_eur": 1.1,
                "whitelist": ["SOLEUR"],
                "strategy_crypto": {"timeframe": "1h", "rsi_buy": ""},
            }),
        );
        let addr = loaded_editor(&dummy).await;

        let state = current(&addr).await;
        assert!(state.load_error.is_none());
        assert_eq!(state.form.fallback_usdt_eur, "1.1");
        assert_eq!(state.form.whitelist, "SOLEUR");
        assert_eq!(state.form.strategy_crypto.timeframe, "1h");

        addr.send(SaveSettingsPayload::default()).await.unwrap();
        let saved = wait_for(|| async {
            let state = current(&addr).await;
            (state.status.as_deref() == Some(STATUS_SAVED)).then_some(())
        })
        .await;
        assert!(saved.is_some());

        let rows = dummy.rows("settings");
        assert_eq!(rows[0]["fallback_usdt_eur"], 1.1);
        assert_eq!(rows[0]["whitelist"], json!(["SOLEUR"]));
        assert_eq!(rows[0]["strategy_crypto"]["timeframe"], "1h");
        assert_eq!(rows[0]["strategy_crypto"]["rsi_buy"], 30.0);
    }

    #[actix::test]
    async fn status_clears_itself() {
        let dummy = DummyBackend::new();
        let addr = loaded_editor(&dummy).await;

        addr.send(SaveSettingsPayload::default()).await.unwrap();
        settle().await;
        assert_eq!(current(&addr).await.status.as_deref(), Some(STATUS_SAVED));

        tokio::time::sleep(STATUS_CLEAR_DELAY + Duration::from_millis(200)).await;
        assert!(current(&addr).await.status.is_none());
    }

    #[actix::test]
    async fn external_update_overwrites_unsaved_edits() {
        let dummy = DummyBackend::new();
        dummy.insert("settings", settings_record());
        let addr = loaded_editor(&dummy).await;

        let mut form = current(&addr).await.form;
        form.fallback_usdt_eur = "1.2".to_string();
        addr.send(EditSettingsPayload { form }).await.unwrap();

        dummy.update("settings", &Filter::eq("id", 1), &json!({"fallback_usdt_eur": 1.05}));

        let reloaded = wait_for(|| async {
            let state = current(&addr).await;
            (state.form.fallback_usdt_eur == "1.05").then_some(state)
        })
        .await;
        assert!(reloaded.is_some());
    }

    #[actix::test]
    async fn stopping_the_editor_releases_the_record_subscription() {
        let dummy = DummyBackend::new();
        let addr = loaded_editor(&dummy).await;

        addr.send(StopPayload).await.unwrap();

        let released = wait_for(|| async { (dummy.subscriber_count() == 0).then_some(()) }).await;
        assert!(released.is_some());
    }
}
