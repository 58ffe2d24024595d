use crate::{
    models::message_payloads::{
        edit_settings_payload::EditSettingsPayload, observe_settings_payload::ObserveSettingsPayload,
        save_settings_payload::SaveSettingsPayload, settings_changed_payload::SettingsChangedPayload,
        stop_payload::StopPayload,
    },
    server::{channel_forwarder::ChannelForwarder, dashboard_server::DashboardState},
    views::{
        settings_editor::{SettingsEditor, SettingsEditorState},
        settings_form::SettingsForm,
    },
};
use actix::Actor;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{select, sync::mpsc::unbounded_channel};
use tracing::{debug, warn};

/// What the browser sends over the settings socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingsCommand {
    Edit { form: SettingsForm },
    Save { form: Option<SettingsForm> },
}

pub async fn settings_socket(ws: WebSocketUpgrade, State(state): State<DashboardState>) -> Response {
    ws.on_upgrade(move |socket| run(socket, state))
}

pub fn state_frame(state: &SettingsEditorState) -> String {
    let mut frame = serde_json::to_value(state).unwrap_or_else(|_| json!({}));

    if let Value::Object(fields) = &mut frame {
        fields.insert("type".to_string(), json!("state"));
    }

    frame.to_string()
}

/// One editor per connection; closing the socket stops it.
async fn run(socket: WebSocket, state: DashboardState) {
    let (mut sender, mut receiver) = socket.split();

    let Some(backend) = state.backend.clone() else {
        let frame = json!({
            "type": "state",
            "loaded": true,
            "load_error": state.config_error,
        })
        .to_string();
        let _ = sender.send(Message::Text(frame)).await;
        return;
    };

    let (tx, mut rx) = unbounded_channel::<SettingsChangedPayload>();
    let forwarder = ChannelForwarder::<SettingsChangedPayload>::start_in_arbiter(&state.arbiter, move |_| {
        ChannelForwarder::new(tx)
    });
    let editor = SettingsEditor::start_in_arbiter(&state.arbiter, move |_| SettingsEditor::new(backend));

    editor.do_send(ObserveSettingsPayload {
        observer: forwarder.recipient(),
    });

    debug!("settings socket opened");

    loop {
        select! {
            changed = rx.recv() => {
                let Some(changed) = changed else { break };
                let frame = state_frame(&changed.state);
                if sender.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };

                match serde_json::from_str::<SettingsCommand>(&text) {
                    Ok(SettingsCommand::Edit { form }) => editor.do_send(EditSettingsPayload { form }),
                    Ok(SettingsCommand::Save { form }) => editor.do_send(SaveSettingsPayload { form }),
                    Err(e) => warn!(error = %e, "ignoring malformed settings command"),
                }
            }
        }
    }

    editor.do_send(StopPayload);
    debug!("settings socket closed");
}
