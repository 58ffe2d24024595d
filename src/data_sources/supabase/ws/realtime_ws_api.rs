use crate::{
    data_sources::{
        subscription::Subscription,
        supabase::{
            supabase_config::SupabaseConfig,
            ws::{incoming_message::IncomingMessage, outgoing_message::OutgoingMessage},
        },
    },
    models::{change_kind::ChangeKind, dashboard_error::DashboardError, row_event::RowEvent},
    utils::constants::{REALTIME_HEARTBEAT, REALTIME_JOIN_TIMEOUT},
};
use anyhow::{anyhow, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    select,
    sync::mpsc::{channel, Sender},
    time::{interval_at, timeout, Instant},
};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use tungstenite::Message;
use uuid::Uuid;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One realtime channel on one table. Each subscriber gets its own socket and
/// a topic with a unique suffix, so two views on the same table never share
/// or tear down each other's feed.
pub struct RealtimeWebsocketApi {
    url: String,
    access_token: String,
    table: String,
    topic: String,
    kinds: Vec<ChangeKind>,
}

impl RealtimeWebsocketApi {
    pub fn new(config: &SupabaseConfig, table: &str, kinds: &[ChangeKind]) -> Self {
        Self {
            url: config.realtime_url(),
            access_token: config.anon_key.clone(),
            table: table.to_string(),
            topic: format!("realtime:{}-{}", table, Uuid::new_v4()),
            kinds: kinds.to_vec(),
        }
    }

    /// Connects, joins the channel and hands back the event feed once the
    /// server has accepted the join.
    pub async fn connect(self) -> Result<Subscription, DashboardError> {
        let (mut ws_stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| DashboardError::subscription(&self.table, e))?;

        self.join(&mut ws_stream)
            .await
            .map_err(|e| DashboardError::subscription(&self.table, e))?;

        info!(table = %self.table, topic = %self.topic, "realtime channel joined");

        let (tx, rx) = channel(64);
        let table = self.table.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = self.run(ws_stream, tx).await {
                warn!(table = %self.table, error = %e, "realtime channel closed");
            }
        });

        Ok(Subscription::new(&table, rx, task))
    }

    async fn join(&self, ws_stream: &mut WsStream) -> Result<()> {
        let join = OutgoingMessage::join(&self.topic, &self.table, &self.kinds, &self.access_token);
        ws_stream.send(Message::Text(join.to_json())).await?;

        timeout(REALTIME_JOIN_TIMEOUT, self.await_join_reply(ws_stream))
            .await
            .map_err(|_| anyhow!("geen antwoord op aanmelding"))?
    }

    async fn await_join_reply(&self, ws_stream: &mut WsStream) -> Result<()> {
        while let Some(msg) = ws_stream.next().await {
            let Message::Text(txt) = msg? else {
                continue;
            };

            let parsed: IncomingMessage = serde_json::from_str(&txt)?;
            if parsed.topic != self.topic || parsed.event != "phx_reply" {
                continue;
            }

            return match parsed.reply_error() {
                Some(reason) => Err(anyhow!(reason)),
                None => Ok(()),
            };
        }

        Err(anyhow!("verbinding gesloten tijdens aanmelden"))
    }

    async fn run(&self, ws_stream: WsStream, tx: Sender<RowEvent>) -> Result<()> {
        let (mut write, mut read) = ws_stream.split();
        let mut heartbeat = interval_at(Instant::now() + REALTIME_HEARTBEAT, REALTIME_HEARTBEAT);
        let mut heartbeat_ref: u64 = 1;

        let result = loop {
            select! {
                _ = heartbeat.tick() => {
                    heartbeat_ref += 1;
                    let frame = OutgoingMessage::heartbeat(heartbeat_ref).to_json();
                    if let Err(e) = write.send(Message::Text(frame)).await {
                        break Err(e.into());
                    }
                }
                msg = read.next() => {
                    let txt = match msg {
                        Some(Ok(Message::Text(txt))) => txt,
                        Some(Ok(Message::Close(_))) | None => break Err(anyhow!("socket gesloten")),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => break Err(e.into()),
                    };

                    let parsed: IncomingMessage = match serde_json::from_str(&txt) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            debug!(error = %e, "ignoring unparseable realtime frame");
                            continue;
                        }
                    };

                    if let Some(reason) = parsed.reply_error() {
                        break Err(anyhow!(reason));
                    }

                    if parsed.is_close() && parsed.topic == self.topic {
                        break Err(anyhow!("kanaal gesloten"));
                    }

                    if let Some(event) = parsed.row_event() {
                        if event.table != self.table {
                            continue;
                        }
                        if tx.send(event).await.is_err() {
                            // Receiver dropped, nobody is listening anymore.
                            let leave = OutgoingMessage::leave(&self.topic).to_json();
                            let _ = write.send(Message::Text(leave)).await;
                            break Ok(());
                        }
                    }
                }
                _ = tx.closed() => {
                    let leave = OutgoingMessage::leave(&self.topic).to_json();
                    let _ = write.send(Message::Text(leave)).await;
                    break Ok(());
                }
            }
        };

        let _ = write.close().await;
        result
    }
}
