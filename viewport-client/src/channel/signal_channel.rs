use crate::channel::{ChannelEvent, ChannelEvents, SignalingOutput};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use url::Url;
use viewport_core::Command;

/// WebSocket transport to the signaling endpoint.
///
/// Outgoing commands go through an unbounded queue drained by a writer task.
/// Incoming frames are decoded by a reader task and surface on the
/// [`ChannelEvents`] receiver returned by [`SignalChannel::connect`].
pub struct SignalChannel {
    outbound: mpsc::UnboundedSender<Message>,
    closing: Arc<AtomicBool>,
}

impl SignalChannel {
    pub async fn connect(endpoint: &str) -> Result<(Self, ChannelEvents)> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::connection(format!("invalid endpoint {}: {}", endpoint, e)))?;
        if url.scheme() != "ws" {
            return Err(Error::connection(format!(
                "unsupported scheme `{}` in {}",
                url.scheme(),
                endpoint
            )));
        }

        let (ws_stream, _) = connect_async(url.as_str()).await?;
        info!("Signaling channel open: {}", url);

        let (mut sender, mut receiver) = ws_stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let closing = Arc::new(AtomicBool::new(false));

        let _ = events_tx.send(ChannelEvent::Opened);

        let mut send_task = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let is_close = matches!(msg, Message::Close(_));
                if let Err(e) = sender.send(msg).await {
                    return Some(Error::from(e));
                }
                if is_close {
                    break;
                }
            }
            None
        });

        let mut recv_task = tokio::spawn({
            let events_tx = events_tx.clone();

            async move {
                while let Some(msg) = receiver.next().await {
                    match msg {
                        Ok(Message::Text(text)) => match Command::from_push_json(&text) {
                            Ok(command) => {
                                debug!("WS IN: {}", command.id);
                                if events_tx.send(ChannelEvent::Command(command)).is_err() {
                                    break;
                                }
                            }
                            Err(e) => debug!("Ignoring signaling frame: {}", e),
                        },
                        Ok(Message::Close(frame)) => {
                            debug!("Server closed signaling channel: {:?}", frame);
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => return Some(Error::from(e)),
                    }
                }
                None
            }
        });

        let supervisor_closing = closing.clone();
        tokio::spawn(async move {
            let error = tokio::select! {
                res = (&mut send_task) => {
                    recv_task.abort();
                    res.ok().flatten()
                }
                res = (&mut recv_task) => {
                    send_task.abort();
                    res.ok().flatten()
                }
            };

            match &error {
                Some(e) => error!("Signaling channel failed: {}", e),
                None => info!("Signaling channel closed"),
            }
            supervisor_closing.store(true, Ordering::Release);
            let _ = events_tx.send(ChannelEvent::Closed { error });
        });

        Ok((
            Self { outbound, closing },
            events_rx,
        ))
    }
}

#[async_trait]
impl SignalingOutput for SignalChannel {
    async fn send(&self, command: Command) -> Result<()> {
        if self.closing.load(Ordering::Acquire) {
            return Err(Error::ChannelClosed);
        }
        let json = command.to_request_json()?;
        debug!("WS OUT: {}", json);
        self.outbound
            .send(Message::Text(json.into()))
            .map_err(|_| Error::ChannelClosed)
    }

    async fn close(&self) {
        if self.closing.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.outbound.send(Message::Close(None)).is_err() {
            warn!("Signaling channel already shut down");
        }
    }
}
