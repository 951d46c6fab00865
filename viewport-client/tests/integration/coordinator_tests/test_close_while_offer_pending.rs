use viewport_client::{ChannelEvent, Command, CommandKind, Error, SessionDescription, SinkEvent};

use crate::integration::{create_test_coordinator, init_tracing};
use crate::utils::{FakePeerProvider, SIGNAL_TIMEOUT_MS, recv_within, wait_until};

#[tokio::test]
async fn test_close_while_offer_pending() {
    init_tracing();

    let provider = FakePeerProvider::new();
    provider.hold_remote_description();
    let mut t = create_test_coordinator(&provider);

    t.channel_tx.send(ChannelEvent::Opened).unwrap();
    let offer = Command::offer(&SessionDescription::offer("v=0 remote-offer")).unwrap();
    t.channel_tx.send(ChannelEvent::Command(offer)).unwrap();

    wait_until(|| !provider.calls().is_empty(), SIGNAL_TIMEOUT_MS)
        .await
        .expect("Remote description never started");

    t.channel_tx
        .send(ChannelEvent::Closed {
            error: Some(Error::connection("connection reset")),
        })
        .unwrap();
    t.task.await.unwrap();

    // The held operation completes after the session is gone.
    provider.release_remote_description();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert_eq!(t.output.kinds().await, vec![CommandKind::Offer]);
    assert_eq!(provider.calls(), vec!["set_remote_description"]);
    assert_eq!(provider.close_count(), 1);

    let event = recv_within(&mut t.sink_rx, SIGNAL_TIMEOUT_MS)
        .await
        .expect("Channel error not surfaced");
    assert!(matches!(event, SinkEvent::Notification(text) if text.contains("connection reset")));
}
