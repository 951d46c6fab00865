use viewport_client::{ChannelEvent, Command, CommandKind, SessionDescription, SinkEvent};

use crate::integration::{create_test_coordinator, init_tracing};
use crate::utils::{FakePeerProvider, SIGNAL_TIMEOUT_MS, assert_quiet, recv_within};

#[tokio::test]
async fn test_answer_failure() {
    init_tracing();

    let provider = FakePeerProvider::new();
    provider.fail_answer();
    let mut t = create_test_coordinator(&provider);

    t.channel_tx.send(ChannelEvent::Opened).unwrap();
    let offer = Command::offer(&SessionDescription::offer("v=0 remote-offer")).unwrap();
    t.channel_tx.send(ChannelEvent::Command(offer)).unwrap();

    let first = recv_within(&mut t.sent_rx, SIGNAL_TIMEOUT_MS)
        .await
        .expect("Offer never requested");
    assert_eq!(first.id, CommandKind::Offer);

    let event = recv_within(&mut t.sink_rx, SIGNAL_TIMEOUT_MS)
        .await
        .expect("Answer failure not surfaced");
    assert!(
        matches!(&event, SinkEvent::Notification(text) if text.starts_with("Failed to createAnswer")),
        "unexpected event: {:?}",
        event
    );

    assert_quiet(&mut t.sent_rx, 200).await;
    assert_eq!(t.output.kinds().await, vec![CommandKind::Offer]);
    assert_eq!(provider.calls(), vec!["set_remote_description", "create_answer"]);

    // The channel stays open until the viewer is stopped.
    assert_eq!(t.output.close_count().await, 0);
    t.control.stop().await;
    t.task.await.unwrap();
    assert_eq!(provider.close_count(), 1);
}
