use tokio::net::TcpListener;
use viewport_client::{Error, SignalChannel};

use crate::integration::init_tracing;

#[tokio::test]
async fn test_bad_endpoint() {
    init_tracing();

    let err = SignalChannel::connect("http://127.0.0.1:8080/stream/webrtc")
        .await
        .err()
        .expect("http scheme accepted");
    assert!(matches!(err, Error::Connection(_)));

    let err = SignalChannel::connect("not a url")
        .await
        .err()
        .expect("garbage accepted");
    assert!(matches!(err, Error::Connection(_)));
}

#[tokio::test]
async fn test_unreachable_server() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = SignalChannel::connect(&format!("ws://{}/stream/webrtc", addr))
        .await
        .err()
        .expect("connected to a closed port");
    assert!(matches!(err, Error::Connection(_)));
}
