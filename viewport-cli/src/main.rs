use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use viewport_client::{ChannelSink, ClientConfig, SinkEvent, StreamHandle, Viewer, default_provider};
use viewport_core::IceServerConfig;
use viewport_core::utils::{DEFAULT_SIGNALING_PORT, SIGNALING_PATH};

#[derive(Parser)]
#[command(name = "viewport")]
#[command(about = "Pull the video stream of a remote media source over WebRTC")]
struct Cli {
    /// Host of the media source.
    #[arg(long, env = "VIEWPORT_HOST")]
    host: String,

    #[arg(long, env = "VIEWPORT_PORT", default_value_t = DEFAULT_SIGNALING_PORT)]
    port: u16,

    #[arg(long, default_value = SIGNALING_PATH)]
    path: String,

    /// Extra STUN urls, e.g. `stun:stun.example.org:3478`.
    #[arg(long = "stun")]
    stun: Vec<String>,

    /// Skip the public STUN server and the one next to the host.
    #[arg(long)]
    no_default_stun: bool,

    #[arg(long, env = "VIEWPORT_LOG", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::for_host(&self.host);
        config.server_address = format!("{}:{}", self.host, self.port);
        config.path = self.path.clone();

        if self.no_default_stun {
            config.ice_servers.clear();
        }
        if !self.stun.is_empty() {
            config.ice_servers.push(IceServerConfig::stun(self.stun.clone()));
        }
        config
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).context("Invalid log level")?,
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let provider = default_provider().context("No peer-connection capability")?;
    let config = cli.client_config();

    println!(
        "{} {}",
        "📡 Connecting to".green().bold(),
        config.endpoint().cyan()
    );

    let (sink, mut events) = ChannelSink::new();
    let viewer = Viewer::start(config, provider, Arc::new(sink))
        .await
        .context("Failed to open signaling channel")?;
    let control = viewer.control();

    let mut stop_requested = false;
    loop {
        tokio::select! {
            evt = events.recv() => match evt {
                Some(evt) => print_event(evt),
                None => break,
            },

            res = tokio::signal::ctrl_c(), if !stop_requested => {
                res.context("Failed to listen for ctrl-c")?;
                println!("{}", "⏹  Stopping...".yellow());
                stop_requested = true;
                control.stop().await;
            }
        }
    }

    viewer.wait().await;
    println!("{}", "👋 Viewer closed".green());
    Ok(())
}

fn print_event(event: SinkEvent) {
    match event {
        SinkEvent::Connected(stream) => {
            println!(
                "{} {}",
                "✨ Stream connected:".green().bold(),
                stream.stream_id()
            );
            spawn_packet_counter(stream);
        }
        SinkEvent::Disconnected => println!("{}", "❌ Stream disconnected".red().bold()),
        SinkEvent::Notification(text) => println!("{} {}", "💬".cyan(), text),
    }
}

const REPORT_EVERY: u64 = 500;

/// Drain the remote track so the receiver keeps flowing, reporting progress
/// now and then.
fn spawn_packet_counter(stream: StreamHandle) {
    let Some(track) = stream.track() else {
        return;
    };

    tokio::spawn(async move {
        let mut packets: u64 = 0;
        let mut bytes: u64 = 0;

        while let Ok((packet, _)) = track.read_rtp().await {
            packets += 1;
            bytes += packet.payload.len() as u64;
            if packets % REPORT_EVERY == 0 {
                info!(
                    "Stream {}: {} packets, {} KiB",
                    stream.stream_id(),
                    packets,
                    bytes / 1024
                );
            }
        }

        debug!("Stream {} ended after {} packets", stream.stream_id(), packets);
    });
}
