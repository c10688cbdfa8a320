use std::{sync::Arc, time::Duration};

use anyhow::Context;
use bot::{
    config::Config,
    dispatcher::Dispatcher,
    platform::{BridgePlatform, Platform},
};
use clap::Parser;
use comms::{event::Event, transport};
use tokio::{
    net::TcpStream,
    signal::unix::{signal, SignalKind},
    task::JoinSet,
};
use tokio_stream::StreamExt;

/// How long in-flight handlers get to finish once shutdown starts
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bot=info".into()),
        )
        .init();

    let config = Config::parse();
    let mut interrupt =
        signal(SignalKind::interrupt()).context("failed to create interrupt signal stream")?;

    let stream = TcpStream::connect(&config.bridge_addr)
        .await
        .with_context(|| format!("could not connect to the bridge at {}", config.bridge_addr))?;
    let (mut events, request_writer) = transport::client::split_tcp_stream(stream);
    let bridge = Arc::new(BridgePlatform::new(request_writer, config.request_timeout()));
    let platform: Arc<dyn Platform> = bridge.clone();
    let dispatcher = Dispatcher::new(platform, &config);
    let mut join_set: JoinSet<()> = JoinSet::new();

    tracing::info!(
        bridge = %config.bridge_addr,
        source = %config.source_channel,
        category = %config.voice_category,
        announcements = %config.announcement_channel,
        "connected to the platform bridge"
    );
    loop {
        tokio::select! {
            _ = interrupt.recv() => {
                tracing::info!("interrupted, shutting down");
                break;
            }
            maybe_event = events.next() => match maybe_event {
                // replies go straight to the call waiting for them
                Some(Ok(Event::Reply(reply))) => {
                    bridge.resolve(reply);
                }
                Some(Ok(event)) => dispatcher.dispatch(event, &mut join_set),
                Some(Err(e)) => {
                    tracing::warn!(error = %format!("{:#}", e), "skipping unreadable event");
                }
                None => {
                    tracing::warn!("bridge closed the connection");
                    break;
                }
            },
            Some(joined) = join_set.join_next() => {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "event handler panicked");
                }
            }
        }
    }

    // nothing will answer pending requests anymore
    bridge.disconnect();
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while join_set.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!("aborting handlers that did not finish in time");
        join_set.shutdown().await;
    }

    tracing::info!(rooms = dispatcher.registry().len(), "shut down");
    Ok(())
}
