/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use slog::Logger;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use tunfwd_http_scan::PendingRequestTracker;

use crate::forwarder::ForwardStats;
use crate::log::TaskLogForForwarder;
use crate::{
    ChannelCloser, ClientSocket, ForwardDirection, ForwardSummary, StreamForwardConfig,
    StreamForwarder, TrafficStatsSink, TunnelChannel,
};

/// Result of a finished forwarder pair.
#[derive(Debug)]
pub struct PairSummary {
    pub task_id: Uuid,
    /// `None` if the follower task was aborted or panicked.
    pub client_to_tunnel: Option<ForwardSummary>,
    pub tunnel_to_client: ForwardSummary,
}

/// Both directions of a connection forwarded through a tunnel channel.
///
/// The `ClientToTunnel` forwarder is the follower. The `TunnelToClient`
/// forwarder is the leader, which waits for the follower to finish and then
/// closes the channel and the client socket.
pub struct ForwarderPair<CR, CW, TR, TW> {
    task_id: Uuid,
    config: StreamForwardConfig,
    channel: Arc<dyn TunnelChannel>,
    client_socket: Option<Box<dyn ClientSocket>>,
    client_reader: CR,
    client_writer: CW,
    tunnel_reader: TR,
    tunnel_writer: TW,
    dest_host: Option<String>,
    stats_sink: Option<Arc<dyn TrafficStatsSink>>,
    task_logger: Option<Logger>,
}

impl<CR, CW, TR, TW> ForwarderPair<CR, CW, TR, TW>
where
    CR: AsyncRead + Unpin + Send + 'static,
    CW: AsyncWrite + Unpin + Send + 'static,
    TR: AsyncRead + Unpin + Send + 'static,
    TW: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(
        channel: Arc<dyn TunnelChannel>,
        client_reader: CR,
        client_writer: CW,
        tunnel_reader: TR,
        tunnel_writer: TW,
    ) -> Self {
        ForwarderPair {
            task_id: Uuid::new_v4(),
            config: StreamForwardConfig::default(),
            channel,
            client_socket: None,
            client_reader,
            client_writer,
            tunnel_reader,
            tunnel_writer,
            dest_host: None,
            stats_sink: None,
            task_logger: None,
        }
    }

    pub fn with_config(mut self, config: StreamForwardConfig) -> Self {
        self.config = config;
        self
    }

    /// The socket will be closed by the leader after the channel is closed.
    pub fn with_client_socket<S>(mut self, socket: S) -> Self
    where
        S: ClientSocket + 'static,
    {
        self.client_socket = Some(Box::new(socket));
        self
    }

    pub fn with_dest_host(mut self, host: impl Into<String>) -> Self {
        self.dest_host = Some(host.into());
        self
    }

    /// Stats and HTTP scanning are enabled only if the dest host is also set.
    pub fn with_stats_sink(mut self, sink: Arc<dyn TrafficStatsSink>) -> Self {
        self.stats_sink = Some(sink);
        self
    }

    pub fn with_task_logger(mut self, logger: Logger) -> Self {
        self.task_logger = Some(logger);
        self
    }

    #[inline]
    pub fn task_id(&self) -> &Uuid {
        &self.task_id
    }

    /// Spawn the follower and then the leader onto the current tokio runtime.
    pub fn start(self) -> JoinHandle<PairSummary> {
        let closer = Arc::new(ChannelCloser::new(self.channel));

        let mut follower = StreamForwarder::new(
            ForwardDirection::ClientToTunnel,
            self.client_reader,
            self.tunnel_writer,
            &self.config,
            closer.clone(),
        );
        let mut leader = StreamForwarder::new(
            ForwardDirection::TunnelToClient,
            self.tunnel_reader,
            self.client_writer,
            &self.config,
            closer.clone(),
        );

        if let (Some(dest_host), Some(sink)) = (&self.dest_host, &self.stats_sink) {
            let tracker = Arc::new(PendingRequestTracker::new());
            follower.enable_stats(
                ForwardStats {
                    dest_host: dest_host.clone(),
                    sink: sink.clone(),
                },
                &self.config,
                tracker.clone(),
            );
            leader.enable_stats(
                ForwardStats {
                    dest_host: dest_host.clone(),
                    sink: sink.clone(),
                },
                &self.config,
                tracker,
            );
        }

        let ctx = Arc::new(PairContext {
            task_id: self.task_id,
            dest_host: self.dest_host,
            task_logger: self.task_logger,
        });

        let follower_ctx = ctx.clone();
        let follower_handle = tokio::spawn(async move {
            let summary = follower.run().await;
            follower_ctx.log(&summary);
            summary
        });

        let teardown = PairTeardown {
            closer,
            client_socket: self.client_socket,
            sibling_wait_timeout: self.config.sibling_wait_timeout(),
            force_close_wait: self.config.force_close_wait(),
        };
        tokio::spawn(async move {
            let summary = leader.run().await;
            ctx.log(&summary);
            let sibling = teardown.run(follower_handle).await;
            PairSummary {
                task_id: ctx.task_id,
                client_to_tunnel: sibling,
                tunnel_to_client: summary,
            }
        })
    }
}

struct PairContext {
    task_id: Uuid,
    dest_host: Option<String>,
    task_logger: Option<Logger>,
}

impl PairContext {
    fn log(&self, summary: &ForwardSummary) {
        if let Some(logger) = &self.task_logger {
            TaskLogForForwarder {
                logger,
                task_id: &self.task_id,
                dest_host: self.dest_host.as_deref(),
                summary,
            }
            .log();
        }
    }
}

struct PairTeardown {
    closer: Arc<ChannelCloser>,
    client_socket: Option<Box<dyn ClientSocket>>,
    sibling_wait_timeout: Option<Duration>,
    force_close_wait: Duration,
}

impl PairTeardown {
    async fn run(self, mut sibling: JoinHandle<ForwardSummary>) -> Option<ForwardSummary> {
        let joined = match self.sibling_wait_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, &mut sibling).await {
                Ok(r) => Some(r),
                Err(_) => {
                    debug!("sibling forwarder not finished in {timeout:?}, force close");
                    self.force_close();
                    match tokio::time::timeout(self.force_close_wait, &mut sibling).await {
                        Ok(r) => Some(r),
                        Err(_) => {
                            warn!("sibling forwarder still running after force close, abort it");
                            sibling.abort();
                            None
                        }
                    }
                }
            },
            None => Some((&mut sibling).await),
        };

        self.closer.close(
            &format!(
                "stream forwarder ({}) is cleaning up the connection",
                ForwardDirection::TunnelToClient
            ),
            true,
        );
        self.close_client_socket();

        joined.and_then(Self::unpack_join)
    }

    fn force_close(&self) {
        self.closer.close(
            &format!(
                "stream forwarder ({}) timed out waiting for its sibling",
                ForwardDirection::TunnelToClient
            ),
            true,
        );
        self.close_client_socket();
    }

    fn close_client_socket(&self) {
        if let Some(socket) = &self.client_socket {
            if let Err(e) = socket.close() {
                debug!("failed to close client socket: {e}");
            }
        }
    }

    fn unpack_join(r: Result<ForwardSummary, JoinError>) -> Option<ForwardSummary> {
        match r {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("sibling forwarder task failed: {e}");
                None
            }
        }
    }
}
