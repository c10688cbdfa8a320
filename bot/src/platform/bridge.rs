use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use comms::{
    command::{Operation, Request},
    event::{Outcome, ReplyEvent},
    model::{ChannelId, InteractionId, MessageContent, MessageId, UserId, VoiceChannel},
    transport::client::RequestWriter,
};
use tokio::sync::oneshot;

use super::{Platform, PlatformError, PlatformResult};

/// [BridgePlatform] talks to the platform through a bridge process.
///
/// Every call is written as a [Request] and parked until the read loop hands the
/// matching [ReplyEvent] to [BridgePlatform::resolve].
pub struct BridgePlatform {
    writer: tokio::sync::Mutex<RequestWriter>,
    pending: Mutex<HashMap<u64, oneshot::Sender<Outcome>>>,
    next_request_id: AtomicU64,
    closed: AtomicBool,
    request_timeout: Duration,
}

impl BridgePlatform {
    pub fn new(writer: RequestWriter, request_timeout: Duration) -> Self {
        BridgePlatform {
            writer: tokio::sync::Mutex::new(writer),
            pending: Mutex::new(HashMap::new()),
            next_request_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            request_timeout,
        }
    }

    /// Hand a reply read from the bridge to the call waiting for it.
    /// Returns false when nobody is waiting, e.g. the call already timed out.
    pub fn resolve(&self, reply: ReplyEvent) -> bool {
        match self.pending().remove(&reply.request) {
            Some(tx) => tx.send(reply.outcome).is_ok(),
            None => {
                tracing::debug!(request = reply.request, "reply for unknown request");
                false
            }
        }
    }

    /// Fail every pending call and refuse new ones
    pub fn disconnect(&self) {
        self.closed.store(true, Ordering::SeqCst);
        // dropping the senders wakes the waiting calls with an error
        self.pending().clear();
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<Outcome>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn call(&self, op: Operation) -> PlatformResult<Outcome> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PlatformError::Disconnected);
        }

        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = oneshot::channel();
        self.pending().insert(id, tx);

        let written = {
            let mut writer = self.writer.lock().await;
            writer.write(&Request { id, op }).await
        };
        if let Err(e) = written {
            self.pending().remove(&id);
            return Err(PlatformError::Transport(
                e.context("could not write request to the bridge"),
            ));
        }

        let outcome = match tokio::time::timeout(self.request_timeout, &mut rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => return Err(PlatformError::Disconnected),
            Err(_) => {
                self.pending().remove(&id);
                // the reply may have landed between the deadline and the removal
                match rx.try_recv() {
                    Ok(outcome) => outcome,
                    Err(_) => return Err(PlatformError::TimedOut(self.request_timeout)),
                }
            }
        };

        match outcome {
            Outcome::NotFound => Err(PlatformError::NotFound),
            Outcome::Failed { reason } => Err(PlatformError::Rejected(reason)),
            outcome => Ok(outcome),
        }
    }

    async fn call_done(&self, operation: &'static str, op: Operation) -> PlatformResult<()> {
        match self.call(op).await? {
            Outcome::Done => Ok(()),
            other => Err(unexpected(operation, other)),
        }
    }

    async fn call_message(
        &self,
        operation: &'static str,
        op: Operation,
    ) -> PlatformResult<MessageId> {
        match self.call(op).await? {
            Outcome::Message { message } => Ok(message),
            other => Err(unexpected(operation, other)),
        }
    }
}

fn unexpected(operation: &'static str, outcome: Outcome) -> PlatformError {
    PlatformError::UnexpectedReply {
        operation,
        outcome: format!("{:?}", outcome),
    }
}

#[async_trait]
impl Platform for BridgePlatform {
    async fn category_exists(&self, category: ChannelId) -> PlatformResult<bool> {
        match self.call(Operation::CategoryExists { category }).await {
            Ok(Outcome::Exists { exists }) => Ok(exists),
            Ok(other) => Err(unexpected("category_exists", other)),
            Err(PlatformError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_voice_channel(
        &self,
        category: ChannelId,
        name: &str,
    ) -> PlatformResult<ChannelId> {
        let op = Operation::CreateVoiceChannel {
            category,
            name: String::from(name),
        };

        match self.call(op).await? {
            Outcome::Channel { channel } => Ok(channel),
            other => Err(unexpected("create_voice_channel", other)),
        }
    }

    async fn rename_channel(&self, channel: ChannelId, name: &str) -> PlatformResult<()> {
        let op = Operation::RenameChannel {
            channel,
            name: String::from(name),
        };

        self.call_done("rename_channel", op).await
    }

    async fn delete_channel(&self, channel: ChannelId) -> PlatformResult<()> {
        self.call_done("delete_channel", Operation::DeleteChannel { channel })
            .await
    }

    async fn voice_channel(&self, channel: ChannelId) -> PlatformResult<VoiceChannel> {
        match self.call(Operation::VoiceChannel { channel }).await? {
            Outcome::VoiceChannel(snapshot) => Ok(snapshot),
            other => Err(unexpected("voice_channel", other)),
        }
    }

    async fn move_member(&self, member: UserId, channel: Option<ChannelId>) -> PlatformResult<()> {
        self.call_done("move_member", Operation::MoveMember { member, channel })
            .await
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> PlatformResult<MessageId> {
        let op = Operation::SendMessage {
            channel,
            content: content.clone(),
        };

        self.call_message("send_message", op).await
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &MessageContent,
    ) -> PlatformResult<()> {
        let op = Operation::EditMessage {
            channel,
            message,
            content: content.clone(),
        };

        self.call_done("edit_message", op).await
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        self.call_done("delete_message", Operation::DeleteMessage { channel, message })
            .await
    }

    async fn fetch_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        match self
            .call(Operation::FetchMessage { channel, message })
            .await?
        {
            Outcome::Done | Outcome::Message { .. } => Ok(()),
            other => Err(unexpected("fetch_message", other)),
        }
    }

    async fn respond(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<()> {
        let op = Operation::Respond {
            interaction,
            content: content.clone(),
        };

        self.call_done("respond", op).await
    }

    async fn update_message(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<()> {
        let op = Operation::UpdateMessage {
            interaction,
            content: content.clone(),
        };

        self.call_done("update_message", op).await
    }

    async fn delete_response(&self, interaction: InteractionId) -> PlatformResult<()> {
        self.call_done("delete_response", Operation::DeleteResponse { interaction })
            .await
    }

    async fn send_followup(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<MessageId> {
        let op = Operation::SendFollowup {
            interaction,
            content: content.clone(),
        };

        self.call_message("send_followup", op).await
    }

    async fn delete_followup(
        &self,
        interaction: InteractionId,
        message: MessageId,
    ) -> PlatformResult<()> {
        let op = Operation::DeleteFollowup {
            interaction,
            message,
        };

        self.call_done("delete_followup", op).await
    }
}
