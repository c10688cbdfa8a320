use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use comms::{
    event::MessageCreateEvent,
    model::{ChannelId, UserId},
};
use nanoid::nanoid;
use tokio::sync::oneshot;

#[derive(Debug)]
struct Waiter {
    id: String,
    author: UserId,
    channel: ChannelId,
    tx: oneshot::Sender<MessageCreateEvent>,
}

/// [MessageWaiters] lets a handler suspend until a given user posts their next message
/// in a given channel. Message events are fed in by the dispatcher via [MessageWaiters::deliver].
#[derive(Debug, Default)]
pub struct MessageWaiters {
    waiters: Mutex<Vec<Waiter>>,
}

impl MessageWaiters {
    pub fn new() -> Self {
        MessageWaiters::default()
    }

    /// Wait for the next message `author` posts in `channel`, giving up after `wait`
    pub async fn next_message(
        &self,
        author: UserId,
        channel: ChannelId,
        wait: Duration,
    ) -> Option<MessageCreateEvent> {
        let id = nanoid!();
        let (tx, mut rx) = oneshot::channel();
        self.waiters().push(Waiter {
            id: id.clone(),
            author,
            channel,
            tx,
        });

        match tokio::time::timeout(wait, &mut rx).await {
            Ok(received) => received.ok(),
            Err(_) => {
                self.waiters().retain(|waiter| waiter.id != id);
                // a delivery may have raced the deadline
                rx.try_recv().ok()
            }
        }
    }

    /// Hand `message` to the oldest waiter expecting it. Returns whether one took it.
    pub fn deliver(&self, message: &MessageCreateEvent) -> bool {
        let mut waiters = self.waiters();

        while let Some(position) = waiters
            .iter()
            .position(|waiter| waiter.author == message.author && waiter.channel == message.channel)
        {
            let waiter = waiters.remove(position);
            if waiter.tx.send(message.clone()).is_ok() {
                return true;
            }
        }

        false
    }

    /// Number of handlers currently waiting for a message
    pub fn pending(&self) -> usize {
        self.waiters().len()
    }

    fn waiters(&self) -> MutexGuard<'_, Vec<Waiter>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
