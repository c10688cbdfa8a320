use std::sync::Arc;

use comms::{
    event::{Event, MessageCreateEvent},
    model::MessageContent,
};
use tokio::task::JoinSet;

use crate::{
    config::Config,
    control::ControlSurface,
    lifecycle::LifecycleCoordinator,
    panel::PanelRenderer,
    platform::Platform,
    room::RoomRegistry,
    waiters::MessageWaiters,
};

/// [Dispatcher] routes gateway events to the component that handles them.
///
/// Every handler runs as its own task, so a handler suspended on a prompt or a
/// notice delay never holds up the events behind it.
pub struct Dispatcher {
    platform: Arc<dyn Platform>,
    registry: Arc<RoomRegistry>,
    coordinator: Arc<LifecycleCoordinator>,
    controls: Arc<ControlSurface>,
    waiters: Arc<MessageWaiters>,
    command_prefix: String,
}

impl Dispatcher {
    /// Wire up the registry and every component on top of `platform`
    pub fn new(platform: Arc<dyn Platform>, config: &Config) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let waiters = Arc::new(MessageWaiters::new());
        let panels = Arc::new(PanelRenderer::new(
            platform.clone(),
            config.announcement_channel,
        ));
        let coordinator = Arc::new(LifecycleCoordinator::new(
            platform.clone(),
            registry.clone(),
            panels.clone(),
            config.rooms(),
        ));
        let controls = Arc::new(ControlSurface::new(
            platform.clone(),
            registry.clone(),
            panels,
            waiters.clone(),
            config.control_policy(),
        ));

        Dispatcher {
            platform,
            registry,
            coordinator,
            controls,
            waiters,
            command_prefix: config.command_prefix.clone(),
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Route a single event, spawning its handler onto `join_set`
    pub fn dispatch(&self, event: Event, join_set: &mut JoinSet<()>) {
        match event {
            Event::Ready(ready) => {
                tracing::info!(user = %ready.user, "bridge is ready");
            }
            Event::VoiceStateUpdate(update) => {
                let coordinator = self.coordinator.clone();

                join_set.spawn(async move {
                    let transitions = coordinator.handle_voice_state(&update).await;
                    if !transitions.is_empty() {
                        tracing::debug!(member = %update.member.id, ?transitions, "voice state handled");
                    }
                });
            }
            Event::ComponentInteraction(interaction) => {
                let controls = self.controls.clone();

                join_set.spawn(async move {
                    if let Err(e) = controls.handle_interaction(&interaction).await {
                        tracing::warn!(
                            interaction = %interaction.id,
                            error = %format!("{:#}", e),
                            "interaction failed"
                        );
                    }
                });
            }
            Event::MessageCreate(message) => {
                if self.waiters.deliver(&message) {
                    tracing::debug!(author = %message.author, "message handed to a waiting prompt");
                }
                self.handle_command(message, join_set);
            }
            Event::Reply(reply) => {
                tracing::warn!(request = reply.request, "reply was not routed to the bridge");
            }
        }
    }

    fn handle_command(&self, message: MessageCreateEvent, join_set: &mut JoinSet<()>) {
        let command = message.content.trim().strip_prefix(&self.command_prefix);
        if command != Some("ping") {
            return;
        }

        let platform = self.platform.clone();
        join_set.spawn(async move {
            if let Err(e) = platform
                .send_message(message.channel, &MessageContent::text("Pong!"))
                .await
            {
                tracing::warn!(channel = %message.channel, error = %e, "could not answer ping");
            }
        });
    }
}
