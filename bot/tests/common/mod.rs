#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use bot::{
    control::{ControlPolicy, ControlSurface},
    lifecycle::{LifecycleCoordinator, RoomsConfig, Transition},
    panel::PanelRenderer,
    platform::{Platform, PlatformError, PlatformResult},
    room::RoomRegistry,
    waiters::MessageWaiters,
};
use comms::{
    event::{ComponentInteractionEvent, MessageCreateEvent, VoiceStateUpdateEvent},
    model::{ChannelId, InteractionId, Member, MessageContent, MessageId, UserId, VoiceChannel},
};

pub const SOURCE: ChannelId = ChannelId(10);
pub const CATEGORY: ChannelId = ChannelId(20);
pub const ANNOUNCEMENTS: ChannelId = ChannelId(30);

pub fn alice() -> Member {
    Member::new(UserId(1), "alice")
}

pub fn bob() -> Member {
    Member::new(UserId(2), "bob")
}

pub fn carol() -> Member {
    Member::new(UserId(3), "carol")
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: u64,
    pub categories: HashSet<ChannelId>,
    pub text_channels: HashSet<ChannelId>,
    pub voice: BTreeMap<ChannelId, VoiceChannel>,
    pub messages: BTreeMap<MessageId, (ChannelId, MessageContent)>,
    /// Every initial interaction response, in order
    pub responses: Vec<(InteractionId, MessageContent)>,
    /// Initial responses not deleted yet
    pub live_responses: HashMap<InteractionId, MessageContent>,
    pub updates: Vec<(InteractionId, MessageContent)>,
    /// Every follow-up, in order
    pub followups: Vec<(InteractionId, MessageContent)>,
    pub live_followups: HashMap<MessageId, MessageContent>,
    /// Names of the platform calls, in order
    pub calls: Vec<String>,
    pub fail_create: bool,
    pub fail_move: bool,
    pub fail_rename: bool,
    pub fail_delete_message: bool,
}

impl FakeState {
    fn id(&mut self) -> u64 {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn call(&mut self, name: &str, target: impl std::fmt::Display) {
        self.calls.push(format!("{} {}", name, target));
    }

    fn location(&self, user: UserId) -> Option<ChannelId> {
        self.voice
            .values()
            .find(|channel| channel.members.iter().any(|member| member.id == user))
            .map(|channel| channel.id)
    }

    fn place(&mut self, member: &Member, channel: Option<ChannelId>) -> Option<ChannelId> {
        let before = self.location(member.id);
        for voice in self.voice.values_mut() {
            voice.members.retain(|m| m.id != member.id);
        }
        if let Some(voice) = channel.and_then(|channel| self.voice.get_mut(&channel)) {
            voice.members.push(member.clone());
        }
        before
    }
}

/// In-memory platform with one source channel, one category and one announcement channel
#[derive(Debug)]
pub struct FakePlatform {
    state: Mutex<FakeState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        let mut state = FakeState::default();
        state.categories.insert(CATEGORY);
        state.text_channels.insert(ANNOUNCEMENTS);
        state.voice.insert(
            SOURCE,
            VoiceChannel {
                id: SOURCE,
                name: String::from("➕ create"),
                members: Vec::new(),
            },
        );

        FakePlatform {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Move `member` like a user would and return the resulting voice state update
    pub fn connect(&self, member: &Member, channel: Option<ChannelId>) -> VoiceStateUpdateEvent {
        let before = self.state().place(member, channel);

        VoiceStateUpdateEvent {
            member: member.clone(),
            before,
            after: channel,
        }
    }

    pub fn location(&self, user: UserId) -> Option<ChannelId> {
        self.state().location(user)
    }

    pub fn voice_members(&self, channel: ChannelId) -> Vec<UserId> {
        self.state()
            .voice
            .get(&channel)
            .map(|voice| voice.members.iter().map(|m| m.id).collect())
            .unwrap_or_default()
    }

    pub fn voice_name(&self, channel: ChannelId) -> Option<String> {
        self.state().voice.get(&channel).map(|voice| voice.name.clone())
    }

    pub fn voice_exists(&self, channel: ChannelId) -> bool {
        self.state().voice.contains_key(&channel)
    }

    /// Messages currently in the announcement channel
    pub fn panels(&self) -> Vec<(MessageId, MessageContent)> {
        self.state()
            .messages
            .iter()
            .filter(|(_, (channel, _))| *channel == ANNOUNCEMENTS)
            .map(|(id, (_, content))| (*id, content.clone()))
            .collect()
    }

    pub fn panel_description(&self, message: MessageId) -> String {
        self.state()
            .messages
            .get(&message)
            .and_then(|(_, content)| content.embed.as_ref())
            .map(|embed| embed.description.clone())
            .unwrap_or_default()
    }

    /// Someone deletes a message by hand
    pub fn delete_externally(&self, message: MessageId) {
        self.state().messages.remove(&message);
    }

    pub fn post_user_message(&self, author: UserId, channel: ChannelId, content: &str) -> MessageCreateEvent {
        let mut state = self.state();
        let id = MessageId(state.id());
        state
            .messages
            .insert(id, (channel, MessageContent::text(content)));

        MessageCreateEvent {
            id,
            channel,
            author,
            content: String::from(content),
        }
    }

    pub fn count_calls(&self, name: &str) -> usize {
        let prefix = format!("{} ", name);
        self.state()
            .calls
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn response_texts(&self) -> Vec<String> {
        self.state()
            .responses
            .iter()
            .filter_map(|(_, content)| content.text.clone())
            .collect()
    }

    pub fn followup_texts(&self) -> Vec<String> {
        self.state()
            .followups
            .iter()
            .filter_map(|(_, content)| content.text.clone())
            .collect()
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn category_exists(&self, category: ChannelId) -> PlatformResult<bool> {
        let mut state = self.state();
        state.call("category_exists", category);
        Ok(state.categories.contains(&category))
    }

    async fn create_voice_channel(
        &self,
        category: ChannelId,
        name: &str,
    ) -> PlatformResult<ChannelId> {
        let mut state = self.state();
        state.call("create_voice_channel", name);
        if state.fail_create {
            return Err(PlatformError::Rejected(String::from("missing permissions")));
        }
        if !state.categories.contains(&category) {
            return Err(PlatformError::NotFound);
        }

        let id = ChannelId(state.id());
        state.voice.insert(
            id,
            VoiceChannel {
                id,
                name: String::from(name),
                members: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn rename_channel(&self, channel: ChannelId, name: &str) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("rename_channel", channel);
        if state.fail_rename {
            return Err(PlatformError::Rejected(String::from("rate limited")));
        }
        let voice = state.voice.get_mut(&channel).ok_or(PlatformError::NotFound)?;
        voice.name = String::from(name);
        Ok(())
    }

    async fn delete_channel(&self, channel: ChannelId) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("delete_channel", channel);
        state
            .voice
            .remove(&channel)
            .map(|_| ())
            .ok_or(PlatformError::NotFound)
    }

    async fn voice_channel(&self, channel: ChannelId) -> PlatformResult<VoiceChannel> {
        let mut state = self.state();
        state.call("voice_channel", channel);
        state.voice.get(&channel).cloned().ok_or(PlatformError::NotFound)
    }

    async fn move_member(&self, member: UserId, channel: Option<ChannelId>) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("move_member", member);
        if state.fail_move {
            return Err(PlatformError::Rejected(String::from("member left voice")));
        }
        let from = state.location(member).ok_or(PlatformError::NotFound)?;
        let moved = state
            .voice
            .get(&from)
            .and_then(|voice| voice.members.iter().find(|m| m.id == member).cloned())
            .ok_or(PlatformError::NotFound)?;
        state.place(&moved, channel);
        Ok(())
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> PlatformResult<MessageId> {
        let mut state = self.state();
        state.call("send_message", channel);
        if !state.text_channels.contains(&channel) {
            return Err(PlatformError::NotFound);
        }
        let id = MessageId(state.id());
        state.messages.insert(id, (channel, content.clone()));
        Ok(id)
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &MessageContent,
    ) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("edit_message", message);
        match state.messages.get_mut(&message) {
            Some((in_channel, existing)) if *in_channel == channel => {
                *existing = content.clone();
                Ok(())
            }
            _ => Err(PlatformError::NotFound),
        }
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("delete_message", message);
        if state.fail_delete_message {
            return Err(PlatformError::Rejected(String::from("service unavailable")));
        }
        let posted_here = matches!(
            state.messages.get(&message),
            Some((in_channel, _)) if *in_channel == channel
        );
        if !posted_here {
            return Err(PlatformError::NotFound);
        }

        state.messages.remove(&message);
        Ok(())
    }

    async fn fetch_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("fetch_message", message);
        match state.messages.get(&message) {
            Some((in_channel, _)) if *in_channel == channel => Ok(()),
            _ => Err(PlatformError::NotFound),
        }
    }

    async fn respond(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("respond", interaction);
        state.responses.push((interaction, content.clone()));
        state.live_responses.insert(interaction, content.clone());
        Ok(())
    }

    async fn update_message(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("update_message", interaction);
        state.updates.push((interaction, content.clone()));
        Ok(())
    }

    async fn delete_response(&self, interaction: InteractionId) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("delete_response", interaction);
        state
            .live_responses
            .remove(&interaction)
            .map(|_| ())
            .ok_or(PlatformError::NotFound)
    }

    async fn send_followup(
        &self,
        interaction: InteractionId,
        content: &MessageContent,
    ) -> PlatformResult<MessageId> {
        let mut state = self.state();
        state.call("send_followup", interaction);
        let id = MessageId(state.id());
        state.followups.push((interaction, content.clone()));
        state.live_followups.insert(id, content.clone());
        Ok(id)
    }

    async fn delete_followup(
        &self,
        interaction: InteractionId,
        message: MessageId,
    ) -> PlatformResult<()> {
        let mut state = self.state();
        state.call("delete_followup", interaction);
        state
            .live_followups
            .remove(&message)
            .map(|_| ())
            .ok_or(PlatformError::NotFound)
    }
}

/// The core components wired on top of a [FakePlatform]
pub struct Harness {
    pub platform: Arc<FakePlatform>,
    pub registry: Arc<RoomRegistry>,
    pub waiters: Arc<MessageWaiters>,
    pub coordinator: Arc<LifecycleCoordinator>,
    pub controls: Arc<ControlSurface>,
    next_interaction: Mutex<u64>,
}

impl Harness {
    pub fn new() -> Self {
        let platform = Arc::new(FakePlatform::new());
        let dyn_platform: Arc<dyn Platform> = platform.clone();
        let registry = Arc::new(RoomRegistry::new());
        let waiters = Arc::new(MessageWaiters::new());
        let panels = Arc::new(PanelRenderer::new(dyn_platform.clone(), ANNOUNCEMENTS));
        let coordinator = Arc::new(LifecycleCoordinator::new(
            dyn_platform.clone(),
            registry.clone(),
            panels.clone(),
            RoomsConfig {
                source_channel: SOURCE,
                voice_category: CATEGORY,
            },
        ));
        let controls = Arc::new(ControlSurface::new(
            dyn_platform,
            registry.clone(),
            panels,
            waiters.clone(),
            ControlPolicy::default(),
        ));

        Harness {
            platform,
            registry,
            waiters,
            coordinator,
            controls,
            next_interaction: Mutex::new(0),
        }
    }

    /// Move `member` to `channel` and let the coordinator react
    pub async fn voice(&self, member: &Member, channel: Option<ChannelId>) -> Vec<Transition> {
        let update = self.platform.connect(member, channel);
        self.coordinator.handle_voice_state(&update).await
    }

    /// `member` joins the source channel, then the move into their new room is reported too.
    /// Returns the new room's channel.
    pub async fn create_room_for(&self, member: &Member) -> ChannelId {
        let transitions = self.voice(member, Some(SOURCE)).await;
        let Some(Transition::Created(channel)) = transitions.first().copied() else {
            panic!("expected a room to be created, got {:?}", transitions);
        };

        let moved = VoiceStateUpdateEvent {
            member: member.clone(),
            before: Some(SOURCE),
            after: Some(channel),
        };
        self.coordinator.handle_voice_state(&moved).await;

        channel
    }

    pub fn interaction(
        &self,
        user: UserId,
        custom_id: &str,
        values: &[&str],
    ) -> ComponentInteractionEvent {
        let mut next = self.next_interaction.lock().unwrap();
        *next += 1;

        ComponentInteractionEvent {
            id: InteractionId(*next),
            channel: ANNOUNCEMENTS,
            user,
            custom_id: String::from(custom_id),
            values: values.iter().map(|value| String::from(*value)).collect(),
        }
    }

    pub async fn until_waiting(&self, count: usize) {
        while self.waiters.pending() < count {
            tokio::task::yield_now().await;
        }
    }
}
