/// Component ids of panel controls
pub mod action;
/// Command line and environment configuration
pub mod config;
/// Leader-only rename and kick flows behind the panel buttons
pub mod control;
/// Routing of gateway events to their handlers
pub mod dispatcher;
/// Room creation, refresh and teardown driven by voice state updates
pub mod lifecycle;
/// Control panel rendering and the one-message-per-room reconciliation
pub mod panel;
/// Capability interface of the chat platform and its bridge-backed implementation
pub mod platform;
/// In-memory room records and per-channel locking
pub mod room;
/// Await-next-message primitive used by prompts
pub mod waiters;
