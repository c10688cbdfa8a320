mod registry;
mod voice_room;

pub use self::registry::{ChannelGuard, RoomRegistry};
pub use self::voice_room::Room;
