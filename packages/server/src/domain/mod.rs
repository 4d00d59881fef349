//! ドメイン層：ルームの状態、タイマーの状態機械、保存と配信の抽象化

pub mod entity;
pub mod error;
pub mod event;
pub mod lenient;
pub mod pusher;
pub mod registry;
pub mod repository;
pub mod timer;
pub mod value_object;

pub use entity::{
    Document, DrawingSegment, ImageDescriptor, Line, MIN_IMAGE_SIZE, MutationOutcome, Point,
    RoomState, TickTask,
};
pub use error::{MessagePushError, ValueObjectError};
pub use event::{RoomEvent, RoomSnapshot};
pub use lenient::Lenient;
pub use pusher::{MessagePusher, PusherChannel};
pub use registry::{ConnectionRegistry, Member};
pub use repository::{RoomRepository, SharedRoom};
pub use timer::{Phase, PhaseTransition, TickOutcome, TimerSettings, TimerState};
pub use value_object::{ConnectionId, FALLBACK_ROOM_ID, ImageId, RoomId, Timestamp};
