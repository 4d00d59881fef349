//! Realtime whiteboard and shared pomodoro timer server.
//!
//! Connections join rooms over WebSocket. Each room holds a document (freehand strokes and
//! placed images) and a pomodoro timer that ticks on the server, independent of any client.
//! Document edits are relayed to the other members of the room; timer events go to all of
//! them.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
