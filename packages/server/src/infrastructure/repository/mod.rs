//! Room store implementations.

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
