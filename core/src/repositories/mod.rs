//! Repository traits for the code store and the delivery queue, with
//! in-memory implementations.

pub mod code_store;
pub mod delivery_queue;

pub use code_store::{CodeStore, MemoryCodeStore};
pub use delivery_queue::{DeliveryQueue, MemoryDeliveryQueue, ReceivedMessage};
