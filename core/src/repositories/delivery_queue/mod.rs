pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::MemoryDeliveryQueue;
pub use r#trait::{DeliveryQueue, ReceivedMessage};

#[cfg(test)]
mod tests;
