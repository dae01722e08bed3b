pub mod changes;
pub mod http;
pub mod memory;
pub mod poller;
pub mod rest;
pub mod session;

pub use changes::ChangeBroadcaster;
pub use memory::InMemoryBackend;
pub use poller::OrdersPoller;
pub use rest::RestBackend;
pub use session::MemorySession;
