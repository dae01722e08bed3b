pub mod client;

pub use client::TracedClient;
