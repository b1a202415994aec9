pub mod client;
pub mod connector;

pub use client::{RealtimeClient, ReconnectPolicy};
pub use connector::{DynPushConnector, PushConnector, PushSession};
