pub mod notification_store;
pub mod realtime;
pub mod side_effects;
pub mod sync_coordinator;

pub use notification_store::NotificationStore;
pub use realtime::{DynPushConnector, PushConnector, PushSession, RealtimeClient, ReconnectPolicy};
pub use side_effects::{
    DynSystemNotifier, DynToastSink, SideEffectDispatcher, SystemNotifier, ToastSink,
};
pub use sync_coordinator::{NotificationView, SyncCoordinator};

#[cfg(test)]
pub use side_effects::{MockSystemNotifier, MockToastSink};
