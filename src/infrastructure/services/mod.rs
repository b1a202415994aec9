pub mod desktop_notifier;
pub mod stomp;
pub mod toast;
pub mod websocket_connector;

pub use desktop_notifier::DesktopNotifier;
pub use stomp::{StompCommand, StompError, StompFrame};
pub use toast::{EventToastSink, LogToastSink};
pub use websocket_connector::StompPushConnector;
