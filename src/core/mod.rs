pub(crate) mod poller;
pub(crate) mod notifications;

pub use poller::spawn_alert_poller;
pub use notifications::spawn_notification_processor;
