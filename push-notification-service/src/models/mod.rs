pub mod notification;

pub use notification::{Notification, NotificationPayload, NotificationRequest, TopicMessage};
