pub mod health;
pub mod metrics;
pub mod notification;
pub mod root;

pub use health::{health_check, readiness_check};
pub use notification::send_notification;
pub use root::hello;
