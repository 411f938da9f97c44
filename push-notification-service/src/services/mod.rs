pub mod credentials;
pub mod metrics;
pub mod providers;

pub use credentials::{CredentialsError, ServiceAccountKey};
pub use metrics::{get_metrics, init_metrics, record_dispatch};
pub use providers::{FcmProvider, MockPushProvider, ProviderError, ProviderResponse, PushProvider};
