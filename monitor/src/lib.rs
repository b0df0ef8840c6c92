mod compare;
mod fetch;
mod metrics;
mod scheduler;

pub use compare::compare;
pub use fetch::fetch;
pub use metrics::{Metrics, HEARTBEAT_METRIC, PRICE_ERRORS_METRIC, PROVIDER_FAILURES_METRIC};
pub use scheduler::{Monitor, MonitorSettings, MIN_INTERVAL};
