mod gracefullshutdown;
mod logs;
mod metrics;
mod otel;
mod parse_datetime;
mod tracer;

pub use self::gracefullshutdown::shutdown_signal;
pub use self::logs::init_logger;
pub use self::metrics::{Method, Metrics, Status, SystemMetrics, run_metrics_collector};
pub use self::otel::Telemetry;
pub use self::parse_datetime::{deserialize_optional_datetime, parse_filter_datetime};
pub use self::tracer::{ServiceTracer, TracingContext};
