use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::metrics::{counter::Counter, family::Family, gauge::Gauge};
use prometheus_client::registry::Registry;
use prometheus_client_derive_encode::{EncodeLabelSet, EncodeLabelValue};
use std::{
    sync::{Arc, atomic::AtomicU64},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

const SAMPLE_INTERVAL: Duration = Duration::from_secs(15);

/// Process and host gauges refreshed by [`run_metrics_collector`].
#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    pub resident_memory_bytes: Gauge,
    pub virtual_memory_bytes: Gauge,
    pub available_memory_bytes: Gauge,
    pub threads: Gauge,
    pub cpu_usage_percent: Gauge<f64, AtomicU64>,
    pub start_time_seconds: Gauge,
}

impl SystemMetrics {
    pub fn new() -> Self {
        let metrics = Self::default();

        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        metrics.start_time_seconds.set(started as i64);

        metrics
    }

    pub fn register(&self, registry: &mut Registry) {
        let process = registry.sub_registry_with_prefix("process");
        process.register(
            "resident_memory_bytes",
            "Resident memory of this process",
            self.resident_memory_bytes.clone(),
        );
        process.register(
            "virtual_memory_bytes",
            "Virtual memory of this process",
            self.virtual_memory_bytes.clone(),
        );
        process.register(
            "threads",
            "Threads owned by this process",
            self.threads.clone(),
        );
        process.register(
            "start_time_seconds",
            "Start time of the process since unix epoch in seconds",
            self.start_time_seconds.clone(),
        );

        let host = registry.sub_registry_with_prefix("system");
        host.register(
            "available_memory_bytes",
            "Memory available to new processes",
            self.available_memory_bytes.clone(),
        );
        host.register(
            "cpu_usage_percent",
            "Global CPU usage between the last two samples",
            self.cpu_usage_percent.clone(),
        );
    }

    /// CPU usage needs two refreshes of the same `System` to be meaningful.
    pub fn sample(&self, sys: &mut System, pid: Pid) {
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        self.available_memory_bytes
            .set(sys.available_memory() as i64);
        self.cpu_usage_percent
            .set(f64::from(sys.global_cpu_usage()));

        if let Some(process) = sys.process(pid) {
            self.resident_memory_bytes.set(process.memory() as i64);
            self.virtual_memory_bytes
                .set(process.virtual_memory() as i64);

            if let Some(tasks) = process.tasks() {
                self.threads.set(tasks.len() as i64);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Status {
    Success,
    Error,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct Labels {
    pub method: Method,
    pub status: Status,
}

/// Per-service operation counter and latency histogram.
#[derive(Clone, Debug)]
pub struct Metrics {
    pub requests: Family<Labels, Counter>,
    pub request_duration: Family<Labels, Histogram>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            requests: Family::default(),
            // 1ms .. ~8s
            request_duration: Family::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.001, 2.0, 14))
            }),
        }
    }

    /// Registers `{service}_requests_total` and
    /// `{service}_request_duration_seconds`.
    pub fn register(&self, service: &str, registry: &mut Registry) {
        registry.register(
            format!("{service}_requests"),
            format!("Operations handled by the {service}"),
            self.requests.clone(),
        );
        registry.register(
            format!("{service}_request_duration_seconds"),
            format!("Operation latency of the {service}"),
            self.request_duration.clone(),
        );
    }

    pub fn record(&self, method: Method, status: Status, duration_secs: f64) {
        let labels = Labels { method, status };
        self.requests.get_or_create(&labels).inc();
        self.request_duration
            .get_or_create(&labels)
            .observe(duration_secs);
    }
}

pub async fn run_metrics_collector(system_metrics: Arc<SystemMetrics>) {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            warn!("Process metrics disabled, cannot resolve own pid: {e}");
            return;
        }
    };

    let mut sys = System::new();
    let mut interval = tokio::time::interval(SAMPLE_INTERVAL);

    loop {
        interval.tick().await;
        system_metrics.sample(&mut sys, pid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn recorded_requests_show_up_in_registry() {
        let mut registry = Registry::default();
        let metrics = Metrics::new();
        metrics.register("cart_service", &mut registry);

        metrics.record(Method::Post, Status::Success, 0.02);
        metrics.record(Method::Post, Status::Error, 0.5);

        let mut output = String::new();
        encode(&mut output, &registry).unwrap();

        assert!(output.contains("cart_service_requests_total"));
        assert!(output.contains("method=\"Post\",status=\"Error\""));
        assert!(output.contains("cart_service_request_duration_seconds_bucket"));
    }

    #[test]
    fn sampling_own_process_fills_memory_gauges() {
        let metrics = SystemMetrics::new();
        let pid = sysinfo::get_current_pid().unwrap();
        let mut sys = System::new();

        metrics.sample(&mut sys, pid);

        assert!(metrics.resident_memory_bytes.get() > 0);
        assert!(metrics.available_memory_bytes.get() > 0);
        assert!(metrics.start_time_seconds.get() > 0);
    }

    #[test]
    fn system_gauges_are_prefixed() {
        let mut registry = Registry::default();
        SystemMetrics::new().register(&mut registry);

        let mut output = String::new();
        encode(&mut output, &registry).unwrap();

        assert!(output.contains("process_resident_memory_bytes"));
        assert!(output.contains("process_start_time_seconds"));
        assert!(output.contains("system_cpu_usage_percent"));
    }
}
