use anyhow::{Context as _, Result};
use opentelemetry::global;
use opentelemetry_otlp::{LogExporter, MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider,
};

/// OTLP pipelines of the process. Providers are kept so `shutdown` can flush
/// them before exit.
pub struct Telemetry {
    endpoint: String,
    resource: Resource,
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Telemetry {
    pub fn new(service_name: impl Into<String>, endpoint: String) -> Self {
        let resource = Resource::builder()
            .with_service_name(service_name.into())
            .build();

        Self {
            endpoint,
            resource,
            tracer_provider: None,
            meter_provider: None,
            logger_provider: None,
        }
    }

    pub fn init_tracer(&mut self) -> Result<SdkTracerProvider> {
        let exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&self.endpoint)
            .build()
            .context("span exporter")?;

        let provider = SdkTracerProvider::builder()
            .with_resource(self.resource.clone())
            .with_batch_exporter(exporter)
            .build();

        global::set_tracer_provider(provider.clone());
        Ok(self.tracer_provider.insert(provider).clone())
    }

    pub fn init_meter(&mut self) -> Result<SdkMeterProvider> {
        let exporter = MetricExporter::builder()
            .with_tonic()
            .with_endpoint(&self.endpoint)
            .build()
            .context("metric exporter")?;

        let provider = SdkMeterProvider::builder()
            .with_resource(self.resource.clone())
            .with_periodic_exporter(exporter)
            .build();

        global::set_meter_provider(provider.clone());
        Ok(self.meter_provider.insert(provider).clone())
    }

    /// The logger provider is not installed globally; it feeds the tracing
    /// bridge built by [`super::init_logger`].
    pub fn init_logger(&mut self) -> Result<SdkLoggerProvider> {
        let exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(&self.endpoint)
            .build()
            .context("log exporter")?;

        let provider = SdkLoggerProvider::builder()
            .with_resource(self.resource.clone())
            .with_batch_exporter(exporter)
            .build();

        Ok(self.logger_provider.insert(provider).clone())
    }

    pub fn shutdown(self) -> Result<()> {
        let results = [
            ("tracer", self.tracer_provider.map(|p| p.shutdown())),
            ("meter", self.meter_provider.map(|p| p.shutdown())),
            ("logger", self.logger_provider.map(|p| p.shutdown())),
        ];

        let failures: Vec<String> = results
            .into_iter()
            .filter_map(|(name, result)| match result {
                Some(Err(e)) => Some(format!("{name} provider: {e}")),
                _ => None,
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("telemetry shutdown failed: {}", failures.join(", "))
        }
    }
}
