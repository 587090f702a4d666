use crate::{
    errors::ServiceError,
    utils::{Method, Metrics, Status},
};
use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use prometheus_client::registry::Registry;
use tokio::time::Instant;
use tracing::{error, info};

/// Span of an in-flight service operation and when it began.
pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

/// Span plus request metrics bookkeeping shared by every service.
#[derive(Clone)]
pub struct ServiceTracer {
    name: &'static str,
    metrics: Metrics,
}

impl ServiceTracer {
    /// `name` is the otel tracer name; dashes become underscores in metric names.
    pub fn new(name: &'static str, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(&name.replace('-', "_"), registry);

        Self { name, metrics }
    }

    fn tracer(&self) -> BoxedTracer {
        global::tracer(self.name)
    }

    pub fn start(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.tracer();
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    pub fn complete_success(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete(tracing_ctx, method, true, message);
    }

    pub fn complete_error(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete(tracing_ctx, method, false, message);
    }

    /// Closes the span with the outcome of `result` and hands it back.
    pub fn finish<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        result: Result<T, ServiceError>,
        success_message: &str,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(_) => self.complete_success(tracing_ctx, method, success_message),
            Err(e) => self.complete_error(tracing_ctx, method, &e.to_string()),
        }
        result
    }

    fn complete(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            Status::Success
        } else {
            Status::Error
        };
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

        tracing_ctx.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        self.metrics.record(method, status, elapsed);

        tracing_ctx.cx.span().end();
    }
}
