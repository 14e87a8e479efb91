//! Prometheus registry and snapshot helpers.
//!
//! # Design
//! - Collector registration is private; callers only see typed increment helpers.
//! - Each `Metrics` value owns its own registry so tests never collide.

use std::sync::Arc;

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across the service.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    auth_failures_total: IntCounterVec,
    emails_sent_total: IntCounterVec,
    uploads_total: IntCounter,
    upload_bytes_total: IntCounter,
}

/// Point-in-time view of the counters, used by tests and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Emails handed to the transport successfully.
    pub emails_sent: u64,
    /// Emails that failed to render or send.
    pub emails_failed: u64,
    /// Files stored through the upload endpoint.
    pub uploads_total: u64,
    /// Bytes written by the upload endpoint.
    pub upload_bytes_total: u64,
}

impl Metrics {
    /// Construct a registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::MetricsRegister`] if a collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = register(
            &registry,
            "http_requests_total",
            IntCounterVec::new(
                Opts::new("http_requests_total", "Total HTTP requests served"),
                &["route", "code"],
            ),
        )?;
        let auth_failures_total = register(
            &registry,
            "auth_failures_total",
            IntCounterVec::new(
                Opts::new(
                    "auth_failures_total",
                    "Requests rejected by authentication or role guards",
                ),
                &["guard", "reason"],
            ),
        )?;
        let emails_sent_total = register(
            &registry,
            "emails_sent_total",
            IntCounterVec::new(
                Opts::new("emails_sent_total", "Transactional emails by outcome"),
                &["outcome"],
            ),
        )?;
        let uploads_total = register(
            &registry,
            "uploads_total",
            IntCounter::with_opts(Opts::new("uploads_total", "Files stored via upload")),
        )?;
        let upload_bytes_total = register(
            &registry,
            "upload_bytes_total",
            IntCounter::with_opts(Opts::new(
                "upload_bytes_total",
                "Bytes written by the upload endpoint",
            )),
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                auth_failures_total,
                emails_sent_total,
                uploads_total,
                upload_bytes_total,
            }),
        })
    }

    /// Count a served request by matched route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Count a guard rejection.
    pub fn inc_auth_failure(&self, guard: &str, reason: &str) {
        self.inner
            .auth_failures_total
            .with_label_values(&[guard, reason])
            .inc();
    }

    /// Count an email delivery attempt by outcome (`sent` or `failed`).
    pub fn inc_email(&self, outcome: &str) {
        self.inner
            .emails_sent_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Record one stored upload of `bytes` bytes.
    pub fn record_upload(&self, bytes: u64) {
        self.inner.uploads_total.inc();
        self.inner.upload_bytes_total.inc_by(bytes);
    }

    /// Render the registry in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the output is not UTF-8.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.inner.registry.gather(), &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            emails_sent: self.email_count("sent"),
            emails_failed: self.email_count("failed"),
            uploads_total: self.inner.uploads_total.get(),
            upload_bytes_total: self.inner.upload_bytes_total.get(),
        }
    }

    /// Rejections recorded for one guard and reason pair.
    #[must_use]
    pub fn auth_failure_count(&self, guard: &str, reason: &str) -> u64 {
        self.inner
            .auth_failures_total
            .get_metric_with_label_values(&[guard, reason])
            .map_or(0, |counter| counter.get())
    }

    fn email_count(&self, outcome: &str) -> u64 {
        self.inner
            .emails_sent_total
            .get_metric_with_label_values(&[outcome])
            .map_or(0, |counter| counter.get())
    }
}

fn register<C>(
    registry: &Registry,
    name: &'static str,
    collector: prometheus::Result<C>,
) -> Result<C>
where
    C: Collector + Clone + 'static,
{
    let collector = collector.map_err(|source| TelemetryError::MetricsRegister { name, source })?;
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })?;
    Ok(collector)
}
