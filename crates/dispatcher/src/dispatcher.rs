//! Dispatcher - routes one invocation to the simulated or live path

use std::sync::Arc;
use std::time::Duration;

use contracts::{
    ApiCatalog, ApiDefinition, DispatcherSettings, InvocationMode, InvocationRequest, Params,
    ResponseEnvelope, ResponseSource, SandboxConfig,
};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use transport::HttpTransport;

use crate::error::DispatchError;
use crate::live;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::simulation::SimulationTable;

/// Builder for creating a Dispatcher
#[derive(Debug)]
pub struct DispatcherBuilder {
    catalog: Arc<ApiCatalog>,
    settings: DispatcherSettings,
    simulations: SimulationTable,
}

impl DispatcherBuilder {
    /// Start from a catalog with default settings and the built-in simulation rules
    pub fn new(catalog: impl Into<Arc<ApiCatalog>>) -> Self {
        Self {
            catalog: catalog.into(),
            settings: DispatcherSettings::default(),
            simulations: SimulationTable::builtin(),
        }
    }

    /// Start from a loaded configuration document
    pub fn from_config(config: SandboxConfig) -> Self {
        let (settings, catalog) = config.into_parts();
        Self::new(catalog).settings(settings)
    }

    pub fn settings(mut self, settings: DispatcherSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Override the simulated-mode delay
    pub fn simulated_delay_ms(mut self, delay_ms: u64) -> Self {
        self.settings.simulated_delay_ms = delay_ms;
        self
    }

    /// Override the live-mode origin
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    pub fn simulations(mut self, simulations: SimulationTable) -> Self {
        self.simulations = simulations;
        self
    }

    /// Validate settings and attach the transport
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self, transport),
        fields(apis = self.catalog.len(), transport = transport.name())
    )]
    pub fn build<T: HttpTransport>(self, transport: T) -> Result<Dispatcher<T>, DispatchError> {
        config_loader::validate_settings(&self.settings)?;

        info!(
            base_url = %self.settings.base_url,
            simulated_delay_ms = self.settings.simulated_delay_ms,
            "Dispatcher ready"
        );

        Ok(Dispatcher {
            catalog: self.catalog,
            settings: self.settings,
            transport,
            simulations: self.simulations,
            metrics: Arc::new(DispatchMetrics::new()),
        })
    }

    /// Validate settings and attach a reqwest transport built from them
    #[cfg(feature = "live-http")]
    pub fn build_live(self) -> Result<Dispatcher<transport::ReqwestTransport>, DispatchError> {
        let transport = transport::ReqwestTransport::from_settings(&self.settings)?;
        self.build(transport)
    }
}

/// Routes invocations against an immutable catalog
///
/// Holds no per-call state; `invoke` may run concurrently from many tasks.
#[derive(Debug)]
pub struct Dispatcher<T> {
    catalog: Arc<ApiCatalog>,
    settings: DispatcherSettings,
    transport: T,
    simulations: SimulationTable,
    metrics: Arc<DispatchMetrics>,
}

impl<T: HttpTransport> Dispatcher<T> {
    pub fn catalog(&self) -> &ApiCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Shared counters
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Execute one invocation
    ///
    /// # Errors
    /// `ApiNotFound` when `api_id` is not in the catalog. Every other
    /// failure is reported through the envelope.
    #[instrument(
        name = "dispatcher_invoke",
        skip(self, params, credential),
        fields(api_id = %api_id, mode = %mode, params = params.len())
    )]
    pub async fn invoke(
        &self,
        api_id: &str,
        params: &Params,
        mode: InvocationMode,
        credential: Option<&str>,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let Some(api) = self.catalog.get(api_id) else {
            warn!("Unknown api id");
            self.metrics.inc_not_found();
            observability::record_unknown_api(api_id);
            return Err(DispatchError::api_not_found(api_id));
        };

        let envelope = match mode {
            InvocationMode::Simulated => self.simulate(api, params).await,
            InvocationMode::Live => self.call_live(api, params, credential).await,
        };

        self.metrics.observe(&envelope);
        observability::record_invocation(
            api_id,
            envelope.source,
            envelope.success,
            envelope.latency,
        );

        Ok(envelope)
    }

    /// `invoke` with the fields of an `InvocationRequest`
    pub async fn invoke_request(
        &self,
        request: &InvocationRequest,
    ) -> Result<ResponseEnvelope, DispatchError> {
        self.invoke(
            &request.api_id,
            &request.params,
            request.mode,
            request.credential.as_deref(),
        )
        .await
    }

    async fn simulate(&self, api: &ApiDefinition, params: &Params) -> ResponseEnvelope {
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(self.settings.simulated_delay_ms)).await;

        let data = self.simulations.synthesize(&api.id, params);
        let latency = elapsed_ms(started);
        debug!(latency, "Simulated response produced");

        ResponseEnvelope::success(ResponseSource::Simulated, data, latency)
    }

    #[instrument(
        name = "dispatcher_call_live",
        skip_all,
        fields(method = %api.method, endpoint = %api.endpoint, transport = self.transport.name())
    )]
    async fn call_live(
        &self,
        api: &ApiDefinition,
        params: &Params,
        credential: Option<&str>,
    ) -> ResponseEnvelope {
        let started = Instant::now();

        let outcome = match live::build_request(&self.settings, api, params, credential) {
            Ok(request) => self.transport.send(request).await,
            Err(e) => Err(e),
        };
        let envelope = live::normalize(outcome, elapsed_ms(started));

        if envelope.success {
            debug!(latency = envelope.latency, "Live call succeeded");
        } else {
            warn!(
                latency = envelope.latency,
                error = envelope.error.as_deref().unwrap_or_default(),
                "Live call failed"
            );
        }

        envelope
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Convenience function to create a live-capable dispatcher from a config document
#[cfg(feature = "live-http")]
#[instrument(name = "dispatcher_create", skip(config), fields(apis = config.apis.len()))]
pub fn create_dispatcher(
    config: SandboxConfig,
) -> Result<Dispatcher<transport::ReqwestTransport>, DispatchError> {
    DispatcherBuilder::from_config(config).build_live()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ApiParameter, HttpMethod, ParamKind};
    use serde_json::json;
    use transport::{MockTransport, TransportError};

    fn api(id: &str, params: &[&str]) -> ApiDefinition {
        ApiDefinition {
            id: id.into(),
            name: id.to_uppercase(),
            category: "Checkers".into(),
            description: String::new(),
            method: HttpMethod::Post,
            endpoint: format!("/api/{id}"),
            parameters: params
                .iter()
                .map(|name| ApiParameter {
                    name: name.to_string(),
                    kind: ParamKind::String,
                    required: true,
                    label: name.to_string(),
                    placeholder: None,
                    pattern: None,
                    description: None,
                })
                .collect(),
            documentation_url: None,
        }
    }

    fn catalog() -> ApiCatalog {
        ApiCatalog::new(vec![
            api("pin-checker", &["pin"]),
            api("mpesa-express", &["phoneNumber", "amount"]),
            api("customs-status", &["entryNumber"]),
        ])
    }

    fn dispatcher(transport: MockTransport) -> Dispatcher<MockTransport> {
        DispatcherBuilder::new(catalog())
            .base_url("https://sbx.example.test")
            .build(transport)
            .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_covers_delay() {
        let dispatcher = dispatcher(MockTransport::new());
        let started = Instant::now();

        let envelope = dispatcher
            .invoke(
                "pin-checker",
                &params(&[("pin", "A123456789Z")]),
                InvocationMode::Simulated,
                None,
            )
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.source, ResponseSource::Simulated);
        assert!(envelope.latency >= 800);
        assert!(started.elapsed() >= Duration::from_millis(800));
        assert_eq!(envelope.data_str("pin"), Some("A123456789Z"));
        assert!(!envelope.data_str("taxpayerName").unwrap().is_empty());
        // simulated mode never touches the network
        assert_eq!(dispatcher.transport().request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_api_is_error() {
        let dispatcher = dispatcher(MockTransport::new());

        for mode in [InvocationMode::Simulated, InvocationMode::Live] {
            let result = dispatcher.invoke("nope", &Params::new(), mode, None).await;
            assert!(matches!(
                result,
                Err(DispatchError::ApiNotFound { ref api_id }) if api_id == "nope"
            ));
        }

        assert_eq!(dispatcher.transport().request_count(), 0);
        assert_eq!(dispatcher.metrics_snapshot().not_found, 2);
        assert_eq!(dispatcher.metrics_snapshot().total_envelopes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_rule_is_superset() {
        let dispatcher = dispatcher(MockTransport::new());
        let submitted = params(&[("entryNumber", "24MSAIM400123456")]);

        let envelope = dispatcher
            .invoke("customs-status", &submitted, InvocationMode::Simulated, None)
            .await
            .unwrap();

        let data = envelope.data.unwrap();
        assert_eq!(data["message"], json!("Success"));
        assert_eq!(data["entryNumber"], json!("24MSAIM400123456"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mpesa_ids_distinct_across_calls() {
        let dispatcher = dispatcher(MockTransport::new());
        let empty = Params::new();
        let call = || dispatcher.invoke("mpesa-express", &empty, InvocationMode::Simulated, None);

        let first = call().await.unwrap();
        let second = call().await.unwrap();

        assert_ne!(
            first.data_str("CheckoutRequestID"),
            second.data_str("CheckoutRequestID")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay_and_rules() {
        let dispatcher = DispatcherBuilder::new(catalog())
            .simulated_delay_ms(5)
            .simulations(SimulationTable::empty().with_rule("pin-checker", |_| json!({ "ok": 1 })))
            .build(MockTransport::new())
            .unwrap();

        let envelope = dispatcher
            .invoke("pin-checker", &Params::new(), InvocationMode::Simulated, None)
            .await
            .unwrap();
        assert_eq!(envelope.data, Some(json!({ "ok": 1 })));
        assert!(envelope.latency >= 5);
    }

    #[test]
    fn test_zero_delay_rejected() {
        let result = DispatcherBuilder::new(catalog())
            .simulated_delay_ms(0)
            .build(MockTransport::new());
        assert!(matches!(result, Err(DispatchError::Contract(_))));
    }

    #[tokio::test]
    async fn test_live_ok() {
        let dispatcher = dispatcher(MockTransport::always_json(200, json!({ "x": 1 })));

        let envelope = dispatcher
            .invoke(
                "pin-checker",
                &params(&[("pin", "A123456789Z")]),
                InvocationMode::Live,
                Some("secret"),
            )
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data, Some(json!({ "x": 1 })));
        assert_eq!(envelope.error, None);
        assert_eq!(envelope.source, ResponseSource::Live);

        let request = dispatcher.transport().last_request().unwrap();
        assert_eq!(request.url, "https://sbx.example.test/api/pin-checker");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header_value("Authorization"), Some("Bearer secret"));
        assert_eq!(request.body_json(), Some(json!({ "pin": "A123456789Z" })));
    }

    #[tokio::test]
    async fn test_live_error_status() {
        let transport = MockTransport::always_json(400, json!({ "message": "bad pin" }));
        let dispatcher = dispatcher(transport);

        let envelope = dispatcher
            .invoke("pin-checker", &Params::new(), InvocationMode::Live, None)
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("bad pin"));
        assert_eq!(envelope.data, Some(json!({ "message": "bad pin" })));
        assert_eq!(dispatcher.metrics_snapshot().live_failure, 1);
    }

    #[tokio::test]
    async fn test_live_transport_failure() {
        let transport = MockTransport::always_fail(TransportError::connect("offline"));
        let dispatcher = dispatcher(transport);

        let envelope = dispatcher
            .invoke("pin-checker", &Params::new(), InvocationMode::Live, None)
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.data, None);
        assert!(!envelope.error.unwrap().is_empty());
        assert_eq!(envelope.source, ResponseSource::Live);
        assert_eq!(dispatcher.transport().request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_latency_tracks_transport_time() {
        let transport = MockTransport::new();
        transport.set_latency(Duration::from_millis(300));
        let dispatcher = dispatcher(transport);

        let envelope = dispatcher
            .invoke("pin-checker", &Params::new(), InvocationMode::Live, None)
            .await
            .unwrap();

        assert!(envelope.success);
        assert!(envelope.latency >= 300);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_request() {
        let dispatcher = dispatcher(MockTransport::new());
        let request = InvocationRequest::new("pin-checker").param("pin", "P051234567X");

        let envelope = dispatcher.invoke_request(&request).await.unwrap();
        assert_eq!(envelope.data_str("pin"), Some("P051234567X"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_invocations() {
        let dispatcher = Arc::new(dispatcher(MockTransport::always_json(200, json!({}))));

        let mut handles = Vec::new();
        for i in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(tokio::spawn(async move {
                let mode = InvocationMode::from_live_flag(i % 2 == 0);
                dispatcher
                    .invoke("pin-checker", &Params::new(), mode, None)
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        let snapshot = dispatcher.metrics_snapshot();
        assert_eq!(snapshot.simulated, 4);
        assert_eq!(snapshot.live_success, 4);
        assert_eq!(dispatcher.transport().request_count(), 4);
    }
}
