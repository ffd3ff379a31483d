//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 内置目录的合约测试
//! - 模拟模式 e2e 测试（虚拟时钟）
//! - 基于 MockTransport 的真实模式 e2e 测试

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{HttpMethod, ResponseEnvelope, ResponseSource};
    use serde_json::json;

    #[test]
    fn test_builtin_catalog_contract() {
        let config = ConfigLoader::builtin().unwrap();
        let catalog = config.catalog();

        let ids: Vec<_> = catalog.ids().collect();
        assert_eq!(
            ids,
            [
                "pin-checker",
                "tcc-checker",
                "nill-return",
                "vat-withholding",
                "fetch-obligations",
                "customs-status",
                "mpesa-express",
                "c2b-register",
                "b2c-payment",
                "mpesa-status",
                "mpesa-balance",
                "tax-remittance",
            ]
        );

        for api in &catalog {
            assert!(api.endpoint.starts_with('/'), "{} endpoint", api.id);
            assert_eq!(api.method, HttpMethod::Post, "{} method", api.id);
        }

        let pin_checker = catalog.get("pin-checker").unwrap();
        assert_eq!(pin_checker.required_parameters().collect::<Vec<_>>(), ["pin"]);
    }

    #[test]
    fn test_builtin_round_trips_through_toml_and_json() {
        let config = ConfigLoader::builtin().unwrap();

        let toml = ConfigLoader::to_toml(&config).unwrap();
        let from_toml = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(from_toml.apis, config.apis);
        assert_eq!(from_toml.dispatcher, config.dispatcher);

        let json = ConfigLoader::to_json(&config).unwrap();
        let from_json = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(from_json.apis, config.apis);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let ok = ResponseEnvelope::success(ResponseSource::Simulated, json!({ "a": 1 }), 800);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "success": true, "data": { "a": 1 }, "source": "SIMULATED", "latency": 800 })
        );

        let failed = ResponseEnvelope::failure(ResponseSource::Live, "API Error", None, 3);
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "success": false, "error": "API Error", "source": "LIVE", "latency": 3 })
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use config_loader::ConfigLoader;
    use contracts::{InvocationMode, InvocationRequest, Params, ResponseSource, PLACEHOLDER_PIN};
    use dispatcher::{DispatchError, Dispatcher, DispatcherBuilder};
    use observability::InvocationStatsAggregator;
    use serde_json::json;
    use transport::{MockTransport, TransportError};

    fn builtin_dispatcher(transport: MockTransport) -> Dispatcher<MockTransport> {
        DispatcherBuilder::from_config(ConfigLoader::builtin().unwrap())
            .base_url("https://sbx.example.test")
            .build(transport)
            .unwrap()
    }

    /// Every catalog entry answers in simulated mode after the configured delay
    #[tokio::test(start_paused = true)]
    async fn test_every_api_simulates() {
        let dispatcher = builtin_dispatcher(MockTransport::new());
        let delay = dispatcher.settings().simulated_delay_ms;
        let ids: Vec<String> = dispatcher.catalog().ids().map(String::from).collect();

        let mut stats = InvocationStatsAggregator::new();
        for id in &ids {
            let started = tokio::time::Instant::now();
            let envelope = dispatcher
                .invoke(id, &Params::new(), InvocationMode::Simulated, None)
                .await
                .unwrap();

            assert!(envelope.success, "{id}");
            assert_eq!(envelope.source, ResponseSource::Simulated);
            assert!(envelope.data.is_some());
            assert!(envelope.latency >= delay, "{id} latency {}", envelope.latency);
            assert!(started.elapsed() >= Duration::from_millis(delay));
            stats.update(id, &envelope);
        }

        assert_eq!(dispatcher.transport().request_count(), 0);
        assert_eq!(dispatcher.metrics_snapshot().simulated, ids.len() as u64);

        let summary = stats.summary();
        assert_eq!(summary.total, 12);
        assert_eq!(summary.failed, 0);
        assert!(summary.simulated_latency_ms.min >= delay as f64);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pin_checker_feeds_certificate() {
        let dispatcher = builtin_dispatcher(MockTransport::new());

        let request = InvocationRequest::new("pin-checker").param("pin", "A123456789Z");
        let envelope = dispatcher.invoke_request(&request).await.unwrap();

        let subject = envelope.certificate_subject().unwrap();
        assert_eq!(subject.pin, "A123456789Z");
        assert_eq!(subject.name, "JOHN DOE");

        // without a pin the certificate falls back to the placeholder
        let envelope = dispatcher
            .invoke("pin-checker", &Params::new(), InvocationMode::Simulated, None)
            .await
            .unwrap();
        assert_eq!(envelope.certificate_subject().unwrap().pin, PLACEHOLDER_PIN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_api_produces_no_envelope() {
        let dispatcher = builtin_dispatcher(MockTransport::new());

        let err = dispatcher
            .invoke("not-a-real-api", &Params::new(), InvocationMode::Live, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::ApiNotFound { .. }));
        assert!(err.to_string().contains("not-a-real-api"));
        assert_eq!(dispatcher.transport().request_count(), 0);
    }

    /// Scripted live session: ok, api error, network failure, non-JSON body
    #[tokio::test]
    async fn test_live_session() {
        let transport = MockTransport::new();
        transport
            .push_json(200, json!({ "x": 1 }))
            .push_json(400, json!({ "message": "bad pin" }))
            .push_failure(TransportError::connect("dns error"))
            .push_raw(502, "<html>Bad Gateway</html>");
        let dispatcher = builtin_dispatcher(transport);

        let params = Params::from([("pin".to_string(), "A123456789Z".to_string())]);
        let mut envelopes = Vec::new();
        for _ in 0..4 {
            let envelope = dispatcher
                .invoke("pin-checker", &params, InvocationMode::Live, Some("key"))
                .await
                .unwrap();
            assert_eq!(envelope.source, ResponseSource::Live);
            envelopes.push(envelope);
        }

        assert!(envelopes[0].success);
        assert_eq!(envelopes[0].data, Some(json!({ "x": 1 })));
        assert_eq!(envelopes[0].error, None);

        assert!(!envelopes[1].success);
        assert_eq!(envelopes[1].error.as_deref(), Some("bad pin"));
        assert_eq!(envelopes[1].data, Some(json!({ "message": "bad pin" })));

        assert!(!envelopes[2].success);
        assert_eq!(envelopes[2].data, None);
        assert!(!envelopes[2].error.as_deref().unwrap().is_empty());

        assert!(!envelopes[3].success);
        assert_eq!(envelopes[3].data, None);

        let snapshot = dispatcher.metrics_snapshot();
        assert_eq!(snapshot.live_success, 1);
        assert_eq!(snapshot.live_failure, 3);

        // exactly one outbound call per invocation
        let requests = dispatcher.transport().requests();
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|r| {
            r.url == "https://sbx.example.test/checker/v1/pinbypin"
                && r.header_value("Authorization") == Some("Bearer key")
        }));
    }

    /// Numeric parameters travel as text
    #[tokio::test]
    async fn test_live_body_sends_values_as_received() {
        let dispatcher = builtin_dispatcher(MockTransport::new());
        let request = InvocationRequest::new("mpesa-express")
            .param("phoneNumber", "254712345678")
            .param("amount", "100")
            .mode(InvocationMode::Live);

        dispatcher.invoke_request(&request).await.unwrap();

        let sent = dispatcher.transport().last_request().unwrap();
        assert_eq!(sent.header_value("Authorization"), Some("Bearer "));
        assert_eq!(
            sent.body_json(),
            Some(json!({ "phoneNumber": "254712345678", "amount": "100" }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_dispatcher_across_tasks() {
        let dispatcher = Arc::new(builtin_dispatcher(MockTransport::new()));

        let tasks: Vec<_> = ["mpesa-express", "b2c-payment", "tcc-checker", "mpesa-express"]
            .into_iter()
            .map(|id| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    dispatcher
                        .invoke(id, &Params::new(), InvocationMode::Simulated, None)
                        .await
                })
            })
            .collect();

        let mut checkout_ids = Vec::new();
        for task in tasks {
            let envelope = task.await.unwrap().unwrap();
            assert!(envelope.success);
            if let Some(id) = envelope.data_str("CheckoutRequestID") {
                checkout_ids.push(id.to_string());
            }
        }

        assert_eq!(checkout_ids.len(), 2);
        assert_ne!(checkout_ids[0], checkout_ids[1]);
    }
}
