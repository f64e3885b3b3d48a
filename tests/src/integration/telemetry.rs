//! # Telemetry Wiring
//!
//! Prometheus counters fed by a bus doing real work.

#[cfg(test)]
mod tests {
    use bridge_bus::testing::MockPlatform;
    use bridge_bus::{Bus, BusConfig};
    use bridge_telemetry::{encode_registry, PrometheusBusMetrics};
    use prometheus::Registry;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_prometheus_counters_follow_traffic() {
        let registry = Registry::new();
        let metrics = Arc::new(PrometheusBusMetrics::new(&registry).unwrap());
        let platform = MockPlatform::new();
        let bus = Bus::with_metrics(platform.clone(), BusConfig::default(), metrics).unwrap();

        bus.initialize(None, None);
        bus.send_message("getContext", Vec::new()).unwrap();
        let init = platform.find_message_by_func("initialize").unwrap();
        platform.respond_from("https://elsewhere.example.com", &init, vec![json!("content")]);
        platform.respond_to_message(&init, vec![json!("content")]);
        platform.send_message("backButtonPress", Vec::new());

        let text = encode_registry(&registry).unwrap();
        assert!(text.contains(r#"bridge_frames_sent_total{func="initialize"} 1"#));
        assert!(text.contains(r#"bridge_frames_sent_total{func="getContext"} 1"#));
        assert!(text.contains(r#"bridge_frames_dropped_total{reason="origin"} 1"#));
        assert!(text.contains(r#"bridge_frames_received_total{kind="host_call"} 1"#));
        assert!(text.contains(r#"bridge_default_actions_total{func="navigateBack"} 1"#));
        assert!(text.contains("bridge_calls_queued_total 1"));
        assert!(text.contains("bridge_calls_flushed_total 1"));
    }
}
