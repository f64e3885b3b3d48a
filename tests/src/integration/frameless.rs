//! # Frameless Transport and Origin Allow-lists
//!
//! Without a parent window frames leave through the platform's native sink.
//! Inbound acceptance is the parent's origin plus the configured
//! allow-list.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use bridge_bus::testing::{MockPlatform, PARENT_ORIGIN};
    use bridge_bus::{BusConfig, InitializationState, SendPath};
    use serde_json::json;

    #[test]
    fn test_frameless_without_origins_installs_no_listener() {
        let harness = Harness::with(MockPlatform::frameless(), BusConfig::default());

        harness.client.initialize(None);

        assert!(!harness.platform.has_listener());
        assert!(!harness.bus().is_listening());
        assert_eq!(harness.bus().send_path(), SendPath::Frameless);
        assert_eq!(harness.sent_funcs(), vec!["initialize"]);
    }

    #[test]
    fn test_frameless_handshake_resolved_natively() {
        let harness = Harness::with(MockPlatform::frameless(), BusConfig::default());
        harness.client.initialize(None);
        harness.client.get_context(|_| {}).unwrap();

        assert!(harness.bus().resolve(0, vec![json!("content")]));

        assert_eq!(harness.bus().state(), InitializationState::Ready);
        assert_eq!(harness.sent_funcs(), vec!["initialize", "getContext"]);
    }

    #[test]
    fn test_frameless_with_allow_list_listens() {
        let config = BusConfig::default().with_valid_origins(["https://host.example.com"]);
        let harness = Harness::with(MockPlatform::frameless(), config);
        harness.client.initialize(None);
        let init = harness.platform.find_message_by_func("initialize").unwrap();

        assert!(harness.platform.has_listener());
        harness
            .platform
            .respond_from("https://evil.example.org", &init, vec![json!("content")]);
        assert_eq!(
            harness.bus().state(),
            InitializationState::AwaitingHandshakeResponse
        );

        harness
            .platform
            .respond_from("https://host.example.com", &init, vec![json!("content")]);
        assert_eq!(harness.bus().state(), InitializationState::Ready);
    }

    #[test]
    fn test_wildcard_origin_accepted_alongside_parent() {
        let config = BusConfig::default().with_valid_origins(["https://*.example.com"]);
        let harness = Harness::with(MockPlatform::new(), config);
        harness.client.initialize(None);
        let init = harness.platform.find_message_by_func("initialize").unwrap();

        harness
            .platform
            .respond_from("https://tenant.example.com", &init, vec![json!("content")]);
        assert_eq!(harness.bus().state(), InitializationState::Ready);

        let before = harness.metrics.snapshot().host_calls_received;
        harness
            .platform
            .respond_from(PARENT_ORIGIN, &init, vec![json!("content")]);
        harness.platform.send_message("themeChange", vec![json!("dark")]);
        assert_eq!(harness.metrics.snapshot().host_calls_received, before + 1);
        assert_eq!(harness.metrics.snapshot().dropped_origin, 0);
    }

    #[test]
    fn test_invalid_origin_pattern_rejected() {
        let config = BusConfig::default().with_valid_origins(["not an origin"]);

        assert!(bridge_bus::Bus::new(MockPlatform::new(), config).is_err());
    }
}
