//! # Public API Scenarios
//!
//! The client's typed operations exercised end to end against the recording
//! host window: what goes out on the wire, and what the application sees
//! when the host answers or calls in.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use bridge_bus::testing::PARENT_ORIGIN;
    use bridge_bus::{BusConfig, InitializationState, KeyEvent};
    use bridge_types::{
        BridgeError, DeepLinkParameters, FrameContext, FrameContexts, HostClientType, RawMessage,
        TabInstanceParameters,
    };
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    // =============================================================================
    // INITIALIZATION
    // =============================================================================

    #[test]
    fn test_calls_before_initialize_are_rejected() {
        let harness = Harness::new();

        let err = harness.client.get_context(|_| {}).unwrap_err();
        assert!(matches!(err, BridgeError::Uninitialized));
        assert_eq!(err.to_string(), "The library has not yet been initialized");
        assert_eq!(harness.platform.message_count(), 0);
    }

    #[test]
    fn test_initialize_sends_handshake() {
        let harness = Harness::new();

        harness.client.initialize(None);

        let messages = harness.platform.messages();
        assert_eq!(messages.len(), 1);
        let init = &messages[0];
        assert_eq!(init.id, 0);
        assert_eq!(init.func, "initialize");
        assert_eq!(init.args, vec![json!(BusConfig::default().version)]);
    }

    #[test]
    fn test_repeated_initialize_sends_one_frame() {
        let harness = Harness::new();

        harness.client.initialize(None);
        harness.client.initialize(None);
        harness.client.initialize(None);

        assert_eq!(harness.platform.message_count(), 1);
    }

    #[test]
    fn test_invalid_origin_is_ignored() {
        let harness = Harness::new();
        harness.client.initialize(None);
        let init = harness.platform.find_message_by_func("initialize").unwrap();

        harness
            .platform
            .respond_from("https://some-malicious-site.com", &init, vec![json!("content")]);

        assert_eq!(
            harness.bus().state(),
            InitializationState::AwaitingHandshakeResponse
        );
        assert_eq!(harness.metrics.snapshot().dropped_origin, 1);
    }

    #[test]
    fn test_message_without_data_is_ignored() {
        let harness = Harness::new();
        harness.client.initialize(None);

        harness
            .platform
            .process_message(RawMessage::new(PARENT_ORIGIN, Value::Null));

        assert_eq!(
            harness.bus().state(),
            InitializationState::AwaitingHandshakeResponse
        );
        assert_eq!(harness.metrics.snapshot().dropped_malformed, 1);
    }

    #[test]
    fn test_calls_wait_for_handshake_response() {
        let harness = Harness::new();
        harness.client.initialize(None);

        harness.client.get_context(|_| {}).unwrap();
        assert_eq!(harness.platform.message_count(), 1);

        let init = harness.platform.find_message_by_func("initialize").unwrap();
        harness
            .platform
            .respond_to_message(&init, vec![json!("content")]);

        assert_eq!(harness.sent_funcs(), vec!["initialize", "getContext"]);
        let get_context = harness.platform.find_message_by_func("getContext").unwrap();
        assert_eq!(get_context.id, 1);
    }

    #[test]
    fn test_initialize_with_frame_context() {
        let harness = Harness::new();
        let frame_context = FrameContext {
            content_url: "someContentUrl".into(),
            website_url: "someWebsiteUrl".into(),
        };

        harness
            .client
            .initialize_with_frame_context(&frame_context, None)
            .unwrap();
        let init = harness.platform.find_message_by_func("initialize").unwrap();
        harness
            .platform
            .respond_to_message(&init, vec![json!("content")]);

        assert_eq!(harness.sent_funcs(), vec!["initialize", "setFrameContext"]);
        let set = harness.platform.find_message_by_func("setFrameContext").unwrap();
        assert_eq!(
            set.args,
            vec![json!({ "contentUrl": "someContentUrl", "websiteUrl": "someWebsiteUrl" })]
        );
    }

    // =============================================================================
    // CONTEXT
    // =============================================================================

    #[test]
    fn test_get_context_delivers_host_payload() {
        let harness = Harness::ready("content");
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();

        harness
            .client
            .get_context(move |context| *sink.lock() = Some(context))
            .unwrap();
        let call = harness.platform.find_message_by_func("getContext").unwrap();
        harness.platform.respond_to_message(
            &call,
            vec![json!({
                "groupId": "someGroupId",
                "teamId": "someTeamId",
                "entityId": "someEntityId",
                "locale": "someLocale",
                "frameContext": "settings",
                "hostClientType": "web",
            })],
        );

        let context = received.lock().take().unwrap();
        assert_eq!(context.group_id.as_deref(), Some("someGroupId"));
        assert_eq!(context.entity_id.as_deref(), Some("someEntityId"));
        assert_eq!(context.frame_context, Some(FrameContexts::Settings));
        assert_eq!(context.host_client_type, Some(HostClientType::Web));
    }

    #[test]
    fn test_get_context_fills_missing_frame_context() {
        let harness = Harness::ready("sidePanel");
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();

        harness
            .client
            .get_context(move |context| *sink.lock() = Some(context))
            .unwrap();
        let call = harness.platform.find_message_by_func("getContext").unwrap();
        harness
            .platform
            .respond_to_message(&call, vec![json!({ "locale": "someLocale" })]);

        let context = received.lock().take().unwrap();
        assert_eq!(context.frame_context, Some(FrameContexts::SidePanel));
    }

    #[test]
    fn test_host_client_type_from_handshake() {
        let harness = Harness::new();
        harness
            .platform
            .initialize_with_context(harness.bus(), "content", Some("android"));

        assert_eq!(
            harness.bus().handshake_response(),
            Some(vec![json!("content"), json!("android")])
        );
        assert_eq!(harness.bus().frame_context().as_deref(), Some("content"));
    }

    // =============================================================================
    // DEEP LINKS
    // =============================================================================

    #[test]
    fn test_execute_deep_link_failure_reaches_callback() {
        let harness = Harness::ready("content");
        let outcome = Arc::new(Mutex::new(None));
        let sink = outcome.clone();

        harness
            .client
            .execute_deep_link(
                "dummyLink",
                Some(Box::new(move |success, reason| {
                    *sink.lock() = Some((success, reason))
                })),
            )
            .unwrap();
        let call = harness.platform.find_message_by_func("executeDeepLink").unwrap();
        harness
            .platform
            .respond_to_message(&call, vec![json!(false), json!("Something went wrong...")]);

        assert_eq!(
            *outcome.lock(),
            Some((false, Some("Something went wrong...".to_string())))
        );
    }

    #[test]
    fn test_execute_deep_link_without_callback_uses_generic_handler() {
        let harness = Harness::ready("content");
        let outcome = Arc::new(Mutex::new(Vec::new()));
        let sink = outcome.clone();
        harness
            .client
            .set_generic_completion_handler(move |success, reason| {
                sink.lock().push((success, reason))
            });

        harness.client.execute_deep_link("dummyLink", None).unwrap();
        let call = harness.platform.find_message_by_func("executeDeepLink").unwrap();
        harness
            .platform
            .respond_to_message(&call, vec![json!(false), json!("X")]);

        assert_eq!(*outcome.lock(), vec![(false, Some("X".to_string()))]);
    }

    #[test]
    fn test_share_deep_link() {
        let harness = Harness::ready("content");

        harness
            .client
            .share_deep_link(&DeepLinkParameters {
                sub_entity_id: "someSubEntityId".into(),
                sub_entity_label: "someSubEntityLabel".into(),
                sub_entity_web_url: Some("someSubEntityWebUrl".into()),
            })
            .unwrap();

        let call = harness.platform.find_message_by_func("shareDeepLink").unwrap();
        assert_eq!(
            call.args,
            vec![
                json!("someSubEntityId"),
                json!("someSubEntityLabel"),
                json!("someSubEntityWebUrl")
            ]
        );
    }

    // =============================================================================
    // TAB INSTANCES
    // =============================================================================

    #[test]
    fn test_get_tab_instances_round_trip() {
        let harness = Harness::ready("content");
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();

        harness
            .client
            .get_tab_instances(move |info| *sink.lock() = Some(info), None)
            .unwrap();
        let call = harness.platform.find_message_by_func("getTabInstances").unwrap();
        assert_eq!(call.args, vec![Value::Null]);
        harness.platform.respond_to_message(
            &call,
            vec![json!({ "teamTabs": [{ "tabName": "someTab" }] })],
        );

        let info = received.lock().take().unwrap();
        assert_eq!(info.team_tabs.len(), 1);
        assert_eq!(info.team_tabs[0].tab_name, "someTab");
    }

    #[test]
    fn test_get_mru_tab_instances_forwards_params() {
        let harness = Harness::ready("content");
        let params = TabInstanceParameters {
            favorite_channels_only: Some(true),
            favorite_teams_only: None,
        };

        harness
            .client
            .get_mru_tab_instances(|_| {}, Some(&params))
            .unwrap();

        let call = harness
            .platform
            .find_message_by_func("getMruTabInstances")
            .unwrap();
        assert_eq!(call.args, vec![json!({ "favoriteChannelsOnly": true })]);
    }

    // =============================================================================
    // HOST EVENTS
    // =============================================================================

    #[test]
    fn test_back_button_without_handler_navigates_back() {
        let harness = Harness::ready("content");

        harness.platform.send_message("backButtonPress", Vec::new());

        assert_eq!(
            harness.platform.find_messages_by_func("navigateBack").len(),
            1
        );
        assert_eq!(harness.metrics.snapshot().default_actions, 1);
    }

    #[test]
    fn test_back_button_handler_suppresses_navigation() {
        let harness = Harness::ready("content");
        harness.client.register_back_button_handler(|| true).unwrap();

        harness.platform.send_message("backButtonPress", Vec::new());

        assert!(harness.platform.find_message_by_func("navigateBack").is_none());
    }

    #[test]
    fn test_before_unload_without_handler_acknowledges() {
        let harness = Harness::ready("content");

        harness.platform.send_message("beforeUnload", Vec::new());

        assert_eq!(
            harness.platform.find_messages_by_func("readyToUnload").len(),
            1
        );
    }

    #[test]
    fn test_before_unload_handler_defers_acknowledgment() {
        let harness = Harness::ready("content");
        let pending = Arc::new(Mutex::new(None));
        let sink = pending.clone();
        harness
            .client
            .register_before_unload_handler(move |ready| {
                *sink.lock() = Some(ready);
                true
            })
            .unwrap();

        harness.platform.send_message("beforeUnload", Vec::new());
        assert!(harness.platform.find_message_by_func("readyToUnload").is_none());

        pending.lock().take().unwrap().signal();
        assert_eq!(
            harness.platform.find_messages_by_func("readyToUnload").len(),
            1
        );
    }

    #[test]
    fn test_change_settings_handler() {
        let harness = Harness::ready("settings");
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        harness
            .client
            .register_enter_settings_handler(move || *counter.lock() += 1)
            .unwrap();

        harness.platform.send_message("changeSettings", Vec::new());

        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn test_handler_registration_is_queued_during_handshake() {
        let harness = Harness::new();
        harness.client.initialize(None);

        harness
            .client
            .register_on_theme_change_handler(|_| {})
            .unwrap();
        assert_eq!(harness.platform.message_count(), 1);

        let init = harness.platform.find_message_by_func("initialize").unwrap();
        harness
            .platform
            .respond_to_message(&init, vec![json!("content")]);

        let announce = harness.platform.find_message_by_func("registerHandler").unwrap();
        assert_eq!(announce.args, vec![json!("themeChange")]);
    }

    #[test]
    fn test_unknown_host_call_without_handler_is_dropped() {
        let harness = Harness::ready("content");
        let before = harness.platform.message_count();

        harness.platform.send_message("someUnknownEvent", vec![json!(1)]);

        assert_eq!(harness.platform.message_count(), before);
        assert_eq!(harness.metrics.snapshot().host_calls_received, 1);
    }

    // =============================================================================
    // PRINT
    // =============================================================================

    #[test]
    fn test_print_shortcut_ctrl_and_meta() {
        let harness = Harness::ready("content");
        harness.client.enable_print_capability().unwrap();
        harness.client.enable_print_capability().unwrap();

        harness
            .platform
            .dispatch_key_event(KeyEvent::new(80, true, false));
        harness
            .platform
            .dispatch_key_event(KeyEvent::new(80, false, true));
        harness
            .platform
            .dispatch_key_event(KeyEvent::new(80, false, false));
        harness
            .platform
            .dispatch_key_event(KeyEvent::new(81, true, false));

        assert_eq!(harness.platform.print_count(), 2);
    }
}
