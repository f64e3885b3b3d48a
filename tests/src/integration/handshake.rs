//! # Handshake and Correlation
//!
//! Readiness gating, queue flushing, multi-callback handshake delivery and
//! the silent-drop cases of the inbound path.

#[cfg(test)]
mod tests {
    use crate::fixtures::{recorder, Harness};
    use bridge_bus::{InitializationState, ResponseCallback, Submission};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[test]
    fn test_initialize_callbacks_run_in_registration_order() {
        let harness = Harness::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let sink = order.clone();
            harness
                .client
                .initialize(Some(Box::new(move || sink.lock().push(n))));
        }
        assert!(order.lock().is_empty());

        let init = harness.platform.find_message_by_func("initialize").unwrap();
        harness
            .platform
            .respond_to_message(&init, vec![json!("content")]);

        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(harness.platform.message_count(), 1);
    }

    #[test]
    fn test_late_initialize_callback_runs_immediately_with_known_context() {
        let harness = Harness::ready("content");
        let (log, callback) = recorder();

        harness.bus().initialize(None, Some(callback()));

        assert_eq!(*log.lock(), vec![vec![json!("content")]]);
        assert_eq!(harness.platform.message_count(), 1);
    }

    #[test]
    fn test_duplicate_handshake_response_is_dropped() {
        let harness = Harness::new();
        let (log, callback) = recorder();
        harness.bus().initialize(None, Some(callback()));
        let init = harness.platform.find_message_by_func("initialize").unwrap();

        harness
            .platform
            .respond_to_message(&init, vec![json!("content")]);
        harness
            .platform
            .respond_to_message(&init, vec![json!("settings")]);

        assert_eq!(log.lock().len(), 1);
        assert_eq!(harness.bus().frame_context().as_deref(), Some("content"));
        assert_eq!(harness.metrics.snapshot().handshakes_completed, 1);
    }

    #[test]
    fn test_queued_calls_flush_in_order_with_fresh_ids() {
        let harness = Harness::new();
        harness.client.initialize(None);

        let submissions: Vec<Submission> = ["first", "second", "third"]
            .iter()
            .map(|func| harness.bus().send_message(func, Vec::new()).unwrap())
            .collect();
        assert_eq!(
            submissions,
            vec![Submission::Queued(1), Submission::Queued(2), Submission::Queued(3)]
        );
        assert_eq!(harness.bus().queued_len(), 3);

        let init = harness.platform.find_message_by_func("initialize").unwrap();
        harness
            .platform
            .respond_to_message(&init, vec![json!("content")]);

        let messages = harness.platform.messages();
        let flushed: Vec<(u64, &str)> = messages[1..]
            .iter()
            .map(|m| (m.id, m.func.as_str()))
            .collect();
        assert_eq!(flushed, vec![(1, "first"), (2, "second"), (3, "third")]);
        assert_eq!(harness.bus().queued_len(), 0);
        assert_eq!(harness.metrics.snapshot().calls_flushed, 3);
    }

    #[test]
    fn test_response_for_unknown_id_is_silently_dropped() {
        let harness = Harness::ready("content");
        let (log, callback) = recorder();
        let id = harness
            .bus()
            .send_with_callback("getContext", Vec::new(), Some(callback()))
            .unwrap()
            .id()
            .unwrap();

        let mut stray = harness.platform.find_message_by_func("getContext").unwrap();
        stray.id = id + 100;
        harness.platform.respond_to_message(&stray, vec![json!(1)]);

        assert!(log.lock().is_empty());
        assert_eq!(harness.bus().pending_count(), 1);
        assert_eq!(harness.metrics.snapshot().dropped_unmatched, 1);
    }

    #[test]
    fn test_response_delivered_once() {
        let harness = Harness::ready("content");
        let (log, callback) = recorder();
        harness
            .bus()
            .send_with_callback("getContext", Vec::new(), Some(callback()))
            .unwrap();
        let call = harness.platform.find_message_by_func("getContext").unwrap();

        harness.platform.respond_to_message(&call, vec![json!("a")]);
        harness.platform.respond_to_message(&call, vec![json!("b")]);

        assert_eq!(*log.lock(), vec![vec![json!("a")]]);
    }

    #[test]
    fn test_callback_may_issue_nested_calls() {
        let harness = Harness::ready("content");
        let bus = harness.bus().clone();
        let nested: ResponseCallback = Box::new(move |_: &[Value]| {
            let _ = bus.send_message("nested", Vec::new());
        });
        harness
            .bus()
            .send_with_callback("outer", Vec::new(), Some(nested))
            .unwrap();
        let outer = harness.platform.find_message_by_func("outer").unwrap();

        harness.platform.respond_to_message(&outer, Vec::new());

        let nested = harness.platform.find_message_by_func("nested").unwrap();
        assert!(nested.id > outer.id);
    }

    #[test]
    fn test_teardown_allows_fresh_handshake() {
        let harness = Harness::ready("content");
        harness.client.register_back_button_handler(|| true).unwrap();

        harness.bus().teardown();
        assert_eq!(harness.bus().state(), InitializationState::Uninitialized);
        assert!(!harness.platform.has_listener());
        assert!(!harness.bus().has_handler("backButtonPress"));
        assert!(harness.client.get_context(|_| {}).is_err());

        harness.platform.clear_messages();
        harness.client.initialize(None);

        let init = harness.platform.find_message_by_func("initialize").unwrap();
        assert_eq!(init.id, 0);
        assert_eq!(harness.platform.listener_installs(), 2);
    }
}
