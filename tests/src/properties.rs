//! Property-based tests for correlation.
//!
//! These tests use proptest to check invariants over arbitrary call
//! sequences:
//! - Any number of initialize calls puts exactly one handshake on the wire
//! - Calls queued behind the handshake flush in enqueue order
//! - Ids on the wire strictly increase
//! - Arbitrary inbound payloads never panic the bus

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use bridge_bus::testing::PARENT_ORIGIN;
    use bridge_types::RawMessage;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    // Strategy for generating host function names
    fn func_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z]{0,15}"
    }

    // Strategy for generating interleavings of sends and host responses
    #[derive(Debug, Clone)]
    enum Step {
        Send(String),
        RespondToOldest,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            3 => func_strategy().prop_map(Step::Send),
            1 => Just(Step::RespondToOldest),
        ]
    }

    // Strategy for loosely shaped inbound payloads
    fn payload_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            ".*".prop_map(Value::from),
            (any::<Option<u64>>(), proptest::option::of(func_strategy())).prop_map(
                |(id, func)| json!({ "id": id, "func": func, "args": [] })
            ),
        ]
    }

    #[test]
    fn prop_repeated_initialize_sends_one_handshake() {
        proptest!(|(calls in 1usize..20)| {
            let harness = Harness::new();

            for _ in 0..calls {
                harness.client.initialize(None);
            }

            prop_assert_eq!(harness.platform.message_count(), 1);
            prop_assert_eq!(harness.sent_funcs(), vec!["initialize".to_string()]);
        });
    }

    #[test]
    fn prop_queued_calls_flush_in_enqueue_order() {
        proptest!(|(funcs in proptest::collection::vec(func_strategy(), 0..30))| {
            let harness = Harness::new();
            harness.client.initialize(None);

            for func in &funcs {
                harness.bus().send_message(func, Vec::new()).unwrap();
            }
            prop_assert_eq!(harness.platform.message_count(), 1);

            let init = harness.platform.find_message_by_func("initialize").unwrap();
            harness.platform.respond_to_message(&init, vec![json!("content")]);

            let sent = harness.sent_funcs();
            prop_assert_eq!(&sent[1..], funcs.as_slice());
        });
    }

    #[test]
    fn prop_ids_strictly_increase() {
        proptest!(|(steps in proptest::collection::vec(step_strategy(), 0..40))| {
            let harness = Harness::ready("content");
            let mut responded = 1;

            for step in steps {
                match step {
                    Step::Send(func) => {
                        harness
                            .bus()
                            .send_with_callback(&func, Vec::new(), Some(Box::new(|_: &[Value]| {})))
                            .unwrap();
                    }
                    Step::RespondToOldest => {
                        let messages = harness.platform.messages();
                        if let Some(oldest) = messages.get(responded) {
                            harness.platform.respond_to_message(oldest, Vec::new());
                            responded += 1;
                        }
                    }
                }
            }

            let ids: Vec<u64> = harness.platform.messages().iter().map(|m| m.id).collect();
            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert_eq!(ids.first().copied(), Some(0));
        });
    }

    #[test]
    fn prop_arbitrary_inbound_payloads_never_panic() {
        proptest!(|(payloads in proptest::collection::vec(payload_strategy(), 0..20))| {
            let harness = Harness::ready("content");

            for payload in payloads {
                harness
                    .platform
                    .process_message(RawMessage::new(PARENT_ORIGIN, payload));
            }

            prop_assert_eq!(harness.bus().queued_len(), 0);
        });
    }
}
