//! # Channel-backed Host
//!
//! The bus running over [`ChannelPlatform`], with a task playing the host on
//! the other end of the tokio channels.

#[cfg(test)]
mod tests {
    use bridge_bus::adapters::{ChannelFrame, ChannelPlatform};
    use bridge_bus::{Bus, BusConfig, InitializationState};
    use bridge_client::BridgeClient;
    use bridge_types::{OutboundCall, RawMessage};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::{mpsc, oneshot};
    use tokio::time::timeout;

    const HOST: &str = "https://host.example.com";

    fn posted_call(frame: ChannelFrame) -> OutboundCall {
        match frame {
            ChannelFrame::Posted {
                frame,
                target_origin,
            } => {
                assert_eq!(target_origin, HOST);
                serde_json::from_value(frame).unwrap()
            }
            ChannelFrame::Native(text) => panic!("expected a posted frame, got {text}"),
        }
    }

    #[tokio::test]
    async fn test_handshake_and_call_over_channels() {
        let (platform, mut outbound) = ChannelPlatform::new(Some(HOST.to_string()));
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(platform.clone().run(inbound_rx));

        let bus = Bus::new(platform, BusConfig::default()).unwrap();
        let client = BridgeClient::new(bus.clone());
        let (ready_tx, ready_rx) = oneshot::channel();
        client.initialize(Some(Box::new(move || {
            let _ = ready_tx.send(());
        })));

        let init = posted_call(outbound.recv().await.unwrap());
        assert_eq!(init.func, "initialize");
        inbound_tx
            .send(RawMessage::new(HOST, json!({ "id": init.id, "args": ["content"] })))
            .unwrap();

        timeout(Duration::from_secs(5), ready_rx)
            .await
            .expect("handshake timed out")
            .unwrap();
        assert_eq!(bus.state(), InitializationState::Ready);

        let (context_tx, context_rx) = oneshot::channel();
        client
            .get_context(move |context| {
                let _ = context_tx.send(context);
            })
            .unwrap();
        let call = posted_call(outbound.recv().await.unwrap());
        assert_eq!(call.func, "getContext");
        inbound_tx
            .send(RawMessage::new(
                HOST,
                json!({ "id": call.id, "args": [{ "locale": "en-us" }] }),
            ))
            .unwrap();

        let context = timeout(Duration::from_secs(5), context_rx)
            .await
            .expect("getContext timed out")
            .unwrap();
        assert_eq!(context.locale.as_deref(), Some("en-us"));
    }

    #[tokio::test]
    async fn test_frameless_channel_sends_native_frames() {
        let (platform, mut outbound) = ChannelPlatform::new(None);
        let bus = Bus::new(platform, BusConfig::default()).unwrap();

        bus.initialize(None, None);

        match outbound.recv().await.unwrap() {
            ChannelFrame::Native(text) => {
                let call: OutboundCall = serde_json::from_str(&text).unwrap();
                assert_eq!(call.func, "initialize");
            }
            other => panic!("expected a native frame, got {other:?}"),
        }
        assert!(!bus.is_listening());
    }
}
