use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, window};

use crate::xr::bridge_protocol::{Decoded, decode};
use crate::xr::platform::{ArPlatform, HitPose, PlatformEvent, SessionCapabilities};

/// AR platform backed by the host page via postMessage.
///
/// The page runs the actual XR session and forwards lifecycle events,
/// viewer poses, and per-frame hit poses as JSON messages with `xr_`
/// methods; requests travel the other way as JSON-RPC notifications.
/// Incoming messages are queued by a listener closure and drained once per
/// frame. Every outbound request is stamped with the current session
/// generation and inbound messages from older generations are dropped, so a
/// torn-down incarnation can never be mutated by a late response.
pub struct WebBridgePlatform {
    incoming: Arc<Mutex<Vec<String>>>,
    pending_hit: Option<HitPose>,
    generation: u32,
}

impl WebBridgePlatform {
    pub fn new() -> Self {
        let incoming: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let queue = incoming.clone();

        let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
            // Filter to string payloads that look like bridge traffic.
            if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
                let message: String = data.into();
                if message.contains("\"xr_") {
                    if let Ok(mut queue) = queue.lock() {
                        queue.push(message);
                    }
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        if let Some(window) = window() {
            window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
                .expect("Failed to register XR bridge listener");
        }

        // Ownership moves to the JS side for the page's lifetime.
        closure.forget();

        Self {
            incoming,
            pending_hit: None,
            generation: 0,
        }
    }

    fn post(&self, method: &str, params: serde_json::Value) {
        let message = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });

        match serde_json::to_string(&message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(error) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to post XR bridge message: {error:?}");
                        }
                    } else {
                        warn!("No parent window available for XR bridge message");
                    }
                }
            }
            Err(error) => error!("Failed to serialise XR bridge message: {error}"),
        }
    }
}

impl ArPlatform for WebBridgePlatform {
    fn request_session(&mut self, capabilities: &SessionCapabilities) {
        self.post(
            "xr_request_session",
            serde_json::json!({
                "capabilities": capabilities.required,
                "generation": self.generation,
            }),
        );
    }

    fn request_hit_test_source(&mut self) {
        self.post(
            "xr_request_hit_test_source",
            serde_json::json!({ "generation": self.generation }),
        );
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        let raw = if let Ok(mut queue) = self.incoming.lock() {
            std::mem::take(&mut *queue)
        } else {
            Vec::new()
        };

        let mut events = Vec::new();
        for message in &raw {
            match decode(message, self.generation) {
                Ok(Decoded::Event(event)) => events.push(event),
                Ok(Decoded::Hit(hit)) => self.pending_hit = hit,
                Ok(Decoded::Stale) => {
                    debug!("Dropped XR bridge message from a previous generation");
                }
                Ok(Decoded::Unknown(method)) => {
                    warn!("Unknown XR bridge method: {method}");
                }
                Err(error) => {
                    warn!("Malformed XR bridge message: {error}");
                }
            }
        }
        events
    }

    fn query_hits(&mut self) -> Option<HitPose> {
        self.pending_hit.take()
    }

    fn reset(&mut self) {
        if let Ok(mut queue) = self.incoming.lock() {
            queue.clear();
        }
        self.pending_hit = None;
        self.generation = self.generation.wrapping_add(1);
        self.post(
            "xr_reset",
            serde_json::json!({ "generation": self.generation }),
        );
    }
}
