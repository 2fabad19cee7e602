use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

use crate::engine::core::app_state::SessionState;
use crate::engine::loading::model_loader::{ModelCatalog, ModelSelectionEvent};
use crate::tools::placement::state::PlacementState;
use crate::xr::session::ArSessionState;

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Resource managing bidirectional RPC communication with the frontend.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the frontend RPC layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // XR bridge traffic has its own listener; queue only RPC frames.
            if message_str.contains("jsonrpc") && !message_str.contains("\"xr_") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping the thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    state: Res<State<SessionState>>,
    session: Res<ArSessionState>,
    placement: Res<PlacementState>,
    catalog: Option<Res<ModelCatalog>>,
    mut selection_events: EventWriter<ModelSelectionEvent>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                if let Some(response) = handle_rpc_request(
                    &request,
                    &diagnostics,
                    &state,
                    &session,
                    &placement,
                    catalog.as_deref(),
                    &mut selection_events,
                ) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {parse_error}");
            }
        }
    }
}

/// Handle an individual RPC request and generate a response by method.
fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    state: &State<SessionState>,
    session: &ArSessionState,
    placement: &PlacementState,
    catalog: Option<&ModelCatalog>,
    selection_events: &mut EventWriter<ModelSelectionEvent>,
) -> Option<RpcResponse> {
    // Only requests with IDs get responses (notifications have no ID).
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "select_model" => handle_select_model(&request.params, catalog, selection_events),
        "get_session_state" => handle_get_session_state(state, session, placement),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({ "method": request.method })),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Switch to a named catalog entry. The actual re-initialisation happens in
/// the session manager, which consumes the dispatched event.
fn handle_select_model(
    params: &serde_json::Value,
    catalog: Option<&ModelCatalog>,
    selection_events: &mut EventWriter<ModelSelectionEvent>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectModelParams {
        model: String,
    }

    let parsed = serde_json::from_value::<SelectModelParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'model' parameter"))?;

    let catalog =
        catalog.ok_or_else(|| RpcError::internal_error("Model catalog not loaded yet"))?;
    let entry = catalog
        .entry(&parsed.model)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown model: {}", parsed.model)))?;

    selection_events.write(ModelSelectionEvent {
        name: entry.name.clone(),
        path: entry.path.clone(),
    });

    info!("Model selection dispatched: {}", entry.name);

    Ok(serde_json::json!({
        "success": true,
        "model": entry.name,
    }))
}

fn handle_get_session_state(
    state: &State<SessionState>,
    session: &ArSessionState,
    placement: &PlacementState,
) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "session": state.get().as_str(),
        "placed": placement.is_placed(),
        "error": session.last_error.as_ref().map(|error| error.to_string()),
    }))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({ "fps": fps }))
}

/// Create a standardised error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send a serialised message to the parent window (the frontend).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_requests_and_distinguishes_notifications() {
        let request: RpcRequest = serde_json::from_str(
            r#"{"jsonrpc":"2.0","method":"select_model","params":{"model":"sofa"},"id":7}"#,
        )
        .unwrap();
        assert_eq!(request.method, "select_model");
        assert_eq!(request.id, Some(serde_json::json!(7)));

        let notification: RpcRequest = serde_json::from_str(
            r#"{"jsonrpc":"2.0","method":"select_model","params":{"model":"sofa"}}"#,
        )
        .unwrap();
        assert!(notification.id.is_none());
    }

    #[test]
    fn error_constructors_use_standard_codes() {
        assert_eq!(RpcError::invalid_params("bad").code, -32602);
        assert_eq!(RpcError::internal_error("broken").code, -32603);
    }

    #[test]
    fn notifications_queue_until_flushed() {
        let mut interface = WebRpcInterface::default();
        interface.send_notification("status_update", serde_json::json!({ "fps": 60.0 }));
        assert_eq!(interface.outgoing_notifications.len(), 1);
        assert_eq!(interface.outgoing_notifications[0].jsonrpc, "2.0");
    }
}
