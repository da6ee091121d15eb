//! Opcode-routed message dispatcher.
//!
//! Handlers are registered on a [`DispatcherBuilder`] and frozen into an
//! immutable [`Dispatcher`], which is `Send + Sync` and reads its handler
//! table without locks. A handler receives the decoded request and may
//! return the paired response, which the dispatcher frames with the
//! request's rpc id.

use crate::core::codec::FrameCodec;
use crate::core::packet::Frame;
use crate::core::reader::DecodeLimits;
use crate::error::{ProtocolError, Result};
use crate::protocol::message::{ClusterMessage, ClusterRecord};
use crate::protocol::opcode::ClusterOp;
use crate::utils::metrics::{global_metrics, Metrics, Timer};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, instrument, trace, warn};

pub type HandlerFn =
    dyn Fn(ClusterMessage) -> Result<Option<ClusterMessage>> + Send + Sync + 'static;

#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<ClusterOp, Box<HandlerFn>>,
    limits: DecodeLimits,
    metrics: Option<Arc<Metrics>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds applied when decoding incoming payloads
    pub fn limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Count into `metrics` instead of the process-wide collector
    pub fn metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Route `op` to `handler`, replacing any earlier registration
    pub fn register<F>(mut self, op: ClusterOp, handler: F) -> Self
    where
        F: Fn(ClusterMessage) -> Result<Option<ClusterMessage>> + Send + Sync + 'static,
    {
        if self.handlers.insert(op, Box::new(handler)).is_some() {
            debug!(op = %op, "Replacing handler");
        }
        self
    }

    /// Route a request type to a handler producing its typed response
    pub fn on<Req, Resp, F>(self, handler: F) -> Self
    where
        Req: ClusterRecord + TryFrom<ClusterMessage, Error = ClusterMessage>,
        Resp: ClusterRecord,
        F: Fn(Req) -> Result<Resp> + Send + Sync + 'static,
    {
        self.register(Req::OP, move |message| {
            let request = Req::try_from(message).map_err(|other| {
                ProtocolError::Handler(format!("{} routed to {}", other.opcode(), Req::OP))
            })?;
            handler(request).map(|response| Some(response.into()))
        })
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            handlers: self.handlers,
            limits: self.limits,
            metrics: self.metrics,
        }
    }
}

pub struct Dispatcher {
    handlers: HashMap<ClusterOp, Box<HandlerFn>>,
    limits: DecodeLimits,
    metrics: Option<Arc<Metrics>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn metrics(&self) -> &Metrics {
        self.metrics.as_deref().unwrap_or_else(|| global_metrics())
    }

    pub fn has_handler(&self, op: ClusterOp) -> bool {
        self.handlers.contains_key(&op)
    }

    /// Decode a payload by opcode under this dispatcher's limits
    pub fn decode(&self, opcode: u32, payload: &[u8]) -> Result<ClusterMessage> {
        ClusterMessage::decode_with_limits(opcode, payload, self.limits).map_err(|e| {
            if let ProtocolError::UnknownOpcode(code) = e {
                warn!(opcode = code, "Unknown cluster opcode");
                self.metrics().unknown_opcode();
            } else {
                debug!(opcode, error = %e, "Failed to decode cluster message");
                self.metrics().decode_error();
            }
            e
        })
    }

    pub fn decode_frame(&self, frame: &Frame) -> Result<ClusterMessage> {
        let message = self.decode(u32::from(frame.opcode), &frame.payload)?;
        self.metrics().frame_decoded(frame.encoded_len() as u64);
        Ok(message)
    }

    /// Encode and frame a message under `rpc_id`
    pub fn encode(&self, message: &ClusterMessage, rpc_id: u64) -> Result<Frame> {
        let frame = message.to_frame(rpc_id)?;
        self.metrics().frame_encoded(frame.encoded_len() as u64);
        Ok(frame)
    }

    /// Decode `frame`, run its handler, and frame the reply if there is one.
    ///
    /// A request handler may only reply with the paired response; handlers
    /// registered for responses may not reply at all.
    pub fn dispatch(&self, frame: &Frame) -> Result<Option<Frame>> {
        let _timer = Timer::start("dispatch");
        let message = self.decode_frame(frame)?;
        let op = message.opcode();

        let handler = self.handlers.get(&op).ok_or_else(|| {
            debug!(op = %op, rpc_id = frame.rpc_id, "No handler registered");
            ProtocolError::NoHandler(op)
        })?;

        trace!(op = %op, rpc_id = frame.rpc_id, "Dispatching");
        let reply = match handler(message) {
            Ok(Some(reply)) => reply,
            Ok(None) => return Ok(None),
            Err(e) => {
                debug!(op = %op, rpc_id = frame.rpc_id, error = %e, "Handler failed");
                self.metrics().handler_error();
                return Err(e);
            }
        };

        match op.response() {
            Some(expected) if expected == reply.opcode() => {
                self.encode(&reply, frame.rpc_id).map(Some)
            }
            Some(expected) => {
                self.metrics().handler_error();
                Err(ProtocolError::UnexpectedResponse {
                    expected,
                    actual: reply.opcode(),
                })
            }
            None => {
                self.metrics().handler_error();
                Err(ProtocolError::Handler(format!(
                    "{} replied to {op}, which takes no reply",
                    reply.opcode()
                )))
            }
        }
    }
}

impl Dispatcher {
    /// Serve one connection until the peer closes it.
    ///
    /// Each frame is dispatched on its own: a frame that fails to decode or
    /// has no handler is logged and skipped. Only framing and I/O errors end
    /// the loop, since the byte stream can no longer be trusted after them.
    #[instrument(skip_all)]
    pub async fn serve<T>(&self, io: T, codec: FrameCodec) -> Result<()>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let mut framed = Framed::new(io, codec);

        while let Some(frame) = framed.next().await {
            let frame = frame?;
            match self.dispatch(&frame) {
                Ok(Some(reply)) => framed.send(reply).await?,
                Ok(None) => {}
                Err(e) if e.is_malformed_input() => {
                    warn!(opcode = frame.opcode, rpc_id = frame.rpc_id, error = %e, "Dropping frame");
                }
                Err(e) => {
                    debug!(opcode = frame.opcode, rpc_id = frame.rpc_id, error = %e, "Frame not handled");
                }
            }
        }

        debug!("Connection closed by peer");
        Ok(())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ops: Vec<_> = self.handlers.keys().copied().collect();
        ops.sort();
        f.debug_struct("Dispatcher")
            .field("handlers", &ops)
            .field("limits", &self.limits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::chain::PeerId;
    use crate::protocol::message::{
        AddMinorBlockResponse, AddTransactionRequest, AddTransactionResponse, Ping, Pong,
    };

    fn pong_dispatcher(metrics: Arc<Metrics>) -> Dispatcher {
        Dispatcher::builder()
            .metrics(metrics)
            .on(|_ping: Ping| Ok(Pong::new(PeerId::new(*b"S001"), vec![])))
            .build()
    }

    #[test]
    fn test_dispatch_replies_with_request_rpc_id() {
        let metrics = Arc::new(Metrics::new());
        let dispatcher = pong_dispatcher(metrics.clone());
        let ping = Ping::new(PeerId::new(*b"0000"), vec![]);
        let frame = ping.to_frame(77).unwrap();

        let reply = dispatcher.dispatch(&frame).unwrap().unwrap();
        assert_eq!(reply.rpc_id, 77);
        assert_eq!(reply.op().unwrap(), ClusterOp::Pong);

        match ClusterMessage::from_frame(&reply).unwrap() {
            ClusterMessage::Pong(pong) => assert_eq!(pong.id, PeerId::new(*b"S001")),
            other => panic!("unexpected reply {other:?}"),
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_decoded, 1);
        assert_eq!(snapshot.frames_encoded, 1);
    }

    #[test]
    fn test_missing_handler() {
        let dispatcher = pong_dispatcher(Arc::new(Metrics::new()));
        let frame = AddTransactionRequest {
            tx: Default::default(),
        }
        .to_frame(1)
        .unwrap();
        assert!(matches!(
            dispatcher.dispatch(&frame),
            Err(ProtocolError::NoHandler(ClusterOp::AddTransactionRequest))
        ));
    }

    #[test]
    fn test_mismatched_reply_is_rejected() {
        let metrics = Arc::new(Metrics::new());
        let dispatcher = Dispatcher::builder()
            .metrics(metrics.clone())
            .register(ClusterOp::AddTransactionRequest, |_| {
                Ok(Some(AddMinorBlockResponse { error_code: 0 }.into()))
            })
            .build();
        let frame = AddTransactionRequest {
            tx: Default::default(),
        }
        .to_frame(1)
        .unwrap();

        assert!(matches!(
            dispatcher.dispatch(&frame),
            Err(ProtocolError::UnexpectedResponse {
                expected: ClusterOp::AddTransactionResponse,
                actual: ClusterOp::AddMinorBlockResponse,
            })
        ));
        assert_eq!(metrics.snapshot().handler_errors, 1);
    }

    #[test]
    fn test_response_handler_without_reply() {
        let dispatcher = Dispatcher::builder()
            .metrics(Arc::new(Metrics::new()))
            .register(ClusterOp::AddTransactionResponse, |_| Ok(None))
            .build();
        let frame = AddTransactionResponse { error_code: 3 }.to_frame(5).unwrap();
        assert!(dispatcher.dispatch(&frame).unwrap().is_none());
    }

    #[test]
    fn test_unknown_opcode_is_counted() {
        let metrics = Arc::new(Metrics::new());
        let dispatcher = pong_dispatcher(metrics.clone());
        let frame = Frame {
            opcode: 200,
            rpc_id: 0,
            payload: Default::default(),
        };
        assert!(matches!(
            dispatcher.dispatch(&frame),
            Err(ProtocolError::UnknownOpcode(200))
        ));
        assert_eq!(metrics.snapshot().unknown_opcodes, 1);
    }

    #[test]
    fn test_handler_error_propagates() {
        let metrics = Arc::new(Metrics::new());
        let dispatcher = Dispatcher::builder()
            .metrics(metrics.clone())
            .on(|_: AddTransactionRequest| -> Result<AddTransactionResponse> {
                Err(ProtocolError::Handler("pool full".into()))
            })
            .build();
        let frame = AddTransactionRequest {
            tx: Default::default(),
        }
        .to_frame(1)
        .unwrap();
        assert!(matches!(
            dispatcher.dispatch(&frame),
            Err(ProtocolError::Handler(_))
        ));
        assert_eq!(metrics.snapshot().handler_errors, 1);
    }
}
