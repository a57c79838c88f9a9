use crate::context::RequestContext;
use crate::error::DispatchError;
use crate::payload::{JsonDecoder, PayloadDecoder};
use crate::registry::{HandlerRegistry, Instantiated, Resolved};
use crate::resource::Operation;
use crate::response::{Finalized, ResponseState};
use crate::router::Router;
use http::Method;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Data field carrying the decode failure kind on a `400` response.
pub const JSON_ERROR_KEY: &str = "json_error";

/// A request as handed over by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub method: Method,
    /// Raw request path, base path and query string included
    pub path: String,
    pub body: Vec<u8>,
}

impl InboundRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }
}

/// The terminal state a request reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No template matched (404)
    NoRoute,
    /// The matched handler identifier is not registered (500)
    Unresolved,
    /// The resource refused during construction; its own response is sent
    Halted,
    /// The resource does not implement the method (405)
    MethodNotAllowed,
    /// A mutating request carried a body that failed to decode (400)
    BadPayload,
    /// The operation ran to completion
    Invoked(Operation),
    /// The operation returned an error or panicked (500)
    OperationFailed,
}

impl Disposition {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::NoRoute => "no_route",
            Disposition::Unresolved => "unresolved",
            Disposition::Halted => "halted",
            Disposition::MethodNotAllowed => "method_not_allowed",
            Disposition::BadPayload => "bad_payload",
            Disposition::Invoked(_) => "invoked",
            Disposition::OperationFailed => "operation_failed",
        }
    }
}

/// Outcome of [`Dispatcher::handle`]: exactly one response per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub disposition: Disposition,
    pub response: Finalized,
}

/// Drives one request from raw path to finalized response.
///
/// Holds only read-only shared state, so a single dispatcher (or its clones)
/// can serve any number of requests concurrently.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    registry: Arc<HandlerRegistry>,
    decoder: Arc<dyn PayloadDecoder>,
}

impl Dispatcher {
    /// Create a dispatcher decoding bodies with [`JsonDecoder`].
    #[must_use]
    pub fn new(router: Router, registry: HandlerRegistry) -> Self {
        Self {
            router: Arc::new(router),
            registry: Arc::new(registry),
            decoder: Arc::new(JsonDecoder),
        }
    }

    /// Replace the payload decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl PayloadDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Handler identifiers named by the route table but missing from the
    /// registry, in table order. Requests to those routes end in a 500.
    #[must_use]
    pub fn unresolved_handlers(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for route in self.router.table().iter() {
            let name = route.handler();
            if !self.registry.contains(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    /// Dispatch one request.
    #[must_use]
    pub fn handle(&self, req: &InboundRequest) -> Dispatched {
        let start = Instant::now();
        let uri = self.router.api_uri(&req.path);
        let (disposition, res) = self.run(&req.method, &uri, &req.body);
        let response = res.finalize();

        info!(
            method = %req.method,
            path = %req.path,
            uri = %uri,
            status = response.status,
            disposition = disposition.as_str(),
            duration_us = start.elapsed().as_micros(),
            "Request dispatched"
        );

        Dispatched {
            disposition,
            response,
        }
    }

    fn run(&self, method: &Method, uri: &str, body: &[u8]) -> (Disposition, ResponseState) {
        let path = request_path(uri);

        let Some(matched) = self.router.route(uri) else {
            let err = DispatchError::RouteNotFound {
                uri: path.to_string(),
            };
            return (Disposition::NoRoute, reject(ResponseState::new(path), &err));
        };

        let handler = matched.handler_name().to_string();
        let kind = match self.registry.resolve(&handler) {
            Resolved::Kind(kind) => kind,
            Resolved::Unresolved => {
                error!(
                    uri = %path,
                    handler_name = %handler,
                    "Handler not registered"
                );
                let err = DispatchError::HandlerResolutionFailure {
                    uri: path.to_string(),
                    handler,
                };
                return (Disposition::Unresolved, reject(ResponseState::new(path), &err));
            }
        };

        let payload = self.decoder.decode(body);
        let ctx = RequestContext::new(
            method.clone(),
            uri,
            matched.path_params,
            self.router.table().clone(),
            payload,
        );
        let mut res = ResponseState::new(ctx.uri());

        let instance = match kind.instantiate(&ctx, &mut res) {
            Instantiated::Ready(instance) => instance,
            Instantiated::Halted => {
                info!(
                    uri = %ctx.uri(),
                    handler_name = %kind.name(),
                    status = res.status(),
                    "Resource halted during construction"
                );
                return (Disposition::Halted, res);
            }
        };

        let Some(op) = Operation::from_method(method).filter(|op| instance.supports(*op)) else {
            warn!(
                uri = %ctx.uri(),
                method = %method,
                handler_name = %kind.name(),
                "Method not implemented by resource"
            );
            let err = DispatchError::MethodNotAllowed {
                method: method.clone(),
            };
            return (Disposition::MethodNotAllowed, reject(res, &err));
        };

        // An empty body is never a decode failure.
        let status = ctx.payload().status();
        if ctx.is_mutating() && status.is_failure() {
            warn!(
                uri = %ctx.uri(),
                method = %method,
                json_error = status.as_str(),
                body_size_bytes = ctx.payload().raw().len(),
                "Request body rejected"
            );
            let mut res = reject(res, &DispatchError::PayloadDecodeFailure { status });
            res.insert(JSON_ERROR_KEY, status.as_str());
            return (Disposition::BadPayload, res);
        }

        debug!(uri = %ctx.uri(), operation = %op, handler_name = %kind.name(), "Invoking operation");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            instance.invoke(op, &ctx, &mut res)
        }));
        let source = match outcome {
            Ok(Some(Ok(()))) => return (Disposition::Invoked(op), res),
            Ok(Some(Err(source))) => source,
            Ok(None) => anyhow::anyhow!("operation {op} vanished from the operation table"),
            Err(panic) => anyhow::anyhow!("operation panicked: {}", panic_message(&*panic)),
        };

        error!(
            uri = %ctx.uri(),
            operation = %op,
            handler_name = %kind.name(),
            error = %format!("{source:#}"),
            "Operation failed"
        );
        // Partial output from the failed operation is discarded.
        let err = DispatchError::OperationFailed {
            method: method.clone(),
            source,
        };
        (Disposition::OperationFailed, reject(ResponseState::new(ctx.uri()), &err))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("router", &self.router)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn reject(mut res: ResponseState, err: &DispatchError) -> ResponseState {
    res.hyper_status(err.status(), err.to_string());
    res
}

fn request_path(uri: &str) -> &str {
    match uri.split_once('?') {
        Some(("", _)) => "/",
        Some((path, _)) => path,
        None => uri,
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
