//! Guard Chain
//!
//! Request gating as an explicit, ordered list of named guards. Each
//! guard inspects a snapshot of the request and either lets it continue
//! (optionally contributing response headers) or halts it with a
//! terminal response. The chain applies guards in order and
//! short-circuits on the first halt.

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::client::extract_client_ip;

/// Immutable snapshot of the request parts guards are allowed to see
#[derive(Debug, Clone)]
pub struct GuardContext {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub client_ip: Option<IpAddr>,
}

impl GuardContext {
    pub fn from_request(req: &Request<Body>) -> Self {
        let direct_ip = req
            .extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
            .map(|info| info.0.ip());

        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            headers: req.headers().clone(),
            client_ip: extract_client_ip(req.headers(), direct_ip),
        }
    }
}

/// Outcome of a single guard
pub enum GuardDecision {
    /// Let the request continue; headers are appended to the response
    Continue(HeaderMap),
    /// Stop here and return this response
    Halt(Response),
}

impl GuardDecision {
    /// Continue without contributing response headers
    pub fn pass() -> Self {
        GuardDecision::Continue(HeaderMap::new())
    }
}

type GuardFuture = Pin<Box<dyn Future<Output = GuardDecision> + Send>>;
type GuardFn = Arc<dyn Fn(GuardContext) -> GuardFuture + Send + Sync>;

/// A guard with a stable name (for logs and tests)
#[derive(Clone)]
pub struct NamedGuard {
    name: &'static str,
    check: GuardFn,
}

impl NamedGuard {
    pub fn new<F, Fut>(name: &'static str, check: F) -> Self
    where
        F: Fn(GuardContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GuardDecision> + Send + 'static,
    {
        Self {
            name,
            check: Arc::new(move |ctx| Box::pin(check(ctx))),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn check(&self, ctx: GuardContext) -> GuardDecision {
        (self.check)(ctx).await
    }
}

/// Ordered guard list with short-circuit semantics
#[derive(Clone, Default)]
pub struct GuardChain {
    guards: Arc<Vec<NamedGuard>>,
}

impl GuardChain {
    pub fn new(guards: Vec<NamedGuard>) -> Self {
        Self {
            guards: Arc::new(guards),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    /// Apply every guard in order against the given context
    ///
    /// Returns the accumulated response headers on success, or the
    /// halting guard's response (carrying any headers accumulated before
    /// the halt).
    pub async fn evaluate(&self, ctx: &GuardContext) -> Result<HeaderMap, Response> {
        let mut accumulated = HeaderMap::new();

        for guard in self.guards.iter() {
            match guard.check(ctx.clone()).await {
                GuardDecision::Continue(headers) => {
                    accumulated.extend(headers);
                }
                GuardDecision::Halt(mut response) => {
                    tracing::debug!(guard = guard.name(), path = %ctx.path, "Guard halted request");
                    let halt_headers = std::mem::take(response.headers_mut());
                    accumulated.extend(halt_headers);
                    *response.headers_mut() = accumulated;
                    return Err(response);
                }
            }
        }

        Ok(accumulated)
    }

    /// Axum middleware entry point
    pub async fn run(&self, req: Request<Body>, next: Next) -> Response {
        let ctx = GuardContext::from_request(&req);

        match self.evaluate(&ctx).await {
            Ok(headers) => {
                let mut response = next.run(req).await;
                response.headers_mut().extend(headers);
                response
            }
            Err(response) => response,
        }
    }
}
