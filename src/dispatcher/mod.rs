//! Dispatcher: routes each incoming request to the first matching handler
//! and turns every failure into a localized apology.

pub mod handlers;


use crate::i18n::LocaleStore;
use boletim_core::{
    error::SkillError,
    request::{IncomingRequest, OutgoingResponse},
    traits::CovidSource,
};
use handlers::{error_response, Handler, HandlerContext, REGISTRATION_ORDER};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Ordered handler registry plus the shared read-only resources.
pub struct Dispatcher {
    handlers: Vec<Handler>,
    i18n: Arc<LocaleStore>,
    source: Arc<dyn CovidSource>,
    /// Outer invocation deadline; the in-flight handler is dropped when hit.
    deadline: Duration,
}

impl Dispatcher {
    /// Dispatcher with the standard registration order.
    pub fn new(
        i18n: Arc<LocaleStore>,
        source: Arc<dyn CovidSource>,
        deadline: Duration,
    ) -> Result<Self, SkillError> {
        Self::with_handlers(REGISTRATION_ORDER.to_vec(), i18n, source, deadline)
    }

    /// Dispatcher with an explicit handler order.
    ///
    /// Fails unless launch requests, session-ended requests and arbitrary
    /// intents each reach some handler.
    pub fn with_handlers(
        handlers: Vec<Handler>,
        i18n: Arc<LocaleStore>,
        source: Arc<dyn CovidSource>,
        deadline: Duration,
    ) -> Result<Self, SkillError> {
        let locale = i18n.default_locale().to_string();
        let probes = [
            IncomingRequest::launch(&locale),
            IncomingRequest::session_ended(&locale),
            IncomingRequest::intent("__unregistered_intent__", &locale),
        ];
        for probe in &probes {
            if !handlers.iter().any(|h| h.can_handle(probe)) {
                return Err(SkillError::UnhandledRequest(format!(
                    "no registered handler accepts {} requests",
                    probe.kind
                )));
            }
        }

        Ok(Self {
            handlers,
            i18n,
            source,
            deadline,
        })
    }

    /// Handlers in registration order.
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// First handler whose predicate accepts the request.
    pub fn route(&self, req: &IncomingRequest) -> Option<Handler> {
        self.handlers.iter().copied().find(|h| h.can_handle(req))
    }

    /// Answer one request. Never fails: handler errors, unmatched requests
    /// and deadline overruns all produce the localized apology.
    pub async fn dispatch(&self, req: &IncomingRequest) -> OutgoingResponse {
        let trace_id = Uuid::new_v4();
        info!(
            "[{trace_id}] {} request intent={} location={} locale={}",
            req.kind,
            req.intent.as_deref().unwrap_or("-"),
            req.slot(handlers::LOCATION_SLOT).unwrap_or("-"),
            req.locale
        );

        // Locale first: every handler speaks through it.
        let locale = match self.i18n.locale_for(&req.locale) {
            Ok(tag) => tag,
            Err(e) => {
                warn!(
                    "[{trace_id}] {e}, falling back to default locale {}",
                    self.i18n.default_locale()
                );
                self.i18n.default_locale()
            }
        };

        let ctx = HandlerContext {
            i18n: &self.i18n,
            locale,
            source: self.source.as_ref(),
        };

        let result = match self.route(req) {
            Some(handler) => {
                debug!("[{trace_id}] routing to {} (locale {locale})", handler.name());
                match tokio::time::timeout(self.deadline, handler.handle(&ctx, req)).await {
                    Ok(result) => result,
                    Err(_) => Err(SkillError::Network(format!(
                        "{} handler exceeded the {}ms deadline",
                        handler.name(),
                        self.deadline.as_millis()
                    ))),
                }
            }
            None => Err(SkillError::UnhandledRequest(format!(
                "{} request for intent {:?}",
                req.kind, req.intent
            ))),
        };

        match result {
            Ok(resp) if !resp.speech.trim().is_empty() => resp,
            Ok(_) => {
                error!("[{trace_id}] handler produced no speech");
                error_response(&ctx)
            }
            Err(e) => {
                error!("[{trace_id}] request failed ({}): {e}", e.kind());
                error_response(&ctx)
            }
        }
    }
}
