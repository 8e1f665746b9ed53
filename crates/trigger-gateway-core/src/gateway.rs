//! # Trigger Gateway
//!
//! The adapter a hosting runtime calls once per invocation. Construction
//! compiles configuration into immutable state; every call after that is an
//! independent, sequential pipeline:
//!
//! 1. resolve the body (may await a stream)
//! 2. build the canonical message, or answer `400` for a preflight error
//! 3. dispatch (awaited)
//! 4. serialize `out` into the body and apply the response directive

use crate::{
    config::GatewayConfig,
    directive::apply_directive,
    dispatch::{DispatchResult, Dispatcher, InvocationContext, SideChannel},
    error::{ConfigError, EventError, GatewayError},
    event::EventAdapter,
    is_truthy,
    message::{build_message, MessageOutcome},
    response::HttpResponse,
    trigger::{body::resolve_body, TriggerRequest},
    webhook::WebhookMatcher,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Status returned when the inbound message already carries `error$`
pub const PREFLIGHT_STATUS: u16 = 400;

/// Serverless trigger adapter bound to a dispatch engine.
#[derive(Clone)]
pub struct TriggerGateway {
    config: Arc<GatewayConfig>,
    webhooks: Arc<WebhookMatcher>,
    events: Arc<EventAdapter>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl std::fmt::Debug for TriggerGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerGateway")
            .field("config", &self.config)
            .field("webhooks", &self.webhooks)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl TriggerGateway {
    /// Compile the configuration and bind it to a dispatcher.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]: an invalid webhook route, an empty auth cookie
    /// name, or an undecodable default event message.
    pub fn new(config: GatewayConfig, dispatcher: Arc<dyn Dispatcher>) -> Result<Self, ConfigError> {
        if let Some(ref auth) = config.auth {
            auth.validate()?;
        }
        let webhooks = WebhookMatcher::from_routes(&config.webhooks)?;
        let events = EventAdapter::new(&config.event)?;

        info!(
            webhooks = webhooks.specs().len(),
            auth = config.auth.is_some(),
            "Trigger gateway configured"
        );

        Ok(Self {
            config: Arc::new(config),
            webhooks: Arc::new(webhooks),
            events: Arc::new(events),
            dispatcher,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn webhooks(&self) -> &WebhookMatcher {
        &self.webhooks
    }

    /// Handle one HTTP trigger invocation.
    ///
    /// Dispatch failures are not errors here: they are shaped into the
    /// response (status `directive.status` or `500`).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BodyParse`] when the body cannot be resolved.
    #[instrument(
        skip_all,
        fields(
            invocation_id = %context.invocation_id,
            method = request.parts.method.as_deref().unwrap_or(""),
        )
    )]
    pub async fn handle(
        &self,
        request: TriggerRequest,
        context: InvocationContext,
    ) -> Result<HttpResponse, GatewayError> {
        let (parts, body) = request.into_parts();
        let mut response = HttpResponse::with_headers(self.config.headers.clone());

        let body = resolve_body(body).await?;

        let message = match build_message(&parts, &body, &self.webhooks) {
            MessageOutcome::Ready(message) => message,
            MessageOutcome::Preflight(message) => {
                warn!(status = PREFLIGHT_STATUS, "Rejecting message with preflight error");
                response.status_code = PREFLIGHT_STATUS;
                response.body = message.into_value().to_string();
                return Ok(response);
            }
        };

        let result = self
            .dispatcher
            .dispatch(
                message,
                SideChannel::for_request(&mut response, &parts, &context),
            )
            .await;

        let failed = result.is_error();
        if let Some(out) = result.out.as_ref().filter(|out| is_truthy(out)) {
            response.body = out.to_string();
        }
        if failed {
            debug!(error = ?result.error, "Dispatch reported an error");
        }

        apply_directive(
            result.directive.as_ref(),
            failed,
            self.config.auth.as_ref(),
            &mut response,
        );

        info!(status = response.status_code, failed, "Trigger handled");
        Ok(response)
    }

    /// Like [`TriggerGateway::handle`], but renders errors as responses so
    /// the runtime always receives an [`HttpResponse`].
    pub async fn respond(&self, request: TriggerRequest, context: InvocationContext) -> HttpResponse {
        match self.handle(request, context).await {
            Ok(response) => response,
            Err(e) => e.into_response(&self.config),
        }
    }

    /// Handle one event trigger invocation and return the dispatch result
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Any [`EventError`] raised while decoding the event's message.
    pub async fn handle_event(
        &self,
        event: Value,
        context: InvocationContext,
    ) -> Result<DispatchResult, EventError> {
        self.events
            .handle(&event, &context, self.dispatcher.as_ref())
            .await
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
