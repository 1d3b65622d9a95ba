//! Response handlers, one variant per supported request, matched in
//! registration order by the dispatcher.

use crate::i18n::{LocaleStore, MessageKey};
use boletim_core::{
    error::SkillError,
    request::{IncomingRequest, OutgoingResponse, RequestKind},
    traits::CovidSource,
};
use std::fmt::Display;
use tracing::{debug, info};

/// Intent names delivered by the voice platform.
pub mod intents {
    pub const NAVIGATE_HOME: &str = "AMAZON.NavigateHomeIntent";
    pub const GET_NEW_FACT: &str = "GetNewFactIntent";
    pub const CAPTURE_STATE: &str = "captureState";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const CASE_DEATHS: &str = "caseDeaths";
    pub const CASE_CONTAMINATION: &str = "caseContamination";
    pub const DATA_SOURCE: &str = "dataSource";
}

/// Slot carrying the state for case/death queries.
pub const LOCATION_SLOT: &str = "location";
/// Slot carrying the place for the capture-state echo.
pub const PLACE_SLOT: &str = "place";

/// The attribution message is authored in Portuguese only.
const DATA_SOURCE_SPEECH: &str =
    "Os dados que tenho a disposição para consulta são extraídos do projeto brasil aiô.";
const DATA_SOURCE_REPROMPT: &str = "Deseja saber mais?";

/// Last-resort apology when even the error message cannot be resolved.
const HARD_ERROR_SPEECH: &str = "Desculpa, algo deu errado.";

/// Handler registration order. Predicates overlap (Launch matches both
/// `Home` and `NewFact`), so the first match wins. `Fallback` accepts any
/// intent and must stay last among intent handlers.
pub const REGISTRATION_ORDER: [Handler; 10] = [
    Handler::Home,
    Handler::NewFact,
    Handler::CaptureState,
    Handler::Help,
    Handler::Exit,
    Handler::SessionEnded,
    Handler::Deaths,
    Handler::Contamination,
    Handler::DataSource,
    Handler::Fallback,
];

/// Everything a handler needs besides the request itself.
pub struct HandlerContext<'a> {
    pub i18n: &'a LocaleStore,
    /// Canonical locale tag, resolved before any handler runs.
    pub locale: &'a str,
    pub source: &'a dyn CovidSource,
}

impl HandlerContext<'_> {
    fn t(&self, key: MessageKey) -> Result<String, SkillError> {
        self.i18n.resolve(self.locale, key, &[])
    }

    fn tf(&self, key: MessageKey, args: &[&dyn Display]) -> Result<String, SkillError> {
        self.i18n.resolve(self.locale, key, args)
    }
}

/// Supported handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Home,
    NewFact,
    CaptureState,
    Help,
    Exit,
    SessionEnded,
    Deaths,
    Contamination,
    DataSource,
    Fallback,
}

impl Handler {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::NewFact => "new_fact",
            Self::CaptureState => "capture_state",
            Self::Help => "help",
            Self::Exit => "exit",
            Self::SessionEnded => "session_ended",
            Self::Deaths => "deaths",
            Self::Contamination => "contamination",
            Self::DataSource => "data_source",
            Self::Fallback => "fallback",
        }
    }

    /// Whether this handler accepts the request.
    pub fn can_handle(&self, req: &IncomingRequest) -> bool {
        match self {
            Self::Home => req.kind == RequestKind::Launch || req.is_intent(intents::NAVIGATE_HOME),
            Self::NewFact => req.kind == RequestKind::Launch || req.is_intent(intents::GET_NEW_FACT),
            Self::CaptureState => req.is_intent(intents::CAPTURE_STATE),
            Self::Help => req.is_intent(intents::HELP),
            Self::Exit => req.is_intent(intents::CANCEL) || req.is_intent(intents::STOP),
            Self::SessionEnded => req.kind == RequestKind::SessionEnded,
            Self::Deaths => req.is_intent(intents::CASE_DEATHS),
            Self::Contamination => req.is_intent(intents::CASE_CONTAMINATION),
            Self::DataSource => req.is_intent(intents::DATA_SOURCE),
            // AMAZON.FallbackIntent and anything no earlier handler took.
            Self::Fallback => req.kind == RequestKind::Intent,
        }
    }

    /// Build the response. Upstream failures other than an empty result
    /// propagate to the dispatcher.
    pub async fn handle(
        &self,
        ctx: &HandlerContext<'_>,
        req: &IncomingRequest,
    ) -> Result<OutgoingResponse, SkillError> {
        match self {
            Self::Home => handle_home(ctx).await,
            Self::NewFact => handle_new_fact(ctx),
            Self::CaptureState => handle_capture_state(ctx, req),
            Self::Help => Ok(OutgoingResponse::builder()
                .speak(ctx.t(MessageKey::HelpMessage)?)
                .reprompt(ctx.t(MessageKey::HelpReprompt)?)
                .build()),
            Self::Exit => Ok(OutgoingResponse::builder()
                .speak(ctx.t(MessageKey::StopMessage)?)
                .build()),
            Self::SessionEnded => {
                info!("session ended");
                Ok(OutgoingResponse::builder()
                    .speak(ctx.t(MessageKey::StopMessage)?)
                    .build())
            }
            Self::Deaths => handle_state_count(ctx, req, Count::Deaths).await,
            Self::Contamination => handle_state_count(ctx, req, Count::Confirmed).await,
            Self::DataSource => Ok(OutgoingResponse::builder()
                .speak(DATA_SOURCE_SPEECH)
                .reprompt(DATA_SOURCE_REPROMPT)
                .build()),
            Self::Fallback => Ok(OutgoingResponse::builder()
                .speak(ctx.t(MessageKey::FallbackMessage)?)
                .reprompt(ctx.t(MessageKey::FallbackReprompt)?)
                .build()),
        }
    }
}

/// Generic localized apology spoken when a handler fails.
pub fn error_response(ctx: &HandlerContext<'_>) -> OutgoingResponse {
    let text = ctx
        .t(MessageKey::ErrorMessage)
        .unwrap_or_else(|_| HARD_ERROR_SPEECH.to_string());
    OutgoingResponse::builder()
        .speak(text.clone())
        .reprompt(text)
        .build()
}

async fn handle_home(ctx: &HandlerContext<'_>) -> Result<OutgoingResponse, SkillError> {
    let snapshot = match ctx.source.fetch_snapshot(None).await {
        Ok(s) => s,
        Err(SkillError::NoDataAvailable(what)) => {
            info!("no country data available ({what})");
            return data_unavailable(ctx);
        }
        Err(e) => return Err(e),
    };

    Ok(OutgoingResponse::builder()
        .speak(ctx.tf(
            MessageKey::CountrySummary,
            &[&snapshot.confirmed, &snapshot.deaths],
        )?)
        .reprompt(ctx.t(MessageKey::CountryReprompt)?)
        .build())
}

fn handle_new_fact(ctx: &HandlerContext<'_>) -> Result<OutgoingResponse, SkillError> {
    let fact = ctx.i18n.random_fact(ctx.locale)?;
    let speech = format!("{}{fact}", ctx.t(MessageKey::GetFactMessage)?);
    Ok(OutgoingResponse::builder()
        .speak(speech)
        .simple_card(ctx.t(MessageKey::SkillName)?, fact)
        .build())
}

fn handle_capture_state(
    ctx: &HandlerContext<'_>,
    req: &IncomingRequest,
) -> Result<OutgoingResponse, SkillError> {
    match req.slot(PLACE_SLOT) {
        Some(place) => Ok(OutgoingResponse::builder()
            .speak(ctx.tf(MessageKey::CapturedState, &[&place])?)
            .build()),
        None => ask_location(ctx),
    }
}

#[derive(Debug, Clone, Copy)]
enum Count {
    Confirmed,
    Deaths,
}

async fn handle_state_count(
    ctx: &HandlerContext<'_>,
    req: &IncomingRequest,
    count: Count,
) -> Result<OutgoingResponse, SkillError> {
    let Some(state) = req.slot(LOCATION_SLOT) else {
        debug!("no {LOCATION_SLOT} slot, asking for it");
        return ask_location(ctx);
    };

    let snapshot = match ctx.source.fetch_snapshot(Some(state)).await {
        Ok(s) => s,
        Err(SkillError::NoDataAvailable(what)) => {
            info!("no data available for state '{state}' ({what})");
            return data_unavailable(ctx);
        }
        Err(e) => return Err(e),
    };

    let (key, value) = match count {
        Count::Confirmed => (MessageKey::StateCases, snapshot.confirmed),
        Count::Deaths => (MessageKey::StateDeaths, snapshot.deaths),
    };

    Ok(OutgoingResponse::builder()
        .speak(ctx.tf(key, &[&state, &value])?)
        .reprompt(ctx.t(MessageKey::MoreReprompt)?)
        .build())
}

fn ask_location(ctx: &HandlerContext<'_>) -> Result<OutgoingResponse, SkillError> {
    let text = ctx.t(MessageKey::AskLocation)?;
    Ok(OutgoingResponse::builder()
        .speak(text.clone())
        .reprompt(text)
        .build())
}

fn data_unavailable(ctx: &HandlerContext<'_>) -> Result<OutgoingResponse, SkillError> {
    Ok(OutgoingResponse::builder()
        .speak(ctx.t(MessageKey::DataUnavailable)?)
        .build())
}
