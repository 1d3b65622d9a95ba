use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The kind of request delivered by the voice platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// The user opened the skill without asking anything specific.
    #[serde(alias = "LaunchRequest")]
    Launch,
    /// A recognized intent, optionally with slot values.
    #[serde(alias = "IntentRequest")]
    Intent,
    /// The platform closed the session.
    #[serde(alias = "SessionEndedRequest")]
    SessionEnded,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Intent => "intent",
            Self::SessionEnded => "session_ended",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request extracted from the platform envelope. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingRequest {
    pub kind: RequestKind,
    /// Intent name (only meaningful for `RequestKind::Intent`).
    #[serde(default)]
    pub intent: Option<String>,
    /// Slot name → spoken value.
    #[serde(default)]
    pub slots: HashMap<String, String>,
    /// Locale tag as sent by the platform (e.g. "pt-BR").
    pub locale: String,
}

impl IncomingRequest {
    pub fn launch(locale: &str) -> Self {
        Self {
            kind: RequestKind::Launch,
            intent: None,
            slots: HashMap::new(),
            locale: locale.to_string(),
        }
    }

    pub fn intent(name: &str, locale: &str) -> Self {
        Self {
            kind: RequestKind::Intent,
            intent: Some(name.to_string()),
            slots: HashMap::new(),
            locale: locale.to_string(),
        }
    }

    pub fn session_ended(locale: &str) -> Self {
        Self {
            kind: RequestKind::SessionEnded,
            intent: None,
            slots: HashMap::new(),
            locale: locale.to_string(),
        }
    }

    /// Attach a slot value (builder style, used when assembling a request).
    pub fn with_slot(mut self, name: &str, value: &str) -> Self {
        self.slots.insert(name.to_string(), value.to_string());
        self
    }

    /// Whether this is an intent request with the given intent name.
    pub fn is_intent(&self, name: &str) -> bool {
        self.kind == RequestKind::Intent && self.intent.as_deref() == Some(name)
    }

    /// Trimmed slot value. Blank values count as missing.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// A simple display card shown alongside the spoken response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub content: String,
}

/// The reply handed back to the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingResponse {
    pub speech: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

impl OutgoingResponse {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }
}

/// Incremental builder for [`OutgoingResponse`]; `build()` consumes it.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    speech: String,
    reprompt: Option<String>,
    card: Option<Card>,
}

impl ResponseBuilder {
    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.speech = text.into();
        self
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self
    }

    pub fn simple_card(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.card = Some(Card {
            title: title.into(),
            content: content.into(),
        });
        self
    }

    pub fn build(self) -> OutgoingResponse {
        OutgoingResponse {
            speech: self.speech,
            reprompt: self.reprompt,
            card: self.card,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_accepts_platform_names() {
        let kind: RequestKind = serde_json::from_str(r#""LaunchRequest""#).unwrap();
        assert_eq!(kind, RequestKind::Launch);
        let kind: RequestKind = serde_json::from_str(r#""session_ended""#).unwrap();
        assert_eq!(kind, RequestKind::SessionEnded);
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let json = r#"{"kind":"launch","locale":"pt-BR"}"#;
        let req: IncomingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, RequestKind::Launch);
        assert!(req.intent.is_none());
        assert!(req.slots.is_empty());
    }

    #[test]
    fn test_is_intent_requires_intent_kind() {
        let req = IncomingRequest::intent("caseDeaths", "pt-BR");
        assert!(req.is_intent("caseDeaths"));
        assert!(!req.is_intent("caseContamination"));

        let mut launch = IncomingRequest::launch("pt-BR");
        launch.intent = Some("caseDeaths".into());
        assert!(!launch.is_intent("caseDeaths"));
    }

    #[test]
    fn test_blank_slot_is_missing() {
        let req = IncomingRequest::intent("caseDeaths", "pt-BR")
            .with_slot("location", "   ")
            .with_slot("place", " bahia ");
        assert_eq!(req.slot("location"), None);
        assert_eq!(req.slot("place"), Some("bahia"));
        assert_eq!(req.slot("missing"), None);
    }

    #[test]
    fn test_response_builder() {
        let resp = OutgoingResponse::builder()
            .speak("Olá")
            .reprompt("Deseja saber mais?")
            .simple_card("Dados", "conteúdo")
            .build();
        assert_eq!(resp.speech, "Olá");
        assert_eq!(resp.reprompt.as_deref(), Some("Deseja saber mais?"));
        assert_eq!(resp.card.unwrap().title, "Dados");
    }

    #[test]
    fn test_response_serialization_skips_empty_fields() {
        let resp = OutgoingResponse::builder().speak("Tchau!").build();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["speech"], "Tchau!");
        assert!(json.get("reprompt").is_none());
        assert!(json.get("card").is_none());
    }
}
