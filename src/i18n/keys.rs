//! Typed message keys.

use std::fmt;

/// Every message a handler can speak. Each bundled or overriding locale
/// table must define all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    SkillName,
    GetFactMessage,
    HelpMessage,
    HelpReprompt,
    FallbackMessage,
    FallbackReprompt,
    ErrorMessage,
    StopMessage,
    CountrySummary,
    CountryReprompt,
    StateCases,
    StateDeaths,
    MoreReprompt,
    DataUnavailable,
    AskLocation,
    CapturedState,
}

impl MessageKey {
    pub const ALL: [MessageKey; 16] = [
        Self::SkillName,
        Self::GetFactMessage,
        Self::HelpMessage,
        Self::HelpReprompt,
        Self::FallbackMessage,
        Self::FallbackReprompt,
        Self::ErrorMessage,
        Self::StopMessage,
        Self::CountrySummary,
        Self::CountryReprompt,
        Self::StateCases,
        Self::StateDeaths,
        Self::MoreReprompt,
        Self::DataUnavailable,
        Self::AskLocation,
        Self::CapturedState,
    ];

    /// Key as written in the locale TOML files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkillName => "SKILL_NAME",
            Self::GetFactMessage => "GET_FACT_MESSAGE",
            Self::HelpMessage => "HELP_MESSAGE",
            Self::HelpReprompt => "HELP_REPROMPT",
            Self::FallbackMessage => "FALLBACK_MESSAGE",
            Self::FallbackReprompt => "FALLBACK_REPROMPT",
            Self::ErrorMessage => "ERROR_MESSAGE",
            Self::StopMessage => "STOP_MESSAGE",
            Self::CountrySummary => "COUNTRY_SUMMARY",
            Self::CountryReprompt => "COUNTRY_REPROMPT",
            Self::StateCases => "STATE_CASES",
            Self::StateDeaths => "STATE_DEATHS",
            Self::MoreReprompt => "MORE_REPROMPT",
            Self::DataUnavailable => "DATA_UNAVAILABLE",
            Self::AskLocation => "ASK_LOCATION",
            Self::CapturedState => "CAPTURED_STATE",
        }
    }

    /// Parse a key as written in a locale file.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
