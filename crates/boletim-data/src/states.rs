//! Spoken Brazilian state names → two-letter codes used by the upstream API.

/// Code that selects the country aggregate instead of a state.
pub const COUNTRY_CODE: &str = "BR";

/// Lower-cased Portuguese names (accents kept) → federative unit code.
const STATES: &[(&str, &str)] = &[
    ("brasil", "BR"),
    ("acre", "AC"),
    ("alagoas", "AL"),
    ("amapá", "AP"),
    ("amazonas", "AM"),
    ("bahia", "BA"),
    ("ceará", "CE"),
    ("distrito federal", "DF"),
    ("espírito santo", "ES"),
    ("goiás", "GO"),
    ("maranhão", "MA"),
    ("mato grosso", "MT"),
    ("mato grosso do sul", "MS"),
    ("minas gerais", "MG"),
    ("pará", "PA"),
    ("paraíba", "PB"),
    ("paraná", "PR"),
    ("pernambuco", "PE"),
    // Misspelling the interaction model has been seen to deliver.
    ("pernanbuco", "PE"),
    ("piauí", "PI"),
    ("rio de janeiro", "RJ"),
    ("rio grande do norte", "RN"),
    ("rio grande do sul", "RS"),
    ("rondônia", "RO"),
    ("roraima", "RR"),
    ("santa catarina", "SC"),
    ("são paulo", "SP"),
    ("sergipe", "SE"),
    ("tocantins", "TO"),
];

/// Where a fetch should be pointed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Country aggregate endpoint.
    Country,
    /// State endpoint. `known` is false when the spoken name was not in the
    /// table and the raw text is passed through as the query value.
    State { code: String, known: bool },
}

/// Look up the code for a spoken state name (case-insensitive). Two-letter
/// codes are accepted as-is.
pub fn state_code(name: &str) -> Option<&'static str> {
    let normalized = normalize(name);
    if let Some(code) = STATES
        .iter()
        .find(|(n, _)| *n == normalized)
        .map(|(_, code)| *code)
    {
        return Some(code);
    }
    STATES
        .iter()
        .map(|(_, code)| *code)
        .find(|code| code.eq_ignore_ascii_case(&normalized))
}

/// Decide which endpoint serves an optional spoken state.
pub fn region_for(state: Option<&str>) -> Region {
    let Some(raw) = state.map(str::trim).filter(|s| !s.is_empty()) else {
        return Region::Country;
    };
    match state_code(raw) {
        Some(COUNTRY_CODE) => Region::Country,
        Some(code) => Region::State {
            code: code.to_string(),
            known: true,
        },
        None => Region::State {
            code: raw.to_string(),
            known: false,
        },
    }
}

/// All distinct codes, in table order, without the country sentinel.
pub fn all_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = Vec::with_capacity(STATES.len());
    for (_, code) in STATES {
        if *code != COUNTRY_CODE && !codes.contains(code) {
            codes.push(code);
        }
    }
    codes
}

/// Codes from [`all_codes`] with no entry in `seen`, in table order.
pub fn missing_codes<'a>(seen: impl IntoIterator<Item = &'a str>) -> Vec<&'static str> {
    let seen: Vec<&str> = seen.into_iter().collect();
    all_codes()
        .into_iter()
        .filter(|code| !seen.iter().any(|s| s.eq_ignore_ascii_case(code)))
        .collect()
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code_case_insensitive_with_accents() {
        assert_eq!(state_code("São Paulo"), Some("SP"));
        assert_eq!(state_code("SÃO PAULO"), Some("SP"));
        assert_eq!(state_code("  mato   grosso do sul "), Some("MS"));
        assert_eq!(state_code("Ceará"), Some("CE"));
    }

    #[test]
    fn test_state_code_accepts_codes() {
        assert_eq!(state_code("rj"), Some("RJ"));
        assert_eq!(state_code("BA"), Some("BA"));
    }

    #[test]
    fn test_state_code_misses() {
        assert_eq!(state_code("sao paulo"), None);
        assert_eq!(state_code("atlantis"), None);
    }

    #[test]
    fn test_pernambuco_both_spellings() {
        assert_eq!(state_code("pernambuco"), Some("PE"));
        assert_eq!(state_code("pernanbuco"), Some("PE"));
    }

    #[test]
    fn test_region_for_absent_state_is_country() {
        assert_eq!(region_for(None), Region::Country);
        assert_eq!(region_for(Some("  ")), Region::Country);
    }

    #[test]
    fn test_region_for_country_sentinel() {
        assert_eq!(region_for(Some("Brasil")), Region::Country);
        assert_eq!(region_for(Some("br")), Region::Country);
    }

    #[test]
    fn test_region_for_known_state() {
        assert_eq!(
            region_for(Some("São Paulo")),
            Region::State {
                code: "SP".into(),
                known: true
            }
        );
    }

    #[test]
    fn test_region_for_unknown_state_passes_text_through() {
        assert_eq!(
            region_for(Some(" Atlantis ")),
            Region::State {
                code: "Atlantis".into(),
                known: false
            }
        );
    }

    #[test]
    fn test_missing_codes() {
        assert!(missing_codes(all_codes()).is_empty());
        assert_eq!(missing_codes(["SP", "rj"]).len(), 25);
        let missing = missing_codes(all_codes().into_iter().filter(|c| *c != "TO"));
        assert_eq!(missing, vec!["TO"]);
    }

    #[test]
    fn test_all_codes_covers_every_unit_once() {
        let codes = all_codes();
        assert_eq!(codes.len(), 27);
        assert!(!codes.contains(&COUNTRY_CODE));
        assert_eq!(codes.iter().filter(|c| **c == "PE").count(), 1);
    }
}
