//! US state registry.
//!
//! The three inputs identify states three ways: the membership table by name
//! (`"Texas"`), demand rows by USPS code (`"TX"`), the topology by 2-digit
//! FIPS id (`"48"`). [`StateRegistry`] maps all of them onto [`StateCode`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{EvlError, EvlResult};

/// Two-letter USPS state code, always uppercase and always a known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode([u8; 2]);

impl StateCode {
    /// Parse a code case-insensitively; unknown codes are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        let code = StateCode([bytes[0].to_ascii_uppercase(), bytes[1].to_ascii_uppercase()]);
        StateRegistry::global().by_code(code).map(|info| info.code)
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StateCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateCode::parse(&value).ok_or_else(|| format!("unknown state code '{value}'"))
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.as_str().to_string()
    }
}

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub name: &'static str,
    pub code: StateCode,
    /// 2-digit FIPS id as used by the county topology.
    pub fips: &'static str,
}

const fn code(raw: &[u8; 2]) -> StateCode {
    StateCode([raw[0], raw[1]])
}

const STATES: &[StateInfo] = &[
    StateInfo { name: "Alabama", code: code(b"AL"), fips: "01" },
    StateInfo { name: "Alaska", code: code(b"AK"), fips: "02" },
    StateInfo { name: "Arizona", code: code(b"AZ"), fips: "04" },
    StateInfo { name: "Arkansas", code: code(b"AR"), fips: "05" },
    StateInfo { name: "California", code: code(b"CA"), fips: "06" },
    StateInfo { name: "Colorado", code: code(b"CO"), fips: "08" },
    StateInfo { name: "Connecticut", code: code(b"CT"), fips: "09" },
    StateInfo { name: "Delaware", code: code(b"DE"), fips: "10" },
    StateInfo { name: "District of Columbia", code: code(b"DC"), fips: "11" },
    StateInfo { name: "Florida", code: code(b"FL"), fips: "12" },
    StateInfo { name: "Georgia", code: code(b"GA"), fips: "13" },
    StateInfo { name: "Hawaii", code: code(b"HI"), fips: "15" },
    StateInfo { name: "Idaho", code: code(b"ID"), fips: "16" },
    StateInfo { name: "Illinois", code: code(b"IL"), fips: "17" },
    StateInfo { name: "Indiana", code: code(b"IN"), fips: "18" },
    StateInfo { name: "Iowa", code: code(b"IA"), fips: "19" },
    StateInfo { name: "Kansas", code: code(b"KS"), fips: "20" },
    StateInfo { name: "Kentucky", code: code(b"KY"), fips: "21" },
    StateInfo { name: "Louisiana", code: code(b"LA"), fips: "22" },
    StateInfo { name: "Maine", code: code(b"ME"), fips: "23" },
    StateInfo { name: "Maryland", code: code(b"MD"), fips: "24" },
    StateInfo { name: "Massachusetts", code: code(b"MA"), fips: "25" },
    StateInfo { name: "Michigan", code: code(b"MI"), fips: "26" },
    StateInfo { name: "Minnesota", code: code(b"MN"), fips: "27" },
    StateInfo { name: "Mississippi", code: code(b"MS"), fips: "28" },
    StateInfo { name: "Missouri", code: code(b"MO"), fips: "29" },
    StateInfo { name: "Montana", code: code(b"MT"), fips: "30" },
    StateInfo { name: "Nebraska", code: code(b"NE"), fips: "31" },
    StateInfo { name: "Nevada", code: code(b"NV"), fips: "32" },
    StateInfo { name: "New Hampshire", code: code(b"NH"), fips: "33" },
    StateInfo { name: "New Jersey", code: code(b"NJ"), fips: "34" },
    StateInfo { name: "New Mexico", code: code(b"NM"), fips: "35" },
    StateInfo { name: "New York", code: code(b"NY"), fips: "36" },
    StateInfo { name: "North Carolina", code: code(b"NC"), fips: "37" },
    StateInfo { name: "North Dakota", code: code(b"ND"), fips: "38" },
    StateInfo { name: "Ohio", code: code(b"OH"), fips: "39" },
    StateInfo { name: "Oklahoma", code: code(b"OK"), fips: "40" },
    StateInfo { name: "Oregon", code: code(b"OR"), fips: "41" },
    StateInfo { name: "Pennsylvania", code: code(b"PA"), fips: "42" },
    StateInfo { name: "Rhode Island", code: code(b"RI"), fips: "44" },
    StateInfo { name: "South Carolina", code: code(b"SC"), fips: "45" },
    StateInfo { name: "South Dakota", code: code(b"SD"), fips: "46" },
    StateInfo { name: "Tennessee", code: code(b"TN"), fips: "47" },
    StateInfo { name: "Texas", code: code(b"TX"), fips: "48" },
    StateInfo { name: "Utah", code: code(b"UT"), fips: "49" },
    StateInfo { name: "Vermont", code: code(b"VT"), fips: "50" },
    StateInfo { name: "Virginia", code: code(b"VA"), fips: "51" },
    StateInfo { name: "Washington", code: code(b"WA"), fips: "53" },
    StateInfo { name: "West Virginia", code: code(b"WV"), fips: "54" },
    StateInfo { name: "Wisconsin", code: code(b"WI"), fips: "55" },
    StateInfo { name: "Wyoming", code: code(b"WY"), fips: "56" },
];

/// Lookup tables over the static state list.
pub struct StateRegistry {
    by_code: HashMap<StateCode, usize>,
    by_name: HashMap<String, usize>,
    by_fips: HashMap<&'static str, usize>,
}

static REGISTRY: Lazy<StateRegistry> = Lazy::new(StateRegistry::build);

impl StateRegistry {
    fn build() -> Self {
        let mut by_code = HashMap::with_capacity(STATES.len());
        let mut by_name = HashMap::with_capacity(STATES.len());
        let mut by_fips = HashMap::with_capacity(STATES.len());
        for (idx, info) in STATES.iter().enumerate() {
            by_code.insert(info.code, idx);
            by_name.insert(info.name.to_lowercase(), idx);
            by_fips.insert(info.fips, idx);
        }
        Self {
            by_code,
            by_name,
            by_fips,
        }
    }

    /// Process-wide registry.
    pub fn global() -> &'static StateRegistry {
        &REGISTRY
    }

    pub fn all(&self) -> &'static [StateInfo] {
        STATES
    }

    pub fn by_code(&self, code: StateCode) -> Option<&'static StateInfo> {
        self.by_code.get(&code).map(|&idx| &STATES[idx])
    }

    /// Case-insensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&'static StateInfo> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &STATES[idx])
    }

    /// Lookup by topology id; accepts `"48"` as well as a bare `"6"`.
    pub fn by_fips(&self, id: &str) -> Option<&'static StateInfo> {
        let id = id.trim();
        let padded;
        let id = if id.len() == 1 {
            padded = format!("0{id}");
            padded.as_str()
        } else {
            id
        };
        self.by_fips.get(id).map(|&idx| &STATES[idx])
    }

    /// Resolve a name, USPS code or FIPS id, in that order.
    pub fn resolve(&self, reference: &str) -> Option<&'static StateInfo> {
        self.by_name(reference)
            .or_else(|| {
                let bytes = reference.trim().as_bytes();
                if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_alphabetic) {
                    let code = StateCode([bytes[0].to_ascii_uppercase(), bytes[1].to_ascii_uppercase()]);
                    self.by_code(code)
                } else {
                    None
                }
            })
            .or_else(|| self.by_fips(reference))
    }

    /// Like [`resolve`](Self::resolve), failing with [`EvlError::Unknown`].
    pub fn require(&self, reference: &str) -> EvlResult<&'static StateInfo> {
        self.resolve(reference)
            .ok_or_else(|| EvlError::unknown("state", reference.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookups_agree() {
        let registry = StateRegistry::global();
        let by_name = registry.by_name("texas").unwrap();
        let by_fips = registry.by_fips("48").unwrap();
        let by_code = registry.by_code(StateCode::parse("tx").unwrap()).unwrap();
        assert_eq!(by_name, by_fips);
        assert_eq!(by_name, by_code);
        assert_eq!(by_name.name, "Texas");
    }

    #[test]
    fn test_resolve_accepts_all_forms() {
        let registry = StateRegistry::global();
        for reference in ["California", "CA", "06", "6"] {
            assert_eq!(
                registry.resolve(reference).map(|s| s.name),
                Some("California"),
                "reference {reference}"
            );
        }
        assert!(registry.resolve("Atlantis").is_none());
    }

    #[test]
    fn test_require_reports_unknown_state() {
        let registry = StateRegistry::global();
        assert_eq!(registry.require(" tx ").map(|s| s.name), Ok("Texas"));
        assert_eq!(
            registry.require(" Atlantis ").map(|s| s.name),
            Err(EvlError::unknown("state", "Atlantis"))
        );
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(StateCode::parse("ZZ").is_none());
        assert!(StateCode::parse("T").is_none());
        assert!(StateCode::parse("T1").is_none());
    }

    #[test]
    fn test_registry_is_complete() {
        assert_eq!(StateRegistry::global().all().len(), 51);
    }

    #[test]
    fn test_code_serde_roundtrip() {
        let code = StateCode::parse("wa").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"WA\"");
        let back: StateCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
