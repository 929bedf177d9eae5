//! Calculation methods understood by the timings service.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_CALCULATION_METHOD, MAXIMUM_CALCULATION_METHOD};

/// Known method ids and their names.
const METHOD_NAMES: &[(u8, &str)] = &[
    (0, "Shia Ithna-Ashari, Leva Institute, Qum"),
    (1, "University of Islamic Sciences, Karachi"),
    (2, "Islamic Society of North America"),
    (3, "Muslim World League"),
    (4, "Umm Al-Qura University, Makkah"),
    (5, "Egyptian General Authority of Survey"),
    (7, "Institute of Geophysics, University of Tehran"),
    (8, "Gulf Region"),
    (9, "Kuwait"),
    (10, "Qatar"),
    (11, "Majlis Ugama Islam Singapura, Singapore"),
    (12, "Union Organization Islamic de France"),
    (13, "Diyanet İşleri Başkanlığı, Turkey"),
    (14, "Spiritual Administration of Muslims of Russia"),
    (15, "Moonsighting Committee Worldwide"),
    (16, "Dubai"),
    (17, "Jabatan Kemajuan Islam Malaysia (JAKIM)"),
    (18, "Tunisia"),
    (19, "Algeria"),
    (20, "Kementerian Agama Republik Indonesia"),
    (21, "Morocco"),
    (22, "Comunidade Islamica de Lisboa"),
    (23, "Ministry of Awqaf, Islamic Affairs and Holy Places, Jordan"),
];

/// Numeric id selecting the astronomical convention the timings service uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CalculationMethod(u8);

impl CalculationMethod {
    /// Accepts any id the service knows.
    pub fn new(id: u8) -> Option<Self> {
        METHOD_NAMES
            .iter()
            .any(|(known, _)| *known == id)
            .then_some(Self(id))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        METHOD_NAMES
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown method")
    }

    /// Every known method, in id order.
    pub fn all() -> impl Iterator<Item = CalculationMethod> {
        METHOD_NAMES.iter().map(|(id, _)| Self(*id))
    }

    pub fn is_valid_id(id: u8) -> bool {
        id <= MAXIMUM_CALCULATION_METHOD && Self::new(id).is_some()
    }
}

impl Default for CalculationMethod {
    fn default() -> Self {
        Self(DEFAULT_CALCULATION_METHOD)
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

impl TryFrom<u8> for CalculationMethod {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| format!("unknown calculation method {id}"))
    }
}

impl From<CalculationMethod> for u8 {
    fn from(method: CalculationMethod) -> Self {
        method.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_ids() {
        assert_eq!(CalculationMethod::new(3).unwrap().name(), "Muslim World League");
        assert!(CalculationMethod::new(6).is_none());
        assert!(CalculationMethod::new(24).is_none());
        assert!(CalculationMethod::is_valid_id(23));
        assert!(!CalculationMethod::is_valid_id(99));
    }

    #[test]
    fn test_default_and_listing() {
        assert_eq!(CalculationMethod::default().id(), 2);
        assert_eq!(CalculationMethod::all().count(), 23);
    }

    #[test]
    fn test_serde_rejects_unknown_ids() {
        let ok: CalculationMethod = serde_json::from_str("15").unwrap();
        assert_eq!(ok.id(), 15);
        assert!(serde_json::from_str::<CalculationMethod>("6").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "15");
    }
}
