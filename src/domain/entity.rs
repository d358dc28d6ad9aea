//! Entity type enumeration
//!
//! The closed set of PII categories Veil knows how to detect and mask.

use super::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// PII entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Personal names
    Person,
    /// Email addresses
    EmailAddress,
    /// Telephone numbers
    PhoneNumber,
    /// Payment card numbers (Luhn validated)
    CreditCard,
    /// Countries, states, cities and street addresses
    Location,
    /// Dates and times of day
    DateTime,
    /// National identifiers (US Social Security Numbers)
    #[serde(alias = "US_SSN")]
    NationalId,
    /// IPv4 and IPv6 addresses
    IpAddress,
}

impl EntityType {
    /// Every entity type, in declaration order
    pub const ALL: [EntityType; 8] = [
        EntityType::Person,
        EntityType::EmailAddress,
        EntityType::PhoneNumber,
        EntityType::CreditCard,
        EntityType::Location,
        EntityType::DateTime,
        EntityType::NationalId,
        EntityType::IpAddress,
    ];

    /// Wire label, e.g. `EMAIL_ADDRESS`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::CreditCard => "CREDIT_CARD",
            Self::Location => "LOCATION",
            Self::DateTime => "DATE_TIME",
            Self::NationalId => "NATIONAL_ID",
            Self::IpAddress => "IP_ADDRESS",
        }
    }

    /// Default replacement token, e.g. `<PERSON>`
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.label())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PERSON" => Ok(Self::Person),
            "EMAIL_ADDRESS" | "EMAIL" => Ok(Self::EmailAddress),
            "PHONE_NUMBER" | "PHONE" => Ok(Self::PhoneNumber),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "LOCATION" => Ok(Self::Location),
            "DATE_TIME" => Ok(Self::DateTime),
            "NATIONAL_ID" | "US_SSN" => Ok(Self::NationalId),
            "IP_ADDRESS" => Ok(Self::IpAddress),
            _ => Err(PipelineError::UnknownEntityType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trips_through_from_str() {
        for entity in EntityType::ALL {
            assert_eq!(entity.label().parse::<EntityType>().unwrap(), entity);
        }
    }

    #[test]
    fn test_us_ssn_alias() {
        assert_eq!("us_ssn".parse::<EntityType>().unwrap(), EntityType::NationalId);
        let parsed: EntityType = serde_json::from_str("\"US_SSN\"").unwrap();
        assert_eq!(parsed, EntityType::NationalId);
    }

    #[test]
    fn test_unknown_entity_type() {
        let err = "PASSPORT".parse::<EntityType>().unwrap_err();
        assert_eq!(err.kind(), "UnknownEntityTypeError");
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(EntityType::EmailAddress.placeholder(), "<EMAIL_ADDRESS>");
        assert_eq!(
            serde_json::to_string(&EntityType::DateTime).unwrap(),
            "\"DATE_TIME\""
        );
    }
}
