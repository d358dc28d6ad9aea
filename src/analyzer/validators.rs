//! Post-match validators for pattern recognizers

use anyhow::Result;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Outcome of validating a regex candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Candidate is rejected
    Invalid,
    /// Candidate is well-formed; keep the pattern score
    Plausible,
    /// Candidate passed a checksum; score becomes 1.0
    Certain,
}

/// Validation function attached to a pattern recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Luhn checksum for payment card numbers
    Luhn,
    /// US Social Security Number structure rules
    Ssn,
    /// Dotted-quad IPv4 address
    Ipv4,
    /// IPv6 address in any textual form
    Ipv6,
}

impl Validator {
    /// Parse a validator name from the pattern library
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "luhn" => Ok(Self::Luhn),
            "ssn" | "us_ssn" => Ok(Self::Ssn),
            "ipv4" => Ok(Self::Ipv4),
            "ipv6" => Ok(Self::Ipv6),
            _ => anyhow::bail!("Unknown validator: {name}"),
        }
    }

    /// Validate a matched candidate
    pub fn validate(&self, candidate: &str) -> Validation {
        let valid = match self {
            Self::Luhn => return luhn(candidate),
            Self::Ssn => ssn(candidate),
            Self::Ipv4 => candidate.parse::<Ipv4Addr>().is_ok(),
            Self::Ipv6 => candidate.parse::<Ipv6Addr>().is_ok(),
        };

        if valid {
            Validation::Plausible
        } else {
            Validation::Invalid
        }
    }
}

fn digits(candidate: &str) -> Vec<u32> {
    candidate.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn luhn(candidate: &str) -> Validation {
    let digits = digits(candidate);
    if !(13..=19).contains(&digits.len()) {
        return Validation::Invalid;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    if sum % 10 == 0 {
        Validation::Certain
    } else {
        Validation::Invalid
    }
}

fn ssn(candidate: &str) -> bool {
    let digits = digits(candidate);
    if digits.len() != 9 {
        return false;
    }

    // Repeated digits and well-known sample numbers are never issued
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    let joined: String = digits.iter().map(|d| d.to_string()).collect();
    if matches!(joined.as_str(), "123456789" | "078051120" | "219099999") {
        return false;
    }

    let area = digits[0] * 100 + digits[1] * 10 + digits[2];
    let group = digits[3] * 10 + digits[4];
    let serial = digits[5..].iter().fold(0, |acc, &d| acc * 10 + d);

    area != 0 && area != 666 && area < 900 && group != 0 && serial != 0
}
