//! Environment: the state of one physical configuration.
//!
//! The keys every stage relies on (`B`, `Beta`, `FreeEnergy`) are named
//! fields. Model parameters and order parameters live in an ordered map of
//! [`Param`] values so that single- and two-degree-of-freedom models share one
//! record type. Cloning an `Environment` is always a deep copy.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PhaseError, PhaseResult};

/// Electronic parameters cleared by [`Environment::restrict_to_ions`].
const ELECTRONIC_KEYS: [&str; 9] = [
    "Tae", "Tce", "Tbe", "Tao", "Tco", "Tbo", "EpsilonM", "EpsilonR", "Mu",
];

/// A value stored under a non-reserved key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Switch(bool),
    Scalar(f64),
    Nested(Vec<Param>),
}

impl Param {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Param::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Param::Switch(_) => true,
            Param::Scalar(x) => x.is_finite(),
            Param::Nested(items) => items.iter().all(Param::is_finite),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// One-spin coefficient; the field axis of the phase diagram.
    #[serde(rename = "B", default)]
    pub b: f64,
    /// Inverse temperature 1 / (k_B T). May be +inf.
    #[serde(
        rename = "Beta",
        default,
        serialize_with = "beta_to_json",
        deserialize_with = "beta_from_json"
    )]
    pub beta: f64,
    #[serde(rename = "FreeEnergy", default)]
    pub free_energy: f64,
    #[serde(flatten)]
    params: BTreeMap<String, Param>,
}

// JSON has no infinity; zero temperature is written as f64::MAX.
fn beta_to_json<S: Serializer>(beta: &f64, s: S) -> Result<S::Ok, S::Error> {
    if *beta == f64::INFINITY {
        s.serialize_f64(f64::MAX)
    } else {
        s.serialize_f64(*beta)
    }
}

fn beta_from_json<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let beta = f64::deserialize(d)?;
    Ok(if beta == f64::MAX { f64::INFINITY } else { beta })
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(data: &str) -> PhaseResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> PhaseResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a base environment document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> PhaseResult<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Scalar lookup by physical key name.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "B" => Some(self.b),
            "Beta" => Some(self.beta),
            "FreeEnergy" => Some(self.free_energy),
            _ => self.params.get(key).and_then(Param::as_scalar),
        }
    }

    /// Like [`get`](Self::get), but a missing or non-scalar key is an error.
    pub fn require(&self, key: &str) -> PhaseResult<f64> {
        self.get(key).ok_or_else(|| PhaseError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Missing model parameters read as zero, like an unset struct field.
    pub fn get_or_zero(&self, key: &str) -> f64 {
        self.get(key).unwrap_or(0.0)
    }

    pub fn set(&mut self, key: &str, value: f64) {
        match key {
            "B" => self.b = value,
            "Beta" => self.beta = value,
            "FreeEnergy" => self.free_energy = value,
            _ => {
                self.params.insert(key.to_string(), Param::Scalar(value));
            }
        }
    }

    pub fn param(&self, key: &str) -> Option<&Param> {
        self.params.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(key, "B" | "Beta" | "FreeEnergy") || self.params.contains_key(key)
    }

    pub fn temperature(&self) -> f64 {
        1.0 / self.beta
    }

    /// Every stored number is finite, except `Beta`, which may be +inf.
    pub fn is_finite(&self) -> bool {
        self.b.is_finite()
            && (self.beta.is_finite() || self.beta == f64::INFINITY)
            && self.free_energy.is_finite()
            && self.params.values().all(Param::is_finite)
    }

    pub fn ions_only(&self) -> bool {
        matches!(self.params.get("IonsOnly"), Some(Param::Switch(true)))
    }

    /// Zero the electronic parameters and mark the environment ion-only.
    pub fn restrict_to_ions(&mut self) {
        for key in ELECTRONIC_KEYS {
            self.set(key, 0.0);
        }
        self.params.insert("IonsOnly".to_string(), Param::Switch(true));
    }

    /// Check that every key in `required` is present.
    pub fn validate(&self, required: &[&str]) -> PhaseResult<()> {
        match required.iter().find(|k| !self.contains(k)) {
            Some(key) => Err(PhaseError::MissingKey {
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }
}
