//! Core domain types for the unit converter.
//!
//! This module defines the fundamental types used throughout the system:
//! - Conversion rules (scalar factors and affine scales)
//! - Units, categories and the registry that holds them
//! - History entries recorded by a session

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Rules
// ============================================================================

/// How a unit relates to the reference unit of its category
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversionRule {
    /// Number of this unit that make up one reference unit
    Scalar { factor: f64 },
    /// `unit_value = reference_value * scale + offset`
    Affine { scale: f64, offset: f64 },
}

/// The variant of a rule, without its parameters
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Scalar,
    Affine,
}

impl ConversionRule {
    pub fn scalar(factor: f64) -> Self {
        ConversionRule::Scalar { factor }
    }

    pub fn affine(scale: f64, offset: f64) -> Self {
        ConversionRule::Affine { scale, offset }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            ConversionRule::Scalar { .. } => RuleKind::Scalar,
            ConversionRule::Affine { .. } => RuleKind::Affine,
        }
    }

    /// Express a value of this unit in the category's reference unit
    pub fn to_reference(&self, value: f64) -> f64 {
        match *self {
            ConversionRule::Scalar { factor } => value / factor,
            ConversionRule::Affine { scale, offset } => (value - offset) / scale,
        }
    }

    /// Express a reference-unit value in this unit
    pub fn from_reference(&self, value: f64) -> f64 {
        match *self {
            ConversionRule::Scalar { factor } => value * factor,
            ConversionRule::Affine { scale, offset } => value * scale + offset,
        }
    }
}

// ============================================================================
// Units, Categories and Registry
// ============================================================================

/// A named unit and its rule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub name: String,
    pub rule: ConversionRule,
}

impl Unit {
    pub fn new(name: impl Into<String>, rule: ConversionRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// A group of mutually convertible units (e.g., "Length")
///
/// Units keep their insertion order so listings match how they were declared.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub units: Vec<Unit>,
}

impl Category {
    pub fn new(name: impl Into<String>, units: Vec<Unit>) -> Self {
        Self {
            name: name.into(),
            units,
        }
    }

    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Kind of the first rule; `None` for an empty category
    pub fn kind(&self) -> Option<RuleKind> {
        self.units.first().map(|u| u.rule.kind())
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }
}

/// All categories known to an engine, in registration order
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Registry {
    pub categories: Vec<Category>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

// ============================================================================
// History
// ============================================================================

/// A single recorded conversion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub category: String,
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    pub converted: f64,
}
