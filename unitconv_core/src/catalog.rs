//! Default catalog of categories and units.
//!
//! This module provides the built-in conversion tables for the system.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Name of the category that holds user-registered units
pub const CUSTOM_CATEGORY: &str = "Custom";

/// Cached default registry - built once and cloned into each engine
static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(build_default_registry_internal);

/// Get a reference to the cached default registry
pub fn get_default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Builds the default registry with the five built-in categories
///
/// **Note**: Prefer `get_default_registry()` for read-only use. This function
/// is retained for tests and for seeding a registry that will be mutated.
pub fn build_default_registry() -> Registry {
    build_default_registry_internal()
}

fn scalar_category(name: &str, units: &[(&str, f64)]) -> Category {
    Category::new(
        name,
        units
            .iter()
            .map(|(unit, factor)| Unit::new(*unit, ConversionRule::scalar(*factor)))
            .collect(),
    )
}

fn build_default_registry_internal() -> Registry {
    let length = scalar_category(
        "Length",
        &[
            ("Metre", 1.0),
            ("Kilometre", 0.001),
            ("Centimetre", 100.0),
            ("Millimetre", 1000.0),
            ("Inch", 39.37),
            ("Foot", 3.281),
            ("Yard", 1.094),
            ("Mile", 0.000621),
        ],
    );

    let weight = scalar_category(
        "Weight",
        &[
            ("Kilogram", 1.0),
            ("Gram", 1000.0),
            ("Pound", 2.205),
            ("Ounce", 35.274),
            ("Stone", 0.157),
            ("Ton", 0.0011),
        ],
    );

    // Celsius is the reference scale
    let temperature = Category::new(
        "Temperature",
        vec![
            Unit::new("Celsius", ConversionRule::affine(1.0, 0.0)),
            Unit::new("Fahrenheit", ConversionRule::affine(9.0 / 5.0, 32.0)),
            Unit::new("Kelvin", ConversionRule::affine(1.0, 273.15)),
        ],
    );

    let volume = scalar_category(
        "Volume",
        &[
            ("Litre", 1.0),
            ("Millilitre", 1000.0),
            ("Gallon", 0.219),
            ("Pint", 1.76),
            ("Cup", 4.227),
        ],
    );

    let area = scalar_category(
        "Area",
        &[
            ("Square Metre", 1.0),
            ("Square Foot", 10.764),
            ("Square Yard", 1.196),
            ("Acre", 0.000247),
            ("Hectare", 0.0001),
        ],
    );

    Registry {
        categories: vec![length, weight, temperature, volume, area],
    }
}

/// Check a single rule's parameters; returns a message on failure
pub fn validate_rule(unit: &str, rule: &ConversionRule) -> Option<String> {
    match *rule {
        ConversionRule::Scalar { factor } => {
            if !factor.is_finite() || factor <= 0.0 {
                Some(format!(
                    "Unit '{}' has invalid factor {} (must be positive and finite)",
                    unit, factor
                ))
            } else {
                None
            }
        }
        ConversionRule::Affine { scale, offset } => {
            if !scale.is_finite() || scale == 0.0 || !offset.is_finite() {
                Some(format!(
                    "Unit '{}' has invalid affine rule (scale {}, offset {})",
                    unit, scale, offset
                ))
            } else {
                None
            }
        }
    }
}

/// Validate one category; returns a list of problems, empty if valid
pub fn validate_category(category: &Category) -> Vec<String> {
    let mut errors = Vec::new();

    if category.name.trim().is_empty() {
        errors.push("Category has empty name".to_string());
    }
    if category.units.is_empty() {
        errors.push(format!("Category '{}' has no units", category.name));
    }

    let mut seen = HashSet::new();
    for unit in &category.units {
        if unit.name.trim().is_empty() {
            errors.push(format!("Category '{}' has a unit with empty name", category.name));
        }
        if !seen.insert(unit.name.as_str()) {
            errors.push(format!(
                "Category '{}' has duplicate unit '{}'",
                category.name, unit.name
            ));
        }
        if let Some(message) = validate_rule(&unit.name, &unit.rule) {
            errors.push(format!("Category '{}': {}", category.name, message));
        }
    }

    // Mixing scalar and affine rules breaks the conversion formula
    if let Some(kind) = category.kind() {
        if category.units.iter().any(|u| u.rule.kind() != kind) {
            errors.push(format!(
                "Category '{}' mixes scalar and affine rules",
                category.name
            ));
        }
    }

    errors
}

impl Registry {
    /// Validate the registry for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                errors.push(format!("Duplicate category '{}'", category.name));
            }
            errors.extend(validate_category(category));
        }

        errors
    }
}
