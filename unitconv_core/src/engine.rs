//! Conversion engine over a registry of categories.
//!
//! The engine owns its registry outright. Each session builds its own engine,
//! seeded from the cached built-in catalog, and may extend it with custom
//! units and categories. Nothing is ever removed.

use crate::catalog::{get_default_registry, validate_category, validate_rule, CUSTOM_CATEGORY};
use crate::{Category, ConversionRule, Error, Registry, Result, RuleKind, Unit};
use serde::{Deserialize, Serialize};

/// Relative tolerance used when checking that a re-registration is consistent
const RATIO_TOLERANCE: f64 = 1e-9;

/// How affine (temperature) categories treat the source unit
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureMode {
    /// Normalise through the source unit, then apply the target unit
    #[default]
    SourceAware,
    /// Apply only the target unit's rule to the raw value
    TargetOnly,
}

/// Converts values between units of the same category
#[derive(Clone, Debug)]
pub struct ConversionEngine {
    registry: Registry,
    temperature_mode: TemperatureMode,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine {
    /// Create an engine seeded with the built-in catalog
    pub fn new() -> Self {
        Self {
            registry: get_default_registry().clone(),
            temperature_mode: TemperatureMode::default(),
        }
    }

    /// Create an engine over a caller-supplied registry
    ///
    /// The registry must pass [`Registry::validate`]; every problem found is
    /// reported in a single `Validation` error.
    pub fn with_registry(registry: Registry) -> Result<Self> {
        let errors = registry.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        tracing::debug!("Engine created over {} categories", registry.categories.len());
        Ok(Self {
            registry,
            temperature_mode: TemperatureMode::default(),
        })
    }

    pub fn with_temperature_mode(mut self, mode: TemperatureMode) -> Self {
        self.temperature_mode = mode;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Category names in registry order
    pub fn categories(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Unit names of a category in declaration order
    pub fn units(&self, category: &str) -> Result<Vec<&str>> {
        Ok(self.category(category)?.unit_names())
    }

    fn category(&self, name: &str) -> Result<&Category> {
        self.registry
            .get(name)
            .ok_or_else(|| Error::UnknownCategory(name.to_string()))
    }

    fn rule(category: &Category, unit: &str) -> Result<ConversionRule> {
        category
            .unit(unit)
            .map(|u| u.rule)
            .ok_or_else(|| Error::UnknownUnit {
                category: category.name.clone(),
                unit: unit.to_string(),
            })
    }

    /// Convert `value` from one unit to another within `category`
    ///
    /// Scalar categories scale by `factor[to] / factor[from]`. Affine
    /// categories go through the reference unit unless the engine runs in
    /// [`TemperatureMode::TargetOnly`].
    pub fn convert(&self, value: f64, from_unit: &str, to_unit: &str, category: &str) -> Result<f64> {
        let resolved = self.category(category)?;
        let from = Self::rule(resolved, from_unit)?;
        let to = Self::rule(resolved, to_unit)?;

        let converted = match (from, to) {
            (ConversionRule::Scalar { factor: from }, ConversionRule::Scalar { factor: to }) => {
                value * (to / from)
            }
            (from @ ConversionRule::Affine { .. }, to @ ConversionRule::Affine { .. }) => {
                match self.temperature_mode {
                    TemperatureMode::SourceAware => to.from_reference(from.to_reference(value)),
                    TemperatureMode::TargetOnly => to.from_reference(value),
                }
            }
            _ => {
                return Err(Error::Validation(format!(
                    "Category '{}' mixes scalar and affine rules",
                    category
                )))
            }
        };

        tracing::debug!(
            "Converted {} {} -> {} {} ({})",
            value,
            from_unit,
            converted,
            to_unit,
            category
        );
        Ok(converted)
    }

    /// Convert one value into several target units, preserving their order
    pub fn convert_many<S: AsRef<str>>(
        &self,
        value: f64,
        from_unit: &str,
        to_units: &[S],
        category: &str,
    ) -> Result<Vec<(String, f64)>> {
        to_units
            .iter()
            .map(|unit| {
                let unit = unit.as_ref();
                self.convert(value, from_unit, unit, category)
                    .map(|converted| (unit.to_string(), converted))
            })
            .collect()
    }

    /// Register `1 from_unit = factor to_unit` in the Custom category
    ///
    /// Units already present keep their factors; a new unit is anchored to
    /// whichever side is already known. Two unknown units start a new pair
    /// with `from_unit` as factor 1.
    pub fn register_custom_unit(&mut self, from_unit: &str, to_unit: &str, factor: f64) -> Result<()> {
        let from_unit = from_unit.trim();
        let to_unit = to_unit.trim();

        if from_unit.is_empty() || to_unit.is_empty() {
            return Err(Error::Validation("Unit names must not be empty".into()));
        }
        if from_unit == to_unit {
            return Err(Error::Validation(format!(
                "Cannot define '{}' in terms of itself",
                from_unit
            )));
        }
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::Validation(format!(
                "Factor must be a positive number, got {}",
                factor
            )));
        }

        if !self.registry.contains(CUSTOM_CATEGORY) {
            self.registry
                .categories
                .push(Category::new(CUSTOM_CATEGORY, Vec::new()));
            tracing::info!("Created {} category", CUSTOM_CATEGORY);
        }

        let custom = self
            .registry
            .get_mut(CUSTOM_CATEGORY)
            .ok_or_else(|| Error::UnknownCategory(CUSTOM_CATEGORY.to_string()))?;

        if custom.kind() == Some(RuleKind::Affine) {
            return Err(Error::Validation(format!(
                "{} category holds affine rules",
                CUSTOM_CATEGORY
            )));
        }

        let existing = |name: &str| match custom.unit(name).map(|u| u.rule) {
            Some(ConversionRule::Scalar { factor }) => Some(factor),
            _ => None,
        };

        let added = match (existing(from_unit), existing(to_unit)) {
            (None, None) => vec![
                Unit::new(from_unit, ConversionRule::scalar(1.0)),
                Unit::new(to_unit, ConversionRule::scalar(factor)),
            ],
            (Some(from_factor), None) => {
                vec![Unit::new(to_unit, ConversionRule::scalar(from_factor * factor))]
            }
            (None, Some(to_factor)) => {
                vec![Unit::new(from_unit, ConversionRule::scalar(to_factor / factor))]
            }
            (Some(from_factor), Some(to_factor)) => {
                let implied = to_factor / from_factor;
                if (implied - factor).abs() > RATIO_TOLERANCE * factor.max(implied) {
                    return Err(Error::Validation(format!(
                        "'{}' and '{}' are already registered with ratio {}",
                        from_unit, to_unit, implied
                    )));
                }
                tracing::debug!("Custom conversion {} -> {} already registered", from_unit, to_unit);
                return Ok(());
            }
        };

        // Anchored factors can underflow or overflow even when both inputs are valid
        if let Some(problem) = added.iter().find_map(|u| validate_rule(&u.name, &u.rule)) {
            return Err(Error::Validation(problem));
        }
        custom.units.extend(added);

        tracing::info!(
            "Added custom conversion: 1 {} = {} {}",
            from_unit,
            factor,
            to_unit
        );
        Ok(())
    }

    /// Add a complete category at runtime
    pub fn register_category(&mut self, category: Category) -> Result<()> {
        if self.registry.contains(&category.name) {
            return Err(Error::Validation(format!(
                "Category '{}' already exists",
                category.name
            )));
        }

        let errors = validate_category(&category);
        if !errors.is_empty() {
            return Err(Error::Validation(errors.join("; ")));
        }

        tracing::info!(
            "Registered category '{}' with {} units",
            category.name,
            category.units.len()
        );
        self.registry.categories.push(category);
        Ok(())
    }
}
