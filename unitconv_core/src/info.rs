//! Short descriptions of well-known units.

const UNIT_INFO: &[(&str, &str)] = &[
    (
        "Metre",
        "The metre is the base unit of length in the International System of Units (SI).",
    ),
    (
        "Kilometre",
        "The kilometre is a unit of length in the metric system, equal to one thousand metres.",
    ),
    (
        "Celsius",
        "Celsius is a scale and unit of measurement for temperature.",
    ),
    (
        "Fahrenheit",
        "Fahrenheit is a temperature scale based on one proposed in 1724 by the physicist Daniel Gabriel Fahrenheit.",
    ),
    (
        "Kilogram",
        "The kilogram is the base unit of mass in the International System of Units (SI).",
    ),
    ("Litre", "The litre is a metric unit of volume."),
];

/// Look up the description of a unit, if one is known
pub fn unit_info(unit: &str) -> Option<&'static str> {
    UNIT_INFO
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, text)| *text)
}

/// Units that have a description, in display order
pub fn described_units() -> impl Iterator<Item = &'static str> {
    UNIT_INFO.iter().map(|(name, _)| *name)
}
