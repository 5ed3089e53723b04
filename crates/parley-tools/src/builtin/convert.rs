use crate::error::{Result, ToolError};
use crate::traits::{Tool, ToolOutput};
use async_trait::async_trait;
use parley_core::{Context, ToolDefinition, ToolParameter};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dimension {
    Length,
    Mass,
    Temperature,
}

impl Dimension {
    fn as_str(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Mass => "mass",
            Dimension::Temperature => "temperature",
        }
    }
}

/// Linear units: (aliases, dimension, size in the dimension's base unit).
const LINEAR_UNITS: &[(&[&str], Dimension, f64)] = &[
    (&["m", "meter", "meters", "metre", "metres"], Dimension::Length, 1.0),
    (&["km", "kilometer", "kilometers", "kilometre", "kilometres"], Dimension::Length, 1_000.0),
    (&["cm", "centimeter", "centimeters"], Dimension::Length, 0.01),
    (&["mm", "millimeter", "millimeters"], Dimension::Length, 0.001),
    (&["mi", "mile", "miles"], Dimension::Length, 1_609.344),
    (&["yd", "yard", "yards"], Dimension::Length, 0.9144),
    (&["ft", "foot", "feet"], Dimension::Length, 0.3048),
    (&["in", "inch", "inches"], Dimension::Length, 0.0254),
    (&["au", "astronomical_unit"], Dimension::Length, 149_597_870_700.0),
    (&["ly", "light_year", "light_years", "lightyear", "lightyears"], Dimension::Length, 9_460_730_472_580_800.0),
    (&["kg", "kilogram", "kilograms"], Dimension::Mass, 1.0),
    (&["g", "gram", "grams"], Dimension::Mass, 0.001),
    (&["mg", "milligram", "milligrams"], Dimension::Mass, 0.000_001),
    (&["t", "tonne", "tonnes"], Dimension::Mass, 1_000.0),
    (&["lb", "lbs", "pound", "pounds"], Dimension::Mass, 0.453_592_37),
    (&["oz", "ounce", "ounces"], Dimension::Mass, 0.028_349_523_125),
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum Unit {
    Linear { dimension: Dimension, factor: f64 },
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Unit {
    fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "c" | "celsius" | "°c" => return Some(Unit::Celsius),
            "f" | "fahrenheit" | "°f" => return Some(Unit::Fahrenheit),
            "k" | "kelvin" => return Some(Unit::Kelvin),
            _ => {}
        }
        LINEAR_UNITS
            .iter()
            .find(|(aliases, _, _)| aliases.contains(&key.as_str()))
            .map(|&(_, dimension, factor)| Unit::Linear { dimension, factor })
    }

    fn dimension(&self) -> Dimension {
        match self {
            Unit::Linear { dimension, .. } => *dimension,
            _ => Dimension::Temperature,
        }
    }

    fn to_base(&self, value: f64) -> f64 {
        match self {
            Unit::Linear { factor, .. } => value * factor,
            Unit::Celsius => value,
            Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Unit::Kelvin => value - 273.15,
        }
    }

    fn from_base(&self, value: f64) -> f64 {
        match self {
            Unit::Linear { factor, .. } => value / factor,
            Unit::Celsius => value,
            Unit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => value + 273.15,
        }
    }
}

fn convert(value: f64, from: &str, to: &str) -> std::result::Result<f64, String> {
    let source = Unit::parse(from).ok_or_else(|| format!("unknown unit '{}'", from))?;
    let target = Unit::parse(to).ok_or_else(|| format!("unknown unit '{}'", to))?;

    if source.dimension() != target.dimension() {
        return Err(format!(
            "cannot convert {} ({}) to {} ({})",
            from,
            source.dimension().as_str(),
            to,
            target.dimension().as_str()
        ));
    }

    Ok(target.from_base(source.to_base(value)))
}

/// Converts between common length, mass and temperature units.
pub struct ConvertUnitsTool {
    def: ToolDefinition,
}

impl ConvertUnitsTool {
    pub fn new() -> Self {
        let def = ToolDefinition::new(
            "convert_units",
            "Convert a value between units of length (m, km, mi, ft, in, au, ly...), mass (kg, g, lb, oz...) or temperature (c, f, k).",
        )
        .with_required_param("value", ToolParameter::number().with_description("The value to convert"))
        .with_required_param("from", ToolParameter::string().with_description("Unit of the value"))
        .with_required_param("to", ToolParameter::string().with_description("Unit to convert to"));

        Self { def }
    }
}

impl Default for ConvertUnitsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct ConvertInput {
    value: f64,
    from: String,
    to: String,
}

#[async_trait]
impl Tool for ConvertUnitsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.def
    }

    async fn execute(&self, _ctx: &Context, input: Value) -> Result<ToolOutput> {
        let input: ConvertInput = serde_json::from_value(input)?;
        let converted = convert(input.value, &input.from, &input.to)
            .map_err(|message| ToolError::invalid_arguments("convert_units", message))?;

        Ok(ToolOutput::text(format!(
            "{} {} = {} {}",
            input.value,
            input.from.trim(),
            format_number(converted),
            input.to.trim()
        )))
    }
}

fn format_number(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e12 || value.abs() < 1e-4) {
        format!("{:.6e}", value)
    } else {
        let fixed = format!("{:.6}", value);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_length_and_mass() {
        assert!(close(convert(1.0, "km", "m").unwrap(), 1000.0));
        assert!(close(convert(1.0, "mile", "km").unwrap(), 1.609344));
        assert!(close(convert(2.0, "lb", "kg").unwrap(), 0.90718474));
        assert!(close(convert(1.0, "ly", "au").unwrap(), 63_241.077_084_266_28));
    }

    #[test]
    fn test_temperature() {
        assert!(close(convert(100.0, "C", "F").unwrap(), 212.0));
        assert!(close(convert(32.0, "fahrenheit", "celsius").unwrap(), 0.0));
        assert!(close(convert(0.0, "K", "C").unwrap(), -273.15));
    }

    #[test]
    fn test_incompatible_and_unknown() {
        let err = convert(1.0, "kg", "m").unwrap_err();
        assert!(err.contains("mass"));
        assert!(convert(1.0, "parsec", "m").unwrap_err().contains("parsec"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(212.0), "212");
        assert_eq!(format_number(1.609344), "1.609344");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(9.4607304725808e15), "9.460730e15");
    }

    #[tokio::test]
    async fn test_execute() {
        let tool = ConvertUnitsTool::new();
        let output = tool
            .execute(&Context::new(), json!({"value": 100, "from": "c", "to": "f"}))
            .await
            .unwrap();
        assert_eq!(output.content, "100 c = 212 f");

        let err = tool
            .execute(&Context::new(), json!({"value": 1, "from": "kg", "to": "ft"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArguments");
    }
}
