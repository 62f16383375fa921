use permeate::core::models::ion::IonSpecies;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid assignment '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },

    #[error("Unknown ion species '{0}'. Expected one of Na, K, Mg, Cl.")]
    UnknownSpecies(String),

    #[error("Invalid number '{value}' for '{key}'.")]
    InvalidNumber { key: String, value: String },
}

/// Splits `KEY=VALUE` at the first `=`, trimming both sides.
pub fn parse_assignment(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidAssignment(input.to_string()))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            input: input.to_string(),
        });
    }
    if value.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "value",
            input: input.to_string(),
        });
    }
    Ok((key, value))
}

pub fn parse_species(symbol: &str) -> Result<IonSpecies, ParseError> {
    symbol
        .parse()
        .map_err(|_| ParseError::UnknownSpecies(symbol.to_string()))
}

/// Parses a `ION=PPM` pair such as `Mg=120`.
pub fn parse_solute(input: &str) -> Result<(IonSpecies, f64), ParseError> {
    let (symbol, value) = parse_assignment(input)?;
    let species = parse_species(symbol)?;
    let ppm = parse_number(symbol, value)?;
    Ok((species, ppm))
}

pub fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}
