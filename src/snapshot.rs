//! JSON snapshot persistence for brackets and pool entries.
//!
//! The format is a plain serde document; the contract is round-trip
//! fidelity. Everything read back is shape-validated before use so a
//! malformed file fails at load time instead of corrupting a simulation.

use std::fs;
use std::path::Path;

use crate::bracket::Bracket;
use crate::error::ConfigError;
use crate::group::BracketEntry;

pub fn bracket_from_json(json: &str) -> Result<Bracket, ConfigError> {
    let bracket: Bracket = serde_json::from_str(json)?;
    bracket.validate()?;
    Ok(bracket)
}

pub fn bracket_to_json(bracket: &Bracket) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(bracket)?)
}

pub fn load_bracket(path: impl AsRef<Path>) -> Result<Bracket, ConfigError> {
    bracket_from_json(&fs::read_to_string(path)?)
}

pub fn save_bracket(bracket: &Bracket, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    fs::write(path, bracket_to_json(bracket)?)?;
    Ok(())
}

pub fn entry_from_json(json: &str) -> Result<BracketEntry, ConfigError> {
    let entry: BracketEntry = serde_json::from_str(json)?;
    entry.bracket.validate()?;
    Ok(entry)
}

pub fn entry_to_json(entry: &BracketEntry) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(entry)?)
}

pub fn load_entry(path: impl AsRef<Path>) -> Result<BracketEntry, ConfigError> {
    entry_from_json(&fs::read_to_string(path)?)
}

pub fn save_entry(entry: &BracketEntry, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    fs::write(path, entry_to_json(entry)?)?;
    Ok(())
}
