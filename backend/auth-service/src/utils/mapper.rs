/// Generic JSON conversion helpers shared across the service.
///
/// The identity embedded in a token travels as a JSON object; these helpers
/// are the explicit string/value ↔ object mapping used for that claim and
/// anywhere else a typed value crosses a JSON boundary.
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("JSON mapping failed: {0}")]
pub struct MapperError(#[from] serde_json::Error);

pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, MapperError> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_json_str<T: DeserializeOwned>(input: &str) -> Result<T, MapperError> {
    Ok(serde_json::from_str(input)?)
}

pub fn to_json_value<T: Serialize>(value: &T) -> Result<Value, MapperError> {
    Ok(serde_json::to_value(value)?)
}

pub fn from_json_value<T: DeserializeOwned>(value: Value) -> Result<T, MapperError> {
    Ok(serde_json::from_value(value)?)
}
