pub mod depreciation;
pub mod loans;
pub mod tiered;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::input;

/// Resolve a command's input: `--input` file first, then piped stdin, then flags.
pub fn load_input<T, F>(path: Option<&str>, from_flags: F) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn std::error::Error>>,
{
    if let Some(path) = path {
        return input::file::read_input(path);
    }
    if let Some(value) = input::stdin::read_stdin()? {
        return Ok(value);
    }
    from_flags()
}

/// Serialize a computation result for the output layer.
pub fn to_value<T: Serialize>(result: T) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(result)?)
}
