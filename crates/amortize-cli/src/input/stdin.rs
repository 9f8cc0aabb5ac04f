use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a piped JSON or YAML document from stdin.
///
/// Returns `None` when stdin is a TTY or the pipe is empty. JSON is tried
/// first; YAML is the fallback so hand-written documents can be piped too.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|yaml_err| -> Box<dyn std::error::Error> {
                format!("stdin is neither valid JSON ({json_err}) nor YAML ({yaml_err})").into()
            }),
    }
}
