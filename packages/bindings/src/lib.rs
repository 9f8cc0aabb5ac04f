use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use amortize_core::AmortizeResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse a JSON input, run `f` on it and serialize the envelope back to JSON.
fn call_json<I, O, F>(input_json: &str, f: F) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
    F: FnOnce(&I) -> AmortizeResult<O>,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    call_json(&input_json, amortize_core::loans::schedule::amortization_schedule)
}

#[napi]
pub fn project_arm(input_json: String) -> NapiResult<String> {
    call_json(&input_json, amortize_core::loans::arm::project_arm)
}

#[napi]
pub fn project_graduated(input_json: String) -> NapiResult<String> {
    call_json(&input_json, amortize_core::loans::graduated::project_graduated)
}

#[napi]
pub fn run_projection(input_json: String) -> NapiResult<String> {
    call_json(&input_json, amortize_core::projection::run_projection)
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[napi]
pub fn depreciation_schedule(input_json: String) -> NapiResult<String> {
    call_json(&input_json, amortize_core::depreciation::depreciation_schedule)
}

// ---------------------------------------------------------------------------
// Tiered rates
// ---------------------------------------------------------------------------

#[napi]
pub fn tiered_interest(input_json: String) -> NapiResult<String> {
    call_json(&input_json, amortize_core::tiered::tiered_interest)
}
