pub mod config;
pub mod report;
pub mod stats;

use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T>(value: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: Serialize + ?Sized,
{
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
