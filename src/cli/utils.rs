use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data) = data {
                response["data"] = data;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a value as pretty JSON, or hand it to `text` for the table view
pub fn output_data<T, F>(output_format: OutputFormat, data: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "data": data }))?),
        OutputFormat::Text => text(data),
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}
