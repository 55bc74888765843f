//! `appvet schema`: print the JSON Schema generated from the manifest
//! model. Useful as a starting point for a store's app-standard file.

use appvet_infra::schema::canonical_schema;

pub fn run() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&canonical_schema())?);
    Ok(())
}
