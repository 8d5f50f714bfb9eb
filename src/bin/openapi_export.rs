// Prints the OpenAPI document served at /api-docs/openapi.json
// Run with: cargo run --bin openapi_export > openapi.json

use anyhow::Result;
use utoipa::OpenApi;

use api_responder::api::openapi::ApiDoc;

fn main() -> Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
