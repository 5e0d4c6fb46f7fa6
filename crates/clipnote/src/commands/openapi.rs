use clipnote_api_server::router::generate_openapi_spec;
use shared::error::CommonError;

pub fn cmd_openapi() -> Result<(), CommonError> {
    let spec = generate_openapi_spec();
    let json = serde_json::to_string_pretty(&spec)?;
    println!("{json}");
    Ok(())
}
