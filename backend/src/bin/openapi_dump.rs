//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use color_eyre::eyre::Result;
use payments_api::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi().to_pretty_json()?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
