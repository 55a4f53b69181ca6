//! Rebuilds the database from the Contoso CSV exports. Takes no arguments;
//! paths come from `browser.toml` / `BROWSER_*` variables.

#[tokio::main]
async fn main() -> Result<(), contoso_browser_lib::domain::error::AppError> {
    contoso_browser_lib::run_seed().await.map(|_| ())
}
