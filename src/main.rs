#[actix_web::main]
async fn main() -> Result<(), contoso_browser_lib::domain::error::AppError> {
    contoso_browser_lib::run_server().await
}
