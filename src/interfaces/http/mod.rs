pub mod render;

use crate::application::BrowseUseCase;
use crate::domain::entity::Entity;
use crate::domain::page::parse_page;
use actix_web::{dev::Server, get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use std::time::Instant;

pub struct HttpState {
    pub browse: BrowseUseCase,
}

/// Last `page` in the query string, so `?page=2&page=3` reads page 3;
/// anything unreadable falls back to page 1
fn requested_page(req: &HttpRequest) -> i64 {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string()).ok();
    let raw = pairs.as_ref().and_then(|pairs| {
        pairs
            .iter()
            .rev()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.as_str())
    });
    parse_page(raw)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn not_found(path: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(render::not_found(path))
}

fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(render::server_error())
}

#[get("/")]
async fn dashboard(data: web::Data<HttpState>) -> impl Responder {
    match data.browse.counts().await {
        Ok(counts) => html(render::dashboard(&counts)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to count tables");
            server_error()
        }
    }
}

#[get("/{entity}")]
async fn table(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> impl Responder {
    let Ok(entity) = path.parse::<Entity>() else {
        return not_found(req.path());
    };
    let page = requested_page(&req);
    let started = Instant::now();

    match data.browse.paginate(entity, page).await {
        Ok(result) => {
            tracing::info!(
                table = entity.table(),
                page = result.page,
                rows = result.rows.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Served page"
            );
            html(render::table_page(entity, &result))
        }
        Err(e) => {
            tracing::error!(table = entity.table(), page, error = %e, "Failed to load page");
            server_error()
        }
    }
}

async fn fallback(req: HttpRequest) -> impl Responder {
    not_found(req.path())
}

/// Routes shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard)
        .service(table)
        .default_service(web::route().to(fallback));
}

pub fn start_server(browse: BrowseUseCase, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { browse });

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .workers(1)
        .bind((host, port))?
        .run();

    Ok(server)
}
