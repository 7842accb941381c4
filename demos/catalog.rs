//! Serves a small catalog with cache headers declared in `demos/cachectl.json`.
//!
//! ```text
//! RUST_LOG=cachectl=debug cargo run --example catalog
//! curl -i http://127.0.0.1:8080/items        # public, max-age=360, s-maxage=600
//! curl -i http://127.0.0.1:8080/items/42     # private, must-revalidate
//! curl -i http://127.0.0.1:8080/account      # no-store
//! curl -i http://127.0.0.1:8080/cart         # no-cache + Pragma (nothing declared)
//! ```

use cachectl::cache::{CacheControlConfig, CacheControlMiddleware};
use cachectl::context::Context;
use cachectl::middleware::LoggerMiddleware;
use cachectl::router::HandlerRef;
use cachectl::{Method, Response, Router, Server, StatusCode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/cachectl.json");
    let config = CacheControlConfig::from_file(config_path)?;

    let mut router = Router::new();
    router.layer(LoggerMiddleware);
    router.layer(CacheControlMiddleware::from_config(&config));

    router.handle(
        Method::Get,
        "/items",
        HandlerRef::new("Catalog", "list"),
        |_ctx| async { Response::new(StatusCode::Ok).body(r#"[{"id":42}]"#) },
    );
    router.handle(
        Method::Get,
        "/items/:id",
        HandlerRef::new("Catalog", "show"),
        |ctx: Context| async move {
            let id = ctx.params().get("id").unwrap_or("?").to_owned();
            Response::new(StatusCode::Ok).body(format!(r#"{{"id":{id}}}"#))
        },
    );
    router.handle(
        Method::Get,
        "/account",
        HandlerRef::new("Account", "view"),
        |_ctx| async { Response::new(StatusCode::Ok).body("account") },
    );
    router.handle(
        Method::Get,
        "/cart",
        HandlerRef::new("Cart", "view"),
        |_ctx| async { Response::new(StatusCode::Ok).body("cart") },
    );
    router.get("/health", |_ctx| async { Response::new(StatusCode::NoContent) });

    Server::bind("127.0.0.1:8080").await?.serve(router).await?;
    Ok(())
}
