use actix_web::{web, App, HttpServer};
use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::middleware::cors::cors_middleware;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::ws::broker::RealtimeBroker;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("🚀 Starting Codebreak Backend on http://{}:{}", host, port);

    let mut app_state = match build_state().with_db(DbProfile::Prod).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Database connected");

    // Realtime is optional: without REDIS_URL the engine still runs, clients
    // just fall back to polling the snapshot endpoint.
    match std::env::var("REDIS_URL") {
        Ok(redis_url) => match RealtimeBroker::connect(&redis_url).await {
            Ok(broker) => {
                app_state = app_state.with_broker(broker);
                println!("✅ Realtime broker connected");
            }
            Err(e) => {
                eprintln!("❌ Failed to connect realtime broker: {e}");
                std::process::exit(1);
            }
        },
        Err(_) => {
            println!("⚠️  REDIS_URL not set; realtime notifications disabled");
        }
    }

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .service(web::scope("/api/rooms").configure(routes::rooms::configure_routes))
            .service(web::scope("/api/realtime").configure(routes::realtime::configure_routes))
            .route("/", web::get().to(routes::health::root))
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
