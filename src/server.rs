//! # Server Configuration
//!
//! This module contains the application state, router, and serve loop for
//! the Posgate API.

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::config::AppConfig;
use crate::directory::{DbLicenseDirectory, LicenseDirectory};
use crate::gateway::AccessGateway;
use crate::handlers;
use crate::seeds::PartitionSeeds;
use crate::store::PartitionStore;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub directory: Arc<dyn LicenseDirectory>,
    pub gateway: Arc<AccessGateway>,
    pub store: Arc<PartitionStore>,
}

impl AppState {
    /// Build the state graph: directory, gateway, and partition store are
    /// injected as explicit dependencies rather than process-wide globals.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        let directory: Arc<dyn LicenseDirectory> = Arc::new(DbLicenseDirectory::new(db.clone()));
        let gateway = Arc::new(AccessGateway::new(directory.clone()));
        let store = Arc::new(PartitionStore::new(
            db.clone(),
            PartitionSeeds {
                admin_password: config.seed_admin_password.clone(),
            },
        ));

        Self {
            config: Arc::new(config),
            db,
            directory,
            gateway,
            store,
        }
    }
}

/// Attach a correlation trace ID to the request's task-local context.
async fn trace_context_middleware(request: Request, next: Next) -> Response {
    let trace_id = format!("req-{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let context = TraceContext {
        trace_id: trace_id.clone(),
    };

    let mut response = telemetry::with_trace_context(context, next.run(request)).await;
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert("x-trace-id", value);
    }
    response
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let data_routes = Router::new()
        .route("/verify", get(handlers::verify::verify_license))
        .route("/login", post(handlers::operators::login))
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::categories::rename_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/products/{id}/stock", post(handlers::stock::record_intake))
        .route("/stock-journal", get(handlers::stock::stock_journal))
        .route(
            "/sales",
            get(handlers::sales::sales_report).post(handlers::sales::record_sale),
        )
        .route(
            "/config/{key}",
            get(handlers::config::get_config).put(handlers::config::set_config),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::license_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api/v1", data_routes)
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let state = AppState::new(config, db);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::verify::verify_license,
        crate::handlers::operators::login,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::create_category,
        crate::handlers::categories::rename_category,
        crate::handlers::categories::delete_category,
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::stock::record_intake,
        crate::handlers::stock::stock_journal,
        crate::handlers::sales::record_sale,
        crate::handlers::sales::sales_report,
        crate::handlers::config::get_config,
        crate::handlers::config::set_config,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::verify::VerifyResponseDto,
            crate::handlers::operators::LoginRequestDto,
            crate::handlers::operators::LoginResponseDto,
            crate::handlers::operators::OperatorDto,
            crate::handlers::categories::CategoryRequestDto,
            crate::handlers::categories::CategoryDto,
            crate::handlers::products::CreateProductDto,
            crate::handlers::products::UpdateProductDto,
            crate::handlers::products::ProductDto,
            crate::handlers::stock::StockIntakeDto,
            crate::handlers::stock::StockEntryDto,
            crate::handlers::stock::StockJournalRowDto,
            crate::handlers::sales::SaleRequestDto,
            crate::handlers::sales::SaleDto,
            crate::handlers::sales::SaleReportRowDto,
            crate::handlers::config::ConfigEntryDto,
            crate::handlers::config::SetConfigDto,
        )
    ),
    info(
        title = "Posgate API",
        description = "License-gated multi-tenant backend for the PointShop POS",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
