use std::{net::TcpListener, sync::Arc, time::Duration};

use actix_web::{
    App, HttpServer,
    dev::Server,
    middleware::from_fn,
    web::{Data, ThinData},
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use todo_config::shared::PgConnectionConfig;
use tracing::warn;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{ApiConfig, KubernetesConfig},
    k8s::{K8sClient, K8sError, ServiceIdentity, http::HttpK8sClient},
    metrics::{init_metrics, record_request_metrics},
    routes::{
        ErrorMessage,
        env::read_env,
        error::{trigger_error, trigger_error_post},
        health::{HealthResponse, ReadyResponse, VersionResponse, health, ready, version},
        items::{
            CreateItemRequest, ReadItemResponse, ReadItemsResponse, UpdateItemRequest,
            create_item, delete_item, read_all_items, read_item, update_item,
        },
        metrics::metrics,
        test_pod::{CreateTestPodResponse, create_test_pod},
    },
    store::{ItemStore, postgres::PgItemStore},
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: ApiConfig) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);
        let store = Arc::new(PgItemStore::new(connection_pool)) as Arc<dyn ItemStore>;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let k8s_client = match build_k8s_client(&config.kubernetes).await {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(
                    "Failed to create Kubernetes client: {}. Running without Kubernetes support.",
                    e
                );
                None
            }
        };

        let server = run(config, listener, store, k8s_client).await?;

        Ok(Self { port, server })
    }

    pub async fn migrate_database(config: PgConnectionConfig) -> Result<(), anyhow::Error> {
        let connection_pool = get_connection_pool(&config);

        sqlx::migrate!("./migrations").run(&connection_pool).await?;

        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(config: &PgConnectionConfig) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.with_db())
}

/// Resolves the service identity and builds the real Kubernetes client.
async fn build_k8s_client(config: &KubernetesConfig) -> Result<Arc<dyn K8sClient>, K8sError> {
    let identity = ServiceIdentity::discover(config.namespace.as_deref()).await?;
    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let client = HttpK8sClient::new(identity, request_timeout)?;

    Ok(Arc::new(client) as Arc<dyn K8sClient>)
}

// The Kubernetes client is passed as an option because the service keeps
// serving item traffic when no cluster credentials are available (local
// development, misconfigured deployments); only /api/test-pod degrades.
pub async fn run(
    config: ApiConfig,
    listener: TcpListener,
    store: Arc<dyn ItemStore>,
    k8s_client: Option<Arc<dyn K8sClient>>,
) -> Result<Server, anyhow::Error> {
    let metrics_handle = init_metrics()?;

    let config = Data::new(config);
    let store: Data<dyn ItemStore> = Data::from(store);
    let k8s_client: Option<Data<dyn K8sClient>> = k8s_client.map(Into::into);

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::routes::health::health,
            crate::routes::health::ready,
            crate::routes::health::version,
            crate::routes::metrics::metrics,
            crate::routes::env::read_env,
            crate::routes::error::trigger_error,
            crate::routes::error::trigger_error_post,
            crate::routes::test_pod::create_test_pod,
            crate::routes::items::read_all_items,
            crate::routes::items::read_item,
            crate::routes::items::create_item,
            crate::routes::items::update_item,
            crate::routes::items::delete_item,
        ),
        components(schemas(
            ErrorMessage,
            HealthResponse,
            ReadyResponse,
            VersionResponse,
            CreateTestPodResponse,
            CreateItemRequest,
            UpdateItemRequest,
            ReadItemResponse,
            ReadItemsResponse,
        ))
    )]
    struct ApiDoc;

    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        let tracing_logger = TracingLogger::default();
        let app = App::new()
            .wrap(
                sentry::integrations::actix::Sentry::builder()
                    .capture_server_errors(true)
                    .start_transaction(true)
                    .finish(),
            )
            .wrap(tracing_logger)
            .wrap(from_fn(record_request_metrics))
            .service(health)
            .service(ready)
            .service(version)
            .service(metrics)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(read_env)
            .service(trigger_error)
            .service(trigger_error_post)
            .service(create_test_pod)
            .service(read_all_items)
            .service(read_item)
            .service(create_item)
            .service(update_item)
            .service(delete_item)
            .app_data(config.clone())
            .app_data(store.clone())
            .app_data(ThinData(metrics_handle.clone()));

        if let Some(k8s_client) = k8s_client.clone() {
            app.app_data(k8s_client)
        } else {
            app
        }
    })
    .listen(listener)?
    .run();

    Ok(server)
}
