use pdf_query_quest::api::{create_router, AppState};
use pdf_query_quest::application::QueryService;
use pdf_query_quest::domain::ports::VectorStore;
use pdf_query_quest::infrastructure::{
    AppConfig, InMemoryVectorStore, OpenAiChat, QdrantVectorStore, TextEmbedding,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    let embedding = Arc::new(TextEmbedding::from_config(&config.embedding));
    let chat = Arc::new(OpenAiChat::from_config(&config.llm));

    let vector_store: Arc<dyn VectorStore> =
        if config.retrieval.enabled && config.retrieval.backend == "qdrant" {
            let store = QdrantVectorStore::new(
                &config.retrieval.qdrant_url,
                &config.retrieval.collection,
                config.embedding.dimension,
            )
            .await?;
            info!(collection = %config.retrieval.collection, "Qdrant vector store ready");
            Arc::new(store)
        } else {
            Arc::new(InMemoryVectorStore::new())
        };

    let mut query_service = QueryService::new(
        embedding,
        vector_store.clone(),
        chat,
        config.prompts.query.clone(),
    );
    if config.retrieval.enabled {
        query_service = query_service.with_retrieval(config.retrieval.top_k);
    }

    let config = Arc::new(config);
    let state = AppState::new(Arc::new(query_service), vector_store, config.clone());
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
