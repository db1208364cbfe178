//! # Subsystem Container
//!
//! Holds one instance of every subsystem service and hands the gateway its
//! [`RpcHandlers`].
//!
//! ## Initialization Order
//!
//! 1. Storage backend (SQLite file or in-memory stores)
//! 2. Media (cms-01), needed by every content subsystem for cleanup
//! 3. Ordered collections (cms-02): FAQ, team, products
//! 4. News publishing (cms-03)

use std::sync::Arc;

use cms_01_media_storage::{HmacUrlSigner, InMemoryObjectStorage, MediaApi, MediaService};
use cms_02_ordered_collections::{
    Faq, InMemoryRecordStore, OrderedCollectionApi, OrderedCollectionService, OrderedPayload,
    ProductCatalogApi, ProductListing, RecordStore, SqliteDatabase, StoreError, TeamMember,
};
use cms_03_news_publishing::{
    ArticleStore, InMemoryArticleStore, InMemoryTagStore, NewsApi, NewsService, NewsStoreError,
    SqliteArticleStore, SqliteTagStore, TagStore,
};
use cms_04_api_gateway::RpcHandlers;
use thiserror::Error;
use tracing::{info, instrument};

use super::config::RuntimeConfig;

/// Failures while opening stores.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("collection store: {0}")]
    CollectionStore(#[from] StoreError),

    #[error("news store: {0}")]
    NewsStore(#[from] NewsStoreError),
}

/// Container holding every subsystem service.
pub struct CmsContainer {
    /// Upload signing and best-effort object cleanup.
    pub media: Arc<dyn MediaApi>,
    /// FAQ collection.
    pub faq: Arc<dyn OrderedCollectionApi<Faq>>,
    /// Team collection.
    pub team: Arc<dyn OrderedCollectionApi<TeamMember>>,
    /// Product catalog.
    pub products: Arc<dyn ProductCatalogApi>,
    /// News articles and tags.
    pub news: Arc<dyn NewsApi>,
    /// Shared SQLite database, when configured.
    database: Option<SqliteDatabase>,
}

impl CmsContainer {
    /// Open the configured stores and build every service.
    #[instrument(name = "subsystem_init", skip(config))]
    pub fn new(config: &RuntimeConfig) -> Result<Self, ContainerError> {
        info!("Initializing Charcoal CMS subsystem container");

        info!("Phase 1: Opening storage");
        let database = match &config.storage.database_path {
            Some(path) => {
                let db = SqliteDatabase::open(path)?;
                info!(path = %path.display(), "  SQLite database opened");
                Some(db)
            }
            None => {
                info!("  No database path set, content is kept in memory");
                None
            }
        };

        info!("Phase 2: Initializing media storage");
        let storage = Arc::new(InMemoryObjectStorage::new(
            HmacUrlSigner::new(
                config.media.signing_secret.to_vec(),
                config.media.upload_base_url.clone(),
            ),
            config.media.public_base_url.clone(),
        ));
        let media: Arc<dyn MediaApi> = Arc::new(MediaService::with_config(
            config.media.limits.clone(),
            storage,
        ));
        info!("  [1] Media storage initialized");

        info!("Phase 3: Initializing ordered collections");
        let faq = Arc::new(OrderedCollectionService::with_config(
            config.collections.clone(),
            record_store::<Faq>(database.as_ref())?,
            Arc::clone(&media),
        ));
        let team = Arc::new(OrderedCollectionService::with_config(
            config.collections.clone(),
            record_store::<TeamMember>(database.as_ref())?,
            Arc::clone(&media),
        ));
        let products = Arc::new(OrderedCollectionService::with_config(
            config.collections.clone(),
            record_store::<ProductListing>(database.as_ref())?,
            Arc::clone(&media),
        ));
        info!(
            max_size = config.collections.max_collection_size,
            "  [2] FAQ, team and product collections initialized"
        );

        info!("Phase 4: Initializing news publishing");
        let (articles, tags) = news_stores(database.as_ref())?;
        let news = Arc::new(NewsService::with_config(
            config.publishing.clone(),
            articles,
            tags,
            Arc::clone(&media),
        ));
        info!("  [3] News publishing initialized");

        info!("All subsystems initialized successfully");

        Ok(Self {
            media,
            faq,
            team,
            products,
            news,
            database,
        })
    }

    /// Whether content survives a restart.
    pub fn is_persistent(&self) -> bool {
        self.database.is_some()
    }

    /// Handles for the gateway's method dispatch.
    pub fn rpc_handlers(&self) -> RpcHandlers {
        RpcHandlers {
            faq: Arc::clone(&self.faq),
            team: Arc::clone(&self.team),
            products: Arc::clone(&self.products),
            news: Arc::clone(&self.news),
            media: Arc::clone(&self.media),
        }
    }
}

fn record_store<P: OrderedPayload>(
    database: Option<&SqliteDatabase>,
) -> Result<Arc<dyn RecordStore<P>>, ContainerError> {
    let store: Arc<dyn RecordStore<P>> = match database {
        Some(db) => Arc::new(db.record_store::<P>()?),
        None => Arc::new(InMemoryRecordStore::<P>::new()),
    };
    Ok(store)
}

fn news_stores(
    database: Option<&SqliteDatabase>,
) -> Result<(Arc<dyn ArticleStore>, Arc<dyn TagStore>), ContainerError> {
    let stores: (Arc<dyn ArticleStore>, Arc<dyn TagStore>) = match database {
        Some(db) => (
            Arc::new(SqliteArticleStore::new(db.connection())?),
            Arc::new(SqliteTagStore::new(db.connection())?),
        ),
        None => (
            Arc::new(InMemoryArticleStore::new()),
            Arc::new(InMemoryTagStore::new()),
        ),
    };
    Ok(stores)
}
