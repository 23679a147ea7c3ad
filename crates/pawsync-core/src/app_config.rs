use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    /// Rows fetched and committed per batch call. Kept small because image
    /// replication dominates wall-clock time and the whole page must fit
    /// inside one request lifetime.
    pub import_page_size: u32,
    /// Supplier id assigned to rows that carry none, when the caller also
    /// supplies none.
    pub default_supplier_id: String,

    pub http_timeout_secs: u64,
    pub http_user_agent: String,

    pub records_api_base_url: String,
    pub records_api_token: Option<String>,

    pub blob_base_url: String,
    pub blob_token: Option<String>,
    /// Object key of the supplier catalog sheet inside the blob store.
    pub catalog_csv_key: String,

    pub textgen_base_url: String,
    pub textgen_api_key: Option<String>,
    pub textgen_model: String,
    pub textgen_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("import_page_size", &self.import_page_size)
            .field("default_supplier_id", &self.default_supplier_id)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("records_api_base_url", &self.records_api_base_url)
            .field(
                "records_api_token",
                &self.records_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("blob_base_url", &self.blob_base_url)
            .field("blob_token", &self.blob_token.as_ref().map(|_| "[redacted]"))
            .field("catalog_csv_key", &self.catalog_csv_key)
            .field("textgen_base_url", &self.textgen_base_url)
            .field(
                "textgen_api_key",
                &self.textgen_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("textgen_model", &self.textgen_model)
            .field("textgen_timeout_secs", &self.textgen_timeout_secs)
            .finish()
    }
}
