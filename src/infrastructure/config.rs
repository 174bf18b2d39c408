use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("Invalid value for {var}: {value}")]
    EnvVar { var: String, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub cors: CorsConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    /// Output size of the embedding model, and therefore the size the vector
    /// index is created with. Every vector returned by the provider is checked
    /// against this single value.
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Toggles the embed and store/retrieve stages of the query pipeline.
    pub enabled: bool,
    /// "qdrant" or "memory".
    pub backend: String,
    pub qdrant_url: String,
    pub collection: String,
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: "memory".to_string(),
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "documents".to_string(),
            top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub query: QueryPromptConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryPromptConfig {
    /// System instruction template. Placeholders: {{resume}}, {{question}},
    /// {{context}}.
    pub system: String,
}

impl Default for QueryPromptConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_QUERY_PROMPT.to_string(),
        }
    }
}

impl QueryPromptConfig {
    pub fn render(&self, resume: &str, question: &str, context: &str) -> String {
        self.system
            .replace("{{resume}}", resume)
            .replace("{{question}}", question)
            .replace("{{context}}", context)
    }
}

const DEFAULT_QUERY_PROMPT: &str = r#"You are an assistant that reads the content of a PDF document and answers questions based on the text provided. Your task is to provide accurate answers based on the content of the document.

Document: {{resume}}

Question: {{question}}
{{context}}
Return the answer in the following JSON format:
{
    "answer": "str"
}
If the question cannot be answered based on the document, provide a response indicating that no relevant information was found.

Respond with JSON only. Never include any extra characters, non-whitespace characters, comments, or explanations.
"#;

impl AppConfig {
    /// Loads configuration: defaults, then the YAML file named by CONFIG_PATH
    /// (if any), then environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::EnvVar {
                var: "SERVER_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.retrieval.qdrant_url = url;
        }
        if let Ok(enabled) = std::env::var("RETRIEVAL_ENABLED") {
            self.retrieval.enabled = enabled.parse().map_err(|_| ConfigError::EnvVar {
                var: "RETRIEVAL_ENABLED".to_string(),
                value: enabled,
            })?;
        }
        Ok(())
    }
}
