//! Named configuration for the text transformations.
//!
//! The fixed blocks and line prefixes the editor matches against are data,
//! not code. Keeping them in one struct lets tests drive the pipeline with
//! synthetic fixtures instead of the reference values.

/// How the base-URL line gets its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPlaceholder {
    /// Replace the literal environment token (e.g. `test`) with `{{env}}`.
    EnvToken,
    /// Replace the host segment between the scheme and the version path
    /// with `{{env.baseUrl.<Title>}}`, the variable name being derived
    /// from the collection title.
    TitledBaseUrl,
}

#[derive(Debug, Clone)]
pub struct AmendRules {
    /// Prefix identifying the base-URL line. Strict deployments use
    /// `- url: https://` to skip relative server entries.
    pub url_prefix: String,

    /// Literal token replaced in `EnvToken` mode.
    pub env_token: String,

    pub url_placeholder: UrlPlaceholder,

    /// Vendor word stripped from titles when deriving variable names or
    /// rewriting titles.
    pub vendor: String,

    /// When set, titles are rewritten before annotation: the vendor word
    /// and the word `API` are dropped and this prefix is prepended.
    /// `None` leaves titles as authored.
    pub title_prefix: Option<String>,

    /// Request-level auth block, removed verbatim wherever it appears.
    pub request_auth: Vec<String>,

    /// Collection-level default auth block, appended once if absent.
    pub collection_auth: Vec<String>,

    /// Prefix of the line carrying the quoted version value.
    pub version_prefix: String,

    /// Prefix of the line carrying the quoted collection title.
    pub title_line_prefix: String,
}

impl Default for AmendRules {
    fn default() -> Self {
        Self {
            url_prefix: "- url:".to_string(),
            env_token: "test".to_string(),
            url_placeholder: UrlPlaceholder::EnvToken,
            vendor: "Adyen".to_string(),
            title_prefix: None,
            request_auth: vec![
                "      security:".to_string(),
                "      - BasicAuth: []".to_string(),
                "      - ApiKeyAuth: []".to_string(),
            ],
            collection_auth: vec![
                "security:".to_string(),
                "  - ApiKeyAuth: []".to_string(),
            ],
            version_prefix: "  version:".to_string(),
            title_line_prefix: "  title:".to_string(),
        }
    }
}
