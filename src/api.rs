//! HTTP API endpoints.
//!
//! Everything session-related goes over the WebSocket; these are for
//! clients that want the catalog before connecting and for health checks.

use axum::Json;
use serde::Serialize;

use crate::languages::SUPPORTED_LANGUAGES;
use crate::preview;
use crate::protocol::LanguageInfo;

/// Catalog entry plus what the editor can do with it
#[derive(Debug, Clone, Serialize)]
pub struct LanguageEntry {
    #[serde(flatten)]
    pub info: LanguageInfo,
    pub has_preview: bool,
}

/// List supported editor languages.
///
/// GET /api/languages
pub async fn list_languages() -> Json<Vec<LanguageEntry>> {
    Json(
        SUPPORTED_LANGUAGES
            .iter()
            .map(|l| LanguageEntry {
                info: l.into(),
                has_preview: preview::has_preview(l.id),
            })
            .collect(),
    )
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_languages() {
        let Json(entries) = list_languages().await;
        assert_eq!(entries.len(), SUPPORTED_LANGUAGES.len());

        let html = entries.iter().find(|e| e.info.id == "html").unwrap();
        assert!(html.has_preview);
        assert_eq!(html.info.extension, "html");

        let json = serde_json::to_value(html).unwrap();
        assert_eq!(json["id"], "html");
        assert_eq!(json["has_preview"], true);
    }
}
