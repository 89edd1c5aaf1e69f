//! Map Renderer Port
//!
//! Defines the interface for turning a map model into a visual artifact.

use crate::domain::entities::MapModel;

/// Failure of a rendering collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("map model could not be serialized: {0}")]
    Serialization(String),
    #[error("renderer failed: {0}")]
    Backend(String),
}

/// Renderer for map models.
///
/// Places markers at `user_marker` and at each carrier marker, and draws
/// the coverage region around `center`. The core does not depend on how.
pub trait MapRenderer: Send + Sync {
    /// Render the model to a document (HTML, SVG, ...).
    fn render(&self, map: &MapModel) -> Result<String, RenderError>;

    /// MIME type of the rendered document.
    fn content_type(&self) -> &'static str;
}
