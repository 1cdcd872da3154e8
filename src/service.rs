//! Orchestration boundary: the end-to-end create-badge operation.
//!
//! Upload handling and result serving belong to whatever web layer embeds
//! this crate; the operations here only chain background removal into the
//! compositor and persist finished bytes.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::badge::{self, BadgeError, BadgeRequest, RenderDiagnostics};
use crate::remove_bg::{self, RemoveBgError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("name must not be empty")]
    EmptyName,
    #[error(transparent)]
    RemoveBg(#[from] RemoveBgError),
    #[error(transparent)]
    Badge(#[from] BadgeError),
    #[error("failed to write badge file: {0}")]
    Write(#[from] std::io::Error),
}

/// Remove the photo's background, then render the badge. Returns the encoded
/// JPEG and the render diagnostics.
pub async fn create_badge(
    http: &reqwest::Client,
    photo: Vec<u8>,
    filename: &str,
    name: &str,
    category: &str,
    font_size: Option<u32>,
) -> Result<(Vec<u8>, RenderDiagnostics), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::EmptyName);
    }

    let cutout = remove_bg::remove_background(http, photo, filename).await?;

    let mut request = BadgeRequest::new(cutout, name, category);
    if let Some(size) = font_size {
        request = request.with_font_size(size);
    }
    let (jpeg, diagnostics) = badge::render_badge(&request)?;
    info!(
        name,
        category,
        font_source = %diagnostics.font_source,
        background = %diagnostics.background,
        "badge rendered"
    );
    Ok((jpeg, diagnostics))
}

/// Persist finished badge bytes. Nothing is written unless rendering already
/// succeeded, so a failed render never leaves a partial file behind;
/// `fs::write` flushes and closes on every exit path.
pub fn save_badge(path: &Path, jpeg: &[u8]) -> Result<(), ServiceError> {
    std::fs::write(path, jpeg)?;
    Ok(())
}
