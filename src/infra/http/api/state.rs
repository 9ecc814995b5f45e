use std::sync::Arc;

use crate::application::render::RenderPipeline;

/// Shared state for the render API. The pipeline is immutable configuration,
/// constructed once at startup and read-only thereafter.
#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<RenderPipeline>,
}

impl ApiState {
    pub fn new(pipeline: Arc<RenderPipeline>) -> Self {
        Self { pipeline }
    }
}
