// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render trigger contract.

/// Zero-argument render trigger called once per processed tick.
///
/// The core never inspects the result; drawing is entirely the host
/// renderer's business.
pub trait RenderSink: Send {
    /// Draw the current scene graph.
    fn render(&mut self);
}

/// Renderer that does nothing; for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn render(&mut self) {}
}

impl<F: FnMut() + Send> RenderSink for F {
    fn render(&mut self) {
        self();
    }
}
