//! Markdown rendering.
//!
//! The block-normalized section is already valid Markdown with inline issue
//! links, so rendering emits it as is: no escaping, no per-item wrapping.

/// Render a Markdown-target normalized block.
pub fn render(block: String) -> String {
    block
}
