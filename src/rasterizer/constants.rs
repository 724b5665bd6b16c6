//! Rasterizer constants

/// Widest framebuffer the host will allocate; larger viewports are upscaled
pub const MAX_RENDER_WIDTH: usize = 960;
