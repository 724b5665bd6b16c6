//! Rendering surface seam
//!
//! The scene renders into a [`Framebuffer`] it owns and hands each finished
//! frame to a host surface. On desktop and web that surface is a GPU texture;
//! tests use [`MemorySurface`].

use super::error::SurfaceError;
use crate::rasterizer::{Framebuffer, Viewport};

/// Where finished frames go
pub trait RenderSurface {
    /// Match a new viewport size
    fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError>;
    /// Show a completed frame
    fn present(&mut self, frame: &Framebuffer) -> Result<(), SurfaceError>;
}

/// Creates surfaces at mount time
pub trait SurfaceProvider {
    type Surface: RenderSurface;

    fn acquire(&mut self, viewport: Viewport) -> Result<Self::Surface, SurfaceError>;
}

/// Reject zero-area viewports the same way for every surface
pub fn check_viewport(viewport: Viewport) -> Result<(), SurfaceError> {
    if viewport.is_empty() {
        return Err(SurfaceError::ZeroSize {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}

/// Surface that keeps a copy of the last presented frame
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub viewport: Option<Viewport>,
    pub last_frame: Option<Vec<u8>>,
    pub presented: usize,
}

impl RenderSurface for MemorySurface {
    fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        check_viewport(viewport)?;
        self.viewport = Some(viewport);
        Ok(())
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), SurfaceError> {
        self.last_frame = Some(frame.pixels.clone());
        self.presented += 1;
        Ok(())
    }
}

/// Hands out [`MemorySurface`]s
#[derive(Debug, Default)]
pub struct MemoryProvider;

impl SurfaceProvider for MemoryProvider {
    type Surface = MemorySurface;

    fn acquire(&mut self, viewport: Viewport) -> Result<MemorySurface, SurfaceError> {
        check_viewport(viewport)?;
        Ok(MemorySurface {
            viewport: Some(viewport),
            ..MemorySurface::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        let err = MemoryProvider.acquire(Viewport::new(0, 10)).unwrap_err();
        assert_eq!(err, SurfaceError::ZeroSize { width: 0, height: 10 });
    }

    #[test]
    fn test_present_keeps_last_frame() {
        let mut surface = MemoryProvider.acquire(Viewport::new(4, 4)).unwrap();
        let fb = Framebuffer::new(4, 4);
        surface.present(&fb).unwrap();
        surface.present(&fb).unwrap();
        assert_eq!(surface.presented, 2);
        assert_eq!(surface.last_frame.as_ref().map(Vec::len), Some(4 * 4 * 4));
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut surface = MemorySurface::default();
        surface.resize(Viewport::new(8, 6)).unwrap();
        assert_eq!(surface.viewport, Some(Viewport::new(8, 6)));
        assert!(surface.resize(Viewport::new(8, 0)).is_err());
    }
}
