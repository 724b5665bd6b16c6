//! Score city visualizer
//!
//! Owns one mounted scene: the skyline, the indicator, the camera, the
//! overlay labels and the surface frames are presented to. The host drives
//! it by calling [`ScoreCity::frame`] once per display refresh.
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized -> Building -> Running -> TornDown
//!                     |                     |
//!                     v                     v
//!                   Failed              (remount)
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::camera_rig::{CameraMode, CameraRig};
use super::config::CityConfig;
use super::error::{CityError, SurfaceError};
use super::indicator::{Indicator, Motion};
use super::overlay::{LabelAnchor, LabelKind, OverlaySink};
use super::score::{BandId, Score, ScoreBand, UnknownBand, BANDS};
use super::skyline::{band_label_anchor, Skyline};
use super::surface::{check_viewport, RenderSurface, SurfaceProvider};
use crate::rasterizer::{render_mesh, Camera, Framebuffer, Viewport};

/// Where an instance is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Building,
    Running,
    TornDown,
    /// Mount failed; this instance stays dark
    Failed,
}

/// Outcome of one [`ScoreCity::frame`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// A frame was rendered and presented
    Rendered,
    /// Nothing is mounted; the call had no effect
    Idle,
    /// The render loop stopped after a failed frame
    Halted,
}

/// Everything that exists only while mounted
struct Mounted<S> {
    surface: S,
    framebuffer: Framebuffer,
    skyline: Skyline,
    indicator: Indicator,
    rig: CameraRig,
    band_labels: Vec<LabelAnchor>,
    readout: LabelAnchor,
    /// Cleared when a frame fails; the loop does not run again
    scheduled: bool,
}

impl<S: RenderSurface> Mounted<S> {
    /// Re-project every label through the current camera
    fn place_labels<O: OverlaySink>(&mut self, overlay: &mut O) {
        let camera = &self.rig.camera;
        let viewport = self.framebuffer.viewport();
        for anchor in &mut self.band_labels {
            anchor.reproject(camera, viewport, overlay);
        }
        self.readout.point = self.indicator.readout_anchor();
        self.readout.reproject(camera, viewport, overlay);
    }

    /// Draw the scene and hand it to the surface
    fn render(&mut self) -> Result<usize, SurfaceError> {
        let camera = &self.rig.camera;
        let fb = &mut self.framebuffer;

        let mut drawn = self.skyline.draw_opaque(fb, camera);
        drawn += self.skyline.draw_translucent(fb, camera);
        for mesh in self.indicator.meshes() {
            drawn += render_mesh(fb, &mesh, camera, &self.skyline.lighting);
        }

        self.surface.present(fb)?;
        Ok(drawn)
    }

    fn release<O: OverlaySink>(self, overlay: &mut O) {
        for anchor in self.band_labels.iter().chain(std::iter::once(&self.readout)) {
            overlay.detach(anchor.id);
        }
        // Surface and framebuffer drop here
    }
}

/// Handle to the credit score city scene
///
/// The scene owns its overlay layer and, while mounted, its surface. All
/// methods run on the caller's thread; nothing is scheduled behind its back.
pub struct ScoreCity<S: RenderSurface, O: OverlaySink> {
    config: CityConfig,
    overlay: O,
    lifecycle: Lifecycle,
    /// Latest score from the host, applied at the start of the next frame
    requested: Score,
    scene: Option<Mounted<S>>,
    frames: u64,
    frame_error_reported: bool,
}

impl<S: RenderSurface, O: OverlaySink> ScoreCity<S, O> {
    pub fn new(config: CityConfig, overlay: O) -> Self {
        Self {
            requested: config.initial_score,
            config,
            overlay,
            lifecycle: Lifecycle::Uninitialized,
            scene: None,
            frames: 0,
            frame_error_reported: false,
        }
    }

    /// Build the scene and start the render loop.
    ///
    /// Remounting a running scene tears the old one down first. If the
    /// surface can't be acquired the instance moves to [`Lifecycle::Failed`]
    /// and nothing is allocated.
    pub fn mount<P, R>(&mut self, provider: &mut P, viewport: Viewport, rng: &mut R) -> Result<(), CityError>
    where
        P: SurfaceProvider<Surface = S>,
        R: Rng + ?Sized,
    {
        match self.lifecycle {
            Lifecycle::Failed => return Err(CityError::Failed),
            Lifecycle::Running => {
                tracing::debug!("remounting score city");
                self.unmount();
            }
            _ => {}
        }
        self.lifecycle = Lifecycle::Building;

        let surface = match check_viewport(viewport).and_then(|()| provider.acquire(viewport)) {
            Ok(surface) => surface,
            Err(err) => {
                self.lifecycle = Lifecycle::Failed;
                tracing::error!(error = %err, "score city initialization failed");
                return Err(CityError::Initialization(err));
            }
        };

        let per_band = self.config.buildings_per_band;
        let skyline = match self.config.seed {
            Some(seed) => Skyline::build(&mut StdRng::seed_from_u64(seed), per_band),
            None => Skyline::build(rng, per_band),
        };

        let indicator = Indicator::new(self.requested, Motion::from(&self.config));
        let rig = CameraRig::new(self.config.fov, viewport.aspect());

        let band_labels: Vec<LabelAnchor> = BANDS
            .iter()
            .map(|band| {
                let id = self.overlay.attach(LabelKind::BandRange, &band.range_label());
                LabelAnchor::new(id, band_label_anchor(band))
            })
            .collect();
        let readout_id = self.overlay.attach(LabelKind::Readout, &self.requested.readout());
        let readout = LabelAnchor::new(readout_id, indicator.readout_anchor());

        let mut scene = Mounted {
            surface,
            framebuffer: Framebuffer::new(viewport.width, viewport.height),
            skyline,
            indicator,
            rig,
            band_labels,
            readout,
            scheduled: true,
        };
        scene.place_labels(&mut self.overlay);

        tracing::info!(
            score = self.requested.value(),
            width = viewport.width,
            height = viewport.height,
            buildings = scene.skyline.building_count(),
            "score city mounted"
        );

        self.scene = Some(scene);
        self.frame_error_reported = false;
        self.lifecycle = Lifecycle::Running;
        Ok(())
    }

    /// Host-requested rebuild.
    ///
    /// A live or torn-down scene is remounted in place. A failed instance is
    /// reset to a fresh, unmounted one first (it holds no labels or
    /// surface), so this is the only way back from [`Lifecycle::Failed`].
    pub fn rebuild<P, R>(&mut self, provider: &mut P, viewport: Viewport, rng: &mut R) -> Result<(), CityError>
    where
        P: SurfaceProvider<Surface = S>,
        R: Rng + ?Sized,
    {
        if self.lifecycle == Lifecycle::Failed {
            tracing::debug!("rebuilding failed score city");
            self.lifecycle = Lifecycle::Uninitialized;
            self.frame_error_reported = false;
        }
        self.mount(provider, viewport, rng)
    }

    /// Cancel the render loop and release every label and the surface.
    /// No frame runs after this returns.
    pub fn unmount(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.release(&mut self.overlay);
            self.lifecycle = Lifecycle::TornDown;
            tracing::info!(frames = self.frames, "score city torn down");
        }
    }

    /// Record a new score; the marker picks it up on the next frame
    pub fn set_score(&mut self, value: i32) -> Score {
        self.requested = Score::new(value);
        self.requested
    }

    /// Move to a band's preset score
    pub fn jump_to_score(&mut self, band: BandId) -> Score {
        self.set_score(band.preset().value() as i32)
    }

    /// [`jump_to_score`](Self::jump_to_score) by band label, e.g. "Very Good"
    pub fn jump_to_label(&mut self, label: &str) -> Result<Score, UnknownBand> {
        let band: BandId = label.parse()?;
        Ok(self.jump_to_score(band))
    }

    /// Switch the camera. `FollowScore` snapshots the marker's current x.
    pub fn set_view(&mut self, mode: CameraMode) -> Result<(), CityError> {
        let scene = self.scene.as_mut().ok_or(CityError::NotRunning)?;
        let x = scene.indicator.current_position();
        scene.rig.set_view(mode, x);
        tracing::debug!(view = %mode, x, "camera view switched");
        Ok(())
    }

    /// Follow a host size change: new aspect, framebuffer and surface size,
    /// then redraw without rebuilding the scene.
    ///
    /// A surface failure skips the resize and leaves the scene running. A
    /// halted scene keeps its last frame and the projection it was drawn
    /// with, so the labels stay on it.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), CityError> {
        let scene = self.scene.as_mut().ok_or(CityError::NotRunning)?;
        if !scene.scheduled {
            tracing::debug!(width = viewport.width, height = viewport.height, "render loop halted, resize ignored");
            return Ok(());
        }

        if let Err(err) = check_viewport(viewport).and_then(|()| scene.surface.resize(viewport)) {
            tracing::warn!(error = %err, width = viewport.width, height = viewport.height, "resize skipped");
            return Err(CityError::Resize(err));
        }

        scene.rig.set_aspect(viewport.aspect());
        scene.framebuffer.resize(viewport.width, viewport.height);

        scene.place_labels(&mut self.overlay);
        if let Err(err) = scene.render() {
            return self.halt(err).map(|_| ());
        }
        Ok(())
    }

    /// One render loop step.
    ///
    /// Applies a pending score, advances the marker, re-projects the labels
    /// with this frame's camera, then renders and presents. Returns
    /// [`FrameStatus::Idle`] when nothing is mounted.
    pub fn frame(&mut self, time: f64) -> Result<FrameStatus, CityError> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(FrameStatus::Idle);
        };
        if !scene.scheduled {
            return Ok(FrameStatus::Halted);
        }

        if self.requested != scene.indicator.score() {
            scene.indicator.set_score(self.requested);
            self.overlay.set_text(scene.readout.id, &self.requested.readout());
        }

        scene.indicator.step_position();
        scene.indicator.step_float(time);
        scene.indicator.step_ring();

        scene.place_labels(&mut self.overlay);

        match scene.render() {
            Ok(_) => {
                self.frames += 1;
                Ok(FrameStatus::Rendered)
            }
            Err(err) => self.halt(err),
        }
    }

    /// Stop the loop after a failed present; report only the first failure
    fn halt(&mut self, err: SurfaceError) -> Result<FrameStatus, CityError> {
        if let Some(scene) = self.scene.as_mut() {
            scene.scheduled = false;
        }
        if self.frame_error_reported {
            return Ok(FrameStatus::Halted);
        }
        self.frame_error_reported = true;
        tracing::error!(error = %err, frames = self.frames, "frame render failed, render loop halted");
        Err(CityError::Frame(err))
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Latest score set by the host
    pub fn score(&self) -> Score {
        self.requested
    }

    pub fn band(&self) -> &'static ScoreBand {
        self.requested.band()
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn indicator(&self) -> Option<&Indicator> {
        self.scene.as_ref().map(|s| &s.indicator)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.scene.as_ref().map(|s| &s.rig.camera)
    }

    pub fn view(&self) -> Option<CameraMode> {
        self.scene.as_ref().map(|s| s.rig.mode())
    }

    pub fn surface(&self) -> Option<&S> {
        self.scene.as_ref().map(|s| &s.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut().map(|s| &mut s.surface)
    }

    /// Render target size, which label positions are relative to
    pub fn viewport(&self) -> Option<Viewport> {
        self.scene.as_ref().map(|s| s.framebuffer.viewport())
    }

    /// Frames rendered across all mounts
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl<S: RenderSurface, O: OverlaySink> Drop for ScoreCity<S, O> {
    fn drop(&mut self) {
        self.unmount();
    }
}
