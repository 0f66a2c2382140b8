use std::sync::Arc;

use crate::device::{GraphicsDevice, Present, ViewRect};
use crate::math::{translate, view_projection};
use crate::scene::SharedScene;
use crate::time::{FrameClock, FrameStats};
use crate::Result;

use super::{LoadedScene, RenderSettings};

/// Frames between two frame-rate log lines.
const STATS_INTERVAL: u64 = 600;

/// Owns every GPU object of the session and draws one frame per display
/// refresh. Runs on its own thread.
///
/// Reads the camera, the window size and both flags; only ever clears the
/// resize flag.
pub struct RenderActor {
    scene: Arc<SharedScene>,
    settings: RenderSettings,
}

impl RenderActor {
    pub fn new(scene: Arc<SharedScene>, settings: RenderSettings) -> Self {
        Self { scene, settings }
    }

    /// Loads the scene, then renders until stop is requested.
    ///
    /// Setup errors are returned before the first frame. GPU objects are
    /// released when this returns.
    pub fn run<D>(&self, device: &D) -> Result<()>
    where
        D: GraphicsDevice + Present + ?Sized,
    {
        log::info!("render actor started");

        let loaded = LoadedScene::load(device, &self.settings).inspect_err(|e| {
            log::error!("render setup failed: {e}");
        })?;
        self.run_loop(device, &loaded)?;

        log::info!("render actor exited");
        Ok(())
    }

    /// Draws frames with already loaded objects until stop is requested.
    pub fn run_loop<D>(&self, device: &D, loaded: &LoadedScene<'_, D>) -> Result<()>
    where
        D: GraphicsDevice + Present + ?Sized,
    {
        let mut clock = FrameClock::new();
        let mut stats = FrameStats::new(STATS_INTERVAL);

        while !self.scene.stop_requested() {
            self.render_frame(device, loaded)?;

            // Frame pacing: present blocks on the display, finish on the GPU.
            device.finish();

            if let Some(report) = stats.record(clock.tick()) {
                log::debug!(
                    "{} frames, {:.1} fps (avg {:.2} ms)",
                    report.frames,
                    report.fps(),
                    report.mean_frame_ms()
                );
            }
        }
        Ok(())
    }

    /// Draws and presents one frame.
    pub fn render_frame<D>(&self, device: &D, loaded: &LoadedScene<'_, D>) -> Result<()>
    where
        D: GraphicsDevice + Present + ?Sized,
    {
        let camera = self.scene.camera();
        let resized = self.scene.take_resize();
        let size = self.scene.window_size();

        let vp = view_projection(&camera, self.scene.field_of_view(), size.aspect());

        if resized {
            let rect = ViewRect::full(size.width, size.height);
            device.resize(size.width, size.height);
            device.set_viewport(rect);
            device.set_scissor(rect);
            log::debug!("viewport set to {}x{}", size.width, size.height);
        }

        device.clear(self.settings.clear_color);

        // The skybox surrounds the camera and never occludes anything.
        device.set_depth_write(false);
        loaded.skybox_program.bind();
        loaded.skybox_texture.bind();
        loaded
            .skybox_program
            .set_mat4(loaded.skybox_mvp, &(vp * translate(camera.position)));
        loaded.skybox_mesh.draw();
        device.set_depth_write(true);

        loaded.object_program.bind();
        for placement in &loaded.placements {
            if let Some(texture) = loaded.textures.get(placement.texture) {
                texture.bind();
            }
            loaded
                .object_program
                .set_mat4(loaded.object_mvp, &(vp * placement.model));
            loaded.sphere.draw();
        }

        device.present()
    }
}
