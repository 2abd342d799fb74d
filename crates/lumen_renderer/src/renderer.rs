//! Progressive multi-threaded rendering into a [`Film`].

use std::path::Path;
use std::sync::Arc;

use crate::film::{Film, FilmError};
use crate::sampling::with_thread_rng;
use crate::{Camera, Integrator, Scene};
use lumen_core::{Profile, ProgressBar, ThreadPool};
use thiserror::Error;

/// Upper bound on samples per pixel added in one pass.
const MAX_PASS_SPP: usize = 32;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Film error: {0}")]
    Film(#[from] FilmError),
}

/// Drives an integrator over every pixel of the camera's image.
pub struct Renderer {
    camera: Camera,
    scene: Arc<Scene>,
    integrator: Integrator,
}

impl Renderer {
    pub fn new(camera: Camera, scene: Arc<Scene>, integrator: Integrator) -> Self {
        Self {
            camera,
            scene,
            integrator,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Render `spp` samples per pixel on `pool`.
    ///
    /// Samples are added in passes of 1, 1, 2, 4, ... up to 32 at a time.
    /// When `output` is given, the image is written after every pass so a
    /// long render can be inspected while it runs.
    pub fn render(
        &self,
        pool: &ThreadPool,
        spp: usize,
        output: Option<&Path>,
    ) -> Result<Arc<Film>, RenderError> {
        let _profile = Profile::new("Renderer");
        let film = Arc::new(Film::new(self.camera.width(), self.camera.height()));
        let progress = ProgressBar::new(spp);

        log::info!(
            "Rendering {}x{} at {} spp with {:?} on {} threads",
            film.width(),
            film.height(),
            spp,
            self.integrator,
            pool.thread_count()
        );

        let mut current = 0;
        let mut increase = 1;
        while current < spp {
            let batch = increase.min(spp - current);
            self.render_pass(pool, &film, batch);
            current += batch;
            progress.update(batch);

            if let Some(path) = output {
                film.save(path)?;
                log::info!("{} spp has been saved", current);
            }
            increase = current.min(MAX_PASS_SPP);
        }

        Ok(film)
    }

    /// Add `samples` samples to every pixel and wait for them.
    fn render_pass(&self, pool: &ThreadPool, film: &Arc<Film>, samples: usize) {
        let camera = self.camera.clone();
        let scene = Arc::clone(&self.scene);
        let integrator = self.integrator;
        let target = Arc::clone(film);

        pool.parallel_for(
            film.width(),
            film.height(),
            move |x, y| {
                for _ in 0..samples {
                    let color =
                        with_thread_rng(|rng| integrator.render_sample(&camera, &scene, x, y, rng));
                    target.add_sample(x, y, color);
                }
            },
            true,
        );
        pool.wait();
    }
}
