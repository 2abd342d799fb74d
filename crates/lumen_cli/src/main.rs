use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{IntegratorKind, Profile, SceneDescription, ThreadPool};
use lumen_renderer::{Camera, Integrator, Renderer, Scene};

mod demo;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum IntegratorArg {
    Path,
    Normal,
    Bounds,
    Triangles,
}

impl From<IntegratorArg> for IntegratorKind {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Path => IntegratorKind::Path,
            IntegratorArg::Normal => IntegratorKind::Normal,
            IntegratorArg::Bounds => IntegratorKind::Bounds,
            IntegratorArg::Triangles => IntegratorKind::Triangles,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Render a scene with the Lumen path tracer")]
struct CommandLineArguments {
    #[arg(short, long, help = "Scene description (JSON); renders the built-in demo when omitted")]
    scene: Option<PathBuf>,

    #[arg(short, long, default_value = "output.png", help = "Output image, rewritten after every pass")]
    output: PathBuf,

    #[arg(short = 'n', long, help = "Samples per pixel")]
    spp: Option<usize>,

    #[arg(short, long, default_value_t = 0, help = "Worker threads (0 = one per core)")]
    threads: usize,

    #[arg(short, long, value_enum, help = "Estimator used to fill the image")]
    integrator: Option<IntegratorArg>,

    #[arg(long, help = "Image width in pixels")]
    width: Option<usize>,

    #[arg(long, help = "Image height in pixels")]
    height: Option<usize>,

    #[arg(long, help = "Write the demo scene as JSON to this path and exit")]
    dump_demo: Option<PathBuf>,
}

impl CommandLineArguments {
    fn apply_overrides(&self, description: &mut SceneDescription) {
        if let Some(spp) = self.spp {
            description.render.spp = spp;
        }
        if let Some(integrator) = self.integrator {
            description.render.integrator = integrator.into();
        }
        if let Some(width) = self.width {
            description.film.width = width;
        }
        if let Some(height) = self.height {
            description.film.height = height;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CommandLineArguments::parse();

    if let Some(path) = &args.dump_demo {
        let json = serde_json::to_string_pretty(&demo::demo_scene())?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Demo scene written to {}", path.display());
        return Ok(());
    }

    let mut description = match &args.scene {
        Some(path) => SceneDescription::from_json_file(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, rendering the demo scene");
            demo::demo_scene()
        }
    };
    args.apply_overrides(&mut description);

    if description.film.width == 0 || description.film.height == 0 {
        anyhow::bail!(
            "Image size must be positive, got {}x{}",
            description.film.width,
            description.film.height
        );
    }

    let scene = {
        let _profile = Profile::new("Scene build");
        Scene::from_description(&description).context("Failed to build scene")?
    };

    let camera = Camera::from_desc(&description.camera, &description.film);
    let integrator = Integrator::from(description.render.integrator);
    let renderer = Renderer::new(camera, Arc::new(scene), integrator);

    let pool = ThreadPool::new(args.threads);
    renderer.render(&pool, description.render.spp, Some(args.output.as_path()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
