//! `lumel` CLI: bakes a TOML-described scene into lightmap atlas layers.

mod export;
mod scene_file;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};

use lumel_bake::{BakeQuality, BakedLightmap, CancelToken, LightmapBaker};
use scene_file::SceneFile;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QualityArg {
    Low,
    Medium,
    High,
    Ultra,
}

impl From<QualityArg> for BakeQuality {
    fn from(q: QualityArg) -> Self {
        match q {
            QualityArg::Low => BakeQuality::Low,
            QualityArg::Medium => BakeQuality::Medium,
            QualityArg::High => BakeQuality::High,
            QualityArg::Ultra => BakeQuality::Ultra,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lumel", about = "Offline CPU lightmap baker", version)]
struct Cli {
    /// Scene description (TOML).
    scene: PathBuf,

    /// Output directory for atlas layers and the placement manifest.
    #[arg(short, long, default_value = "bake_out")]
    out: PathBuf,

    /// Override the scene's quality preset.
    #[arg(long, value_enum)]
    quality: Option<QualityArg>,

    /// Override the scene's indirect bounce count.
    #[arg(long)]
    bounces: Option<u32>,

    /// Override the atlas size (texels per edge).
    #[arg(long)]
    atlas_size: Option<u32>,

    /// Unwrap surfaces that have no UV2 channel.
    #[arg(long)]
    auto_unwrap: bool,

    /// Disable shadow rays.
    #[arg(long)]
    no_shadows: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("bake failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(&cli.scene)?;
    let scene: SceneFile = toml::from_str(&text)?;

    let mut settings = scene.bake.clone();
    if let Some(q) = cli.quality {
        settings.quality = q.into();
    }
    if let Some(b) = cli.bounces {
        settings.bounces = b;
    }
    if let Some(s) = cli.atlas_size {
        settings.atlas_size_override = s;
    }
    if cli.auto_unwrap {
        settings.auto_unwrap_uv2 = true;
    }
    if cli.no_shadows {
        settings.use_shadowing = false;
    }

    let root = scene.build_scene();
    let baker = LightmapBaker::new(settings);
    let mut baked = BakedLightmap::new();

    // One log line per phase; the rasterize fan-out reports per mesh but
    // only label changes are worth surfacing.
    let last_label: Mutex<String> = Mutex::new(String::new());
    let progress = move |fraction: f32, label: &str| {
        let mut last = last_label.lock().expect("progress label lock");
        if *last != label {
            log::info!("[{:>3.0}%] {label}", fraction * 100.0);
            *last = label.to_string();
        }
    };

    baker.bake_with_progress(Some(&root), &mut baked, Some(&progress), CancelToken::new())?;

    log::info!(
        "baked {} surfaces into {} atlas layer(s)",
        baked.users().len(),
        baked.layers().len()
    );
    export::write_outputs(&cli.out, &baked)?;
    Ok(())
}
