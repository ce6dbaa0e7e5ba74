use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use ar_gallery::ar::modal::ModalOptions;
use ar_gallery::ar::platform::{native_user_agent, Environment};
use ar_gallery::catalog::Catalog;
use ar_gallery::check::check_catalog;
use ar_gallery::config::GalleryConfig;
use ar_gallery::net::probe::HttpProbe;
use ar_gallery::ArError;

#[cfg(feature = "gui")]
mod app;

/// AR Food Gallery — browse dishes and open them in AR.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog JSON, overriding the `catalog` config entry.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Probe every item and print its AR URLs instead of opening the gallery.
    #[arg(long)]
    check: bool,

    /// User agent used for platform branching (Android / iOS / other).
    #[arg(long)]
    user_agent: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("ar-gallery: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    };
    if let Some(path) = cli.catalog {
        config.catalog = path;
    }

    let catalog = Catalog::load(&config.catalog)?;
    let user_agent = cli
        .user_agent
        .or_else(|| config.user_agent.clone())
        .unwrap_or_else(native_user_agent);
    let env = Environment::new(&config.origin, &user_agent);
    let probe = HttpProbe::new(&config.origin, config.probe_timeout())
        .map_err(|e| ArError::Config(format!("origin: {}", e)))?;

    log::info!("Origin {} as {:?}", env.origin, env.platform());

    if cli.check {
        let reports = check_catalog(&catalog, Arc::new(probe), &env, &ModalOptions::from(&config));
        let missing = reports.iter().filter(|r| !r.reachable).count();
        for report in &reports {
            print!("{}", report);
        }
        println!("{} items, {} missing", reports.len(), missing);
        return Ok(());
    }

    run_gui(config, catalog, env, probe)
}

#[cfg(feature = "gui")]
fn run_gui(
    config: GalleryConfig,
    catalog: Catalog,
    env: Environment,
    probe: HttpProbe,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([960.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AR Food Gallery",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(app::GalleryApp::new(
                &config,
                catalog,
                env,
                Arc::new(probe),
            )))
        }),
    )?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_gui(
    _config: GalleryConfig,
    _catalog: Catalog,
    _env: Environment,
    _probe: HttpProbe,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("built without the `gui` feature; use --check".into())
}
