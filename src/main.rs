// Entry point: launches the egui/eframe app and the tick worker.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tonnetz_lens::app::App;
use tonnetz_lens::cli::Args;
use tonnetz_lens::config::AppConfig;
use tonnetz_lens::midi;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.list_ports {
        match midi::list_ports() {
            Ok(ports) if ports.is_empty() => println!("No MIDI input ports."),
            Ok(ports) => {
                for name in ports {
                    println!("{name}");
                }
            }
            Err(err) => eprintln!("Failed to list MIDI ports: {err}"),
        }
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&args.config);
    if args.port.is_some() {
        config.midi.port = args.port.clone();
    }
    if let Some(range) = args.bend_range {
        config.midi.bend_range_semis = range;
    }
    info!(config = ?config, "starting");

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([870.0, 960.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tonnetz Lens",
        native_options,
        Box::new(|cc| Ok(Box::new(App::new(cc, config, stop_flag.clone())))),
    )
}
