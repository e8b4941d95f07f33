//! eframe app: owns the shared aggregator, the MIDI connection, and the
//! 60 Hz tick worker that steps the decay engine and re-aggregates tiles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{info, trace, warn};

use crate::config::AppConfig;
use crate::core::lattice::Lattice;
use crate::core::pitch_state::{Aggregator, TICK_HZ};
use crate::midi;
use crate::ui::viewdata::UiFrame;

pub struct App {
    ui_frame_rx: Receiver<UiFrame>,
    last_frame: UiFrame,
    // Dropping the connection closes the MIDI input.
    _note_source: Option<midi::NoteSource>,
    worker_handle: Option<thread::JoinHandle<()>>,
    exiting: Arc<AtomicBool>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, stop_flag: Arc<AtomicBool>) -> Self {
        let (ui_frame_tx, ui_frame_rx) = bounded::<UiFrame>(8);

        let shared = Arc::new(Mutex::new(Aggregator::new()));
        let lattice = Lattice::new(config.tuning.tuning_info(), config.lattice.lattice_params());

        let note_source = match midi::connect(
            config.midi.port.as_deref(),
            config.midi.bend_range_semis,
            shared.clone(),
        ) {
            Ok(source) => Some(source),
            Err(err) => {
                warn!(%err, "MIDI input unavailable; showing an idle lattice");
                None
            }
        };
        let port_name = note_source.as_ref().map(|s| s.port_name.clone());

        let stop_flag_worker = stop_flag.clone();
        let worker_handle = Some(
            thread::Builder::new()
                .name("tick".into())
                .spawn(move || {
                    tick_loop(ui_frame_tx, shared, lattice, port_name, stop_flag_worker)
                })
                .expect("spawn tick worker"),
        );

        cc.egui_ctx.set_pixels_per_point(1.25);

        Self {
            ui_frame_rx,
            last_frame: UiFrame::empty(),
            _note_source: note_source,
            worker_handle,
            exiting: stop_flag,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.exiting.load(Ordering::SeqCst) {
            info!("stop requested: closing window");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Pull newest frame (drain to latest).
        while let Ok(f) = self.ui_frame_rx.try_recv() {
            self.last_frame = f;
        }
        crate::ui::windows::main_window(ctx, &self.last_frame);
        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.exiting.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Fixed-rate decay loop. Each pass holds the aggregator lock for one
/// logical update (tick + snapshot), then aggregates tiles outside the lock
/// from the read-only snapshot.
fn tick_loop(
    ui_tx: Sender<UiFrame>,
    shared: Arc<Mutex<Aggregator>>,
    mut lattice: Lattice,
    midi_port: Option<String>,
    exiting: Arc<AtomicBool>,
) {
    let tick_duration = Duration::from_secs_f64(1.0 / TICK_HZ);
    let mut next_deadline = Instant::now();
    let mut tick: u64 = 0;

    loop {
        if exiting.load(Ordering::SeqCst) {
            info!("stopping tick worker");
            break;
        }

        next_deadline += tick_duration;

        let (snapshot, held_count) = {
            let mut agg = shared.lock().unwrap_or_else(|e| e.into_inner());
            agg.tick();
            (agg.snapshot(), agg.held_count())
        };

        lattice.update(&snapshot);
        tick += 1;

        let frame = UiFrame::from_lattice(&lattice, held_count, tick, midi_port.clone());
        let _ = ui_tx.try_send(frame);

        let now = Instant::now();
        if now < next_deadline {
            thread::sleep(next_deadline - now);
        } else {
            next_deadline = now;
            trace!("tick overrun");
        }
    }
}
