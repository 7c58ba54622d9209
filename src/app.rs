use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::api::Backend;
use crate::state::AppState;
use crate::ui::{panels, plot};
use crate::worker::{BackgroundWorker, WorkerRequest};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectraStudioApp {
    pub state: AppState,
    worker: BackgroundWorker,
}

impl SpectraStudioApp {
    pub fn new(backend: Arc<dyn Backend>, confirm_plots: bool) -> Self {
        let state = AppState {
            confirm_plots,
            ..AppState::default()
        };
        Self {
            state,
            worker: BackgroundWorker::spawn(backend),
        }
    }

    fn dispatch(&self, request: Option<WorkerRequest>) {
        if let Some(request) = request {
            self.worker.request(request);
        }
    }

    fn drain_worker(&mut self) {
        while let Some(result) = self.worker.poll() {
            let follow_up = self.state.handle(result);
            self.dispatch(follow_up);
        }
    }
}

impl eframe::App for SpectraStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker();

        // ---- Top panel: menu bar + actions ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;

        let request = match action {
            Some(panels::Action::Upload) => self.state.start_upload(),
            Some(panels::Action::Process) => self.state.start_process(),
            None => None,
        };
        self.dispatch(request);

        // ---- Left side panel: files + processing options ----
        egui::SidePanel::left("options_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrum_plot(ui, &self.state);
        });

        panels::notice_window(ctx, &mut self.state);

        // Keep polling while replies are outstanding.
        if self.state.pending > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
