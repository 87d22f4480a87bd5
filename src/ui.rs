use eframe::egui::plot::{Line, Plot, PlotBounds, PlotPoints};
use eframe::egui::{self, Color32};

use crate::audio_output::TonePlayer;
use crate::curve::{self, Curve};
use crate::notes::NoteTable;
use crate::params::{LissajousParams, ParamField, ParameterStore, Wave};
use crate::settings::Settings;
use crate::tone::{self, ToneBuffer};

const ENTRY_WIDTH: f32 = 80.0;
const NOTE_LIST_HEIGHT: f32 = 160.0;
const PLOT_HEIGHT: f32 = 500.0;

struct FieldEntry {
    field: ParamField,
    text: String,
    error: Option<String>,
}

/// A tone waiting for the refreshed curve to reach the screen before it blocks
/// the UI thread.
struct PendingTone {
    buffer: ToneBuffer,
    frames_left: u8,
}

pub struct LissajousUI {
    store: ParameterStore,
    settings: Settings,
    player: Box<dyn TonePlayer>,
    entries: Vec<FieldEntry>,
    selected_notes: [Option<String>; 2],
    curve: Curve,
    fit_view: bool,
    pending_tone: Option<PendingTone>,
    status: Option<String>,
}

impl LissajousUI {
    pub fn new(settings: Settings, player: Box<dyn TonePlayer>) -> Self {
        let store = ParameterStore::new(
            LissajousParams::default(),
            NoteTable::default(),
            settings.note_behavior,
        );
        log::info!("Loaded {} notes", store.notes().iter().count());
        let params = store.params();
        let entries = ParamField::ALL
            .iter()
            .map(|&field| FieldEntry {
                field,
                text: format_value(params.get(field)),
                error: None,
            })
            .collect();
        let curve = curve::sample(&params, &settings.range);

        Self {
            store,
            settings,
            player,
            entries,
            selected_notes: [None, None],
            curve,
            fit_view: true,
            pending_tone: None,
            status: None,
        }
    }

    pub fn update(&mut self, ctx: &egui::Context) {
        self.poll_pending_tone(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.group(|ui| self.draw_parameters(ui));
                    ui.group(|ui| self.draw_note_lists(ui));
                });
                ui.add_space(10.0);
                self.draw_plot(ui);
                ui.add_space(10.0);
                self.draw_footer(ui, ctx);
            });
        });
    }

    fn draw_parameters(&mut self, ui: &mut egui::Ui) {
        let columns = if self.settings.show_sliders { 4 } else { 3 };
        egui::Grid::new("parameters")
            .num_columns(columns)
            .show(ui, |ui| {
                for index in 0..self.entries.len() {
                    let field = self.entries[index].field;
                    ui.label(field.label());

                    if self.settings.show_sliders {
                        let mut value = self.store.params().get(field);
                        if ui.add(egui::Slider::new(&mut value, field.range())).changed() {
                            self.set_from_slider(field, value);
                        }
                    }

                    let text_edit = egui::TextEdit::singleline(&mut self.entries[index].text)
                        .desired_width(ENTRY_WIDTH);
                    if ui.add(text_edit).changed() {
                        self.apply_entry(index);
                    }

                    match &self.entries[index].error {
                        Some(error) => ui.colored_label(Color32::RED, error.as_str()),
                        None => ui.label(""),
                    };
                    ui.end_row();
                }
            });
    }

    fn draw_note_lists(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            self.draw_note_list(ui, Wave::X, "Note 1");
            self.draw_note_list(ui, Wave::Y, "Note 2");
        });
    }

    fn draw_note_list(&mut self, ui: &mut egui::Ui, wave: Wave, title: &str) {
        let mut picked = None;
        ui.vertical(|ui| {
            ui.label(title);
            egui::ScrollArea::vertical()
                .id_source(title)
                .max_height(NOTE_LIST_HEIGHT)
                .show(ui, |ui| {
                    for note in self.store.notes().iter() {
                        let selected = self.selected_note(wave) == Some(note.name.as_str());
                        if ui.selectable_label(selected, note.name.as_str()).clicked() {
                            picked = Some(note.name.clone());
                        }
                    }
                });
        });
        if let Some(name) = picked {
            self.choose_note(wave, &name);
        }
    }

    fn draw_plot(&mut self, ui: &mut egui::Ui) {
        let points_empty = self.curve.is_empty();
        let points = PlotPoints::new(self.curve.points());
        let fit = if std::mem::take(&mut self.fit_view) {
            self.curve.bounds()
        } else {
            None
        };

        Plot::new("lissajous_plot")
            .height(PLOT_HEIGHT)
            .view_aspect(1.0)
            .show(ui, |plot_ui| {
                if let Some(bounds) = fit {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(bounds.min, bounds.max));
                }
                if !points_empty {
                    plot_ui.line(Line::new(points));
                }
            });
    }

    fn draw_footer(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let playing = self.pending_tone.is_some();
            if ui
                .add_enabled(!playing, egui::Button::new("Refresh Image"))
                .clicked()
            {
                self.refresh();
                ctx.request_repaint();
            }
            if playing {
                ui.label("Playing...");
            }
            if let Some(status) = &self.status {
                ui.colored_label(Color32::RED, status.as_str());
            }
        });
    }

    fn selected_note(&self, wave: Wave) -> Option<&str> {
        self.selected_notes[wave_index(wave)].as_deref()
    }

    fn apply_entry(&mut self, index: usize) {
        let entry = &mut self.entries[index];
        match self.store.set_from_text(entry.field, &entry.text) {
            Ok(_) => entry.error = None,
            Err(err) => {
                log::debug!("Rejected {} entry: {}", entry.field.label(), err);
                entry.error = Some(err.to_string());
            }
        }
    }

    fn set_from_slider(&mut self, field: ParamField, value: f64) {
        if self.store.set(field, value).is_ok() {
            self.sync_entry(field);
        }
    }

    fn sync_entry(&mut self, field: ParamField) {
        let value = self.store.params().get(field);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.field == field) {
            entry.text = format_value(value);
            entry.error = None;
        }
    }

    pub fn choose_note(&mut self, wave: Wave, name: &str) {
        let before = self.store.params();
        match self.store.select_note(wave, name) {
            Ok(_) => {
                self.selected_notes[wave_index(wave)] = Some(name.to_string());
                let after = self.store.params();
                for field in ParamField::ALL {
                    if before.get(field) != after.get(field) || field == frequency_field(wave) {
                        self.sync_entry(field);
                    }
                }
            }
            Err(err) => {
                log::warn!("{}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    /// Re-sample the curve and queue the tone pair for playback.
    pub fn refresh(&mut self) {
        let params = self.store.params();
        log::info!(
            "Refreshing: A={} B={} a={} b={} delta={}",
            params.amplitude_x,
            params.amplitude_y,
            params.frequency_x,
            params.frequency_y,
            params.phase
        );

        self.curve = curve::sample(&params, &self.settings.range);
        self.fit_view = true;
        log::debug!("Sampled {} points", self.curve.len());

        let buffer = tone::synthesize(params.frequency_x, params.frequency_y, &self.settings.tone);
        self.pending_tone = Some(PendingTone {
            buffer,
            frames_left: 1,
        });
    }

    fn poll_pending_tone(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_tone.as_mut() else {
            return;
        };
        if pending.frames_left > 0 {
            pending.frames_left -= 1;
            ctx.request_repaint();
        } else {
            self.flush_playback();
        }
    }

    /// Play any queued tone now. Blocks until playback finishes.
    pub fn flush_playback(&mut self) {
        let Some(pending) = self.pending_tone.take() else {
            return;
        };
        match self.player.play(&pending.buffer) {
            Ok(()) => self.status = None,
            Err(err) => {
                log::error!("Playback failed: {}", err);
                self.status = Some(format!("Audio unavailable: {}", err));
            }
        }
    }
}

fn frequency_field(wave: Wave) -> ParamField {
    match wave {
        Wave::X => ParamField::FrequencyX,
        Wave::Y => ParamField::FrequencyY,
    }
}

fn wave_index(wave: Wave) -> usize {
    match wave {
        Wave::X => 0,
        Wave::Y => 1,
    }
}

fn format_value(value: f64) -> String {
    format!("{}", value)
}
