use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use crossbeam::channel::{unbounded, Receiver, Sender};
use eframe::{App, CreationContext, Frame};
use egui::{CentralPanel, CollapsingHeader, ComboBox, Context, Key, ScrollArea, SidePanel, Ui};
use egui_linkgraph::{
    events::Event, risk_color, AnimationDriver, Dataset, EntityKind, ExportError, ExportedFrame,
    Filter, GraphView, RiskLevel, Settings,
};

const EVENTS_LIMIT: usize = 20;

pub struct LinkGraphApp {
    driver: AnimationDriver,
    filter: Filter,
    search: String,
    export_path: PathBuf,
    status: Option<String>,

    last_events: Vec<String>,
    event_publisher: Sender<Event>,
    event_consumer: Receiver<Event>,
}

impl LinkGraphApp {
    pub fn new(
        _: &CreationContext<'_>,
        dataset: Dataset,
        settings: Settings,
        export_path: PathBuf,
    ) -> Self {
        let (event_publisher, event_consumer) = unbounded();
        let driver = AnimationDriver::new(dataset, settings);
        Self {
            filter: driver.filter().clone(),
            driver,
            search: String::new(),
            export_path,
            status: None,
            last_events: Vec::new(),
            event_publisher,
            event_consumer,
        }
    }

    fn handle_events(&mut self) {
        for e in self.event_consumer.try_iter() {
            let line = serde_json::to_string(&e).unwrap_or_else(|err| format!("{e:?}: {err}"));
            log::debug!("event: {line}");
            self.last_events.push(line);
        }
        let overflow = self.last_events.len().saturating_sub(EVENTS_LIMIT);
        self.last_events.drain(..overflow);
    }

    fn handle_export(&mut self) {
        let Some(frame) = self.driver.take_exported_frame() else {
            return;
        };
        self.status = Some(match write_frame(&frame, &self.export_path) {
            Ok(()) => format!(
                "exported {}x{} to {}",
                frame.width,
                frame.height,
                self.export_path.display()
            ),
            Err(err) => {
                log::error!("export to {} failed: {err}", self.export_path.display());
                format!("export failed: {err}")
            }
        });
    }

    fn handle_keys(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        ctx.input(|i| {
            if i.key_pressed(Key::F) {
                self.driver.fit_to_screen();
            }
            if i.key_pressed(Key::P) {
                let on = !self.driver.controller().is_path_mode();
                self.driver.set_path_mode(on);
            }
            if i.key_pressed(Key::Escape) {
                self.driver.set_path_mode(false);
                self.driver.clear_path();
            }
        });
    }

    fn ui_case(&self, ui: &mut Ui) {
        let summary = self.driver.dataset().summary();
        CollapsingHeader::new("Case").default_open(true).show(ui, |ui| {
            ui.label(format!("entities: {}", summary.total_entities));
            ui.label(format!("links: {}", summary.total_links));
            ui.label(format!("clusters: {}", summary.total_clusters));
            ui.colored_label(
                risk_color(RiskLevel::High),
                format!("high risk: {}", summary.high_risk_count),
            );
            let g = self.driver.graph();
            ui.label(format!("visible: {} / {}", g.node_count(), g.edge_count()));
            for p in self.driver.dataset().patterns() {
                ui.colored_label(risk_color(p.severity), p.description.as_str())
                    .on_hover_text(p.entity_ids.join(", "));
            }
        });
    }

    fn ui_filter(&mut self, ui: &mut Ui) {
        let mut changed = false;
        CollapsingHeader::new("Filter").default_open(true).show(ui, |ui| {
            ui.label("risk");
            ui.horizontal_wrapped(|ui| {
                for r in RiskLevel::ALL {
                    let mut on = self.filter.risk_levels.contains(&r);
                    if ui.checkbox(&mut on, "").changed() {
                        toggle(&mut self.filter.risk_levels, r, on);
                        changed = true;
                    }
                    ui.colored_label(risk_color(r), r.as_str());
                }
            });

            ui.label("kind");
            ui.horizontal_wrapped(|ui| {
                for k in EntityKind::ALL {
                    let mut on = self.filter.kinds.contains(&k);
                    if ui.checkbox(&mut on, k.as_str()).changed() {
                        toggle(&mut self.filter.kinds, k, on);
                        changed = true;
                    }
                }
            });

            let clusters = self.driver.dataset().clusters();
            let selected = self
                .filter
                .cluster_scope
                .and_then(|id| clusters.iter().find(|c| c.id == id))
                .map_or_else(|| "all".to_string(), |c| c.name.clone());
            ComboBox::from_label("cluster scope")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.filter.cluster_scope, None, "all")
                        .changed();
                    for c in clusters {
                        changed |= ui
                            .selectable_value(
                                &mut self.filter.cluster_scope,
                                Some(c.id),
                                c.name.as_str(),
                            )
                            .changed();
                    }
                });

            if ui.button("reset").clicked() {
                self.filter = Filter::default();
                changed = true;
            }
        });
        if changed {
            self.driver.set_filter(self.filter.clone());
        }
    }

    fn ui_search(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Search").default_open(true).show(ui, |ui| {
            if ui.text_edit_singleline(&mut self.search).changed() {
                self.driver.set_search(self.search.clone());
            }
        });
    }

    fn ui_path(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Path").default_open(true).show(ui, |ui| {
            let mut on = self.driver.controller().is_path_mode();
            if ui.checkbox(&mut on, "pick two entities (P)").changed() {
                self.driver.set_path_mode(on);
            }
            let path = self.driver.controller().path();
            if path.is_empty() {
                ui.label("no path");
            } else {
                let labels: Vec<&str> = path
                    .iter()
                    .map(|id| {
                        self.driver
                            .graph()
                            .entity(id)
                            .map_or(id.as_str(), |e| e.label.as_str())
                    })
                    .collect();
                ui.label(format!("{} hops", path.len() - 1));
                ui.label(labels.join(" → "));
            }
            if ui.button("clear (Esc)").clicked() {
                self.driver.clear_path();
            }
        });
    }

    fn ui_layout(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Layout").default_open(true).show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.button("rerun").on_hover_text("continue settling").clicked() {
                    self.driver.rerun_simulation();
                }
                if ui.button("relayout").on_hover_text("discard all positions").clicked() {
                    self.driver.relayout();
                }
                if ui.button("fit (F)").clicked() {
                    self.driver.fit_to_screen();
                }
            });
            let sim = self.driver.simulation();
            ui.label(format!("ticks left: {}", sim.ticks_left()));
            ui.label(format!("steps: {}", sim.step_count()));
            if let Some(d) = sim.last_avg_displacement() {
                ui.label(format!("avg displacement: {d:.3}"));
            }
        });
    }

    fn ui_export(&mut self, ui: &mut Ui) {
        CollapsingHeader::new("Export").show(ui, |ui| {
            ui.label(self.export_path.display().to_string());
            if ui.button("export frame").clicked() {
                self.driver.request_export();
            }
            if let Some(status) = &self.status {
                ui.label(status.as_str());
            }
        });
    }

    fn ui_debug(&self, ui: &mut Ui) {
        CollapsingHeader::new("Debug").show(ui, |ui| {
            let m = self.driver.metrics();
            ui.label(format!("steps this frame: {}", m.steps));
            ui.label(format!("step: {:.2} ms", m.step_ms));
            ui.label(format!("draw: {:.2} ms", m.draw_ms));
            let vp = self.driver.controller().viewport();
            ui.label(format!("zoom: {:.2}", vp.zoom));
            ui.label(format!("pan: [{:.1}, {:.1}]", vp.pan.x, vp.pan.y));
        });
    }

    fn ui_events(&self, ui: &mut Ui) {
        CollapsingHeader::new("Events").show(ui, |ui| {
            for e in self.last_events.iter().rev() {
                ui.monospace(e.as_str());
            }
        });
    }
}

impl App for LinkGraphApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        self.handle_events();
        self.handle_export();
        self.handle_keys(ctx);

        SidePanel::right("controls")
            .default_width(300.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    self.ui_case(ui);
                    self.ui_filter(ui);
                    self.ui_search(ui);
                    self.ui_path(ui);
                    self.ui_layout(ui);
                    self.ui_export(ui);
                    self.ui_debug(ui);
                    self.ui_events(ui);
                });
            });

        CentralPanel::default().show(ctx, |ui| {
            let mut view =
                GraphView::new(&mut self.driver).with_event_sink(&self.event_publisher);
            ui.add(&mut view);
        });
    }
}

fn toggle<T: Ord>(set: &mut std::collections::BTreeSet<T>, value: T, on: bool) {
    if on {
        set.insert(value);
    } else {
        set.remove(&value);
    }
}

fn write_frame(frame: &ExportedFrame, path: &PathBuf) -> Result<(), ExportError> {
    let mut w = BufWriter::new(File::create(path)?);
    frame.write_png(&mut w)?;
    w.flush()?;
    Ok(())
}
