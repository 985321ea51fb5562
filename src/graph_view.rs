use egui::{
    FontId, Id, Modifiers, Pos2, Rect, Response, Sense, Ui, UserData, Vec2, ViewportCommand,
    Widget,
};

use crate::{
    draw::{risk_color, DrawItem},
    driver::{AnimationDriver, HoverDetails},
    events::EventSink,
    export::ExportedFrame,
};

/// Widget for visualizing and interacting with a case network.
///
/// It implements [`egui::Widget`] and can be used like any other widget. All state lives in the
/// [`AnimationDriver`] it borrows: the widget only translates egui input into driver calls,
/// advances one frame and paints the result inside its rectangle.
///
/// Events produced by the interaction are forwarded to the [`EventSink`] set with
/// [`GraphView::with_event_sink`]. Without a sink they can still be collected with
/// [`AnimationDriver::drain_events`].
pub struct GraphView<'a> {
    driver: &'a mut AnimationDriver,
    events_sink: Option<&'a dyn EventSink>,
}

/// Raw pointer state sampled once per frame.
struct PointerInput {
    pos: Option<Pos2>,
    moved: bool,
    pressed: bool,
    released: bool,
    modifiers: Modifiers,
    scroll: f32,
}

impl Widget for &mut GraphView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = resp.rect;

        self.handle_screenshot(ui, rect);
        self.handle_pointer(ui, resp.id, rect);

        let offset = rect.min.to_vec2();
        for mut item in self.driver.frame(rect.size()) {
            item.translate(offset);
            match item {
                DrawItem::Shape(shape) => {
                    painter.add(shape);
                }
                DrawItem::Text(t) => {
                    painter.text(t.pos, t.anchor, t.text, FontId::proportional(t.size), t.color);
                }
            }
        }

        self.forward_events();

        if self.driver.export_mut().take_request() {
            log::debug!("requesting viewport screenshot for export");
            ui.ctx()
                .send_viewport_cmd(ViewportCommand::Screenshot(UserData::default()));
        }

        if self.driver.needs_repaint() || self.driver.export_mut().is_pending() {
            ui.ctx().request_repaint();
        }

        let driver = &*self.driver;
        if driver.hover_details().is_some() {
            resp.on_hover_ui_at_pointer(|ui| {
                if let Some(details) = driver.hover_details() {
                    hover_ui(ui, details);
                }
            })
        } else {
            resp
        }
    }
}

impl<'a> GraphView<'a> {
    pub fn new(driver: &'a mut AnimationDriver) -> Self {
        Self {
            driver,
            events_sink: None,
        }
    }

    /// Forwards every event of the interaction to `sink` at the end of each frame.
    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.events_sink = Some(sink);
        self
    }

    fn handle_pointer(&mut self, ui: &Ui, id: Id, rect: Rect) {
        let input = ui.input(|i| PointerInput {
            pos: i.pointer.latest_pos(),
            moved: i.pointer.delta() != Vec2::ZERO,
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            modifiers: i.modifiers,
            scroll: i.raw_scroll_delta.y,
        });

        let inside_key = id.with("pointer_inside");
        let was_inside = ui.data(|d| d.get_temp::<bool>(inside_key).unwrap_or_default());
        let local = |p: Pos2| (p - rect.min).to_pos2();

        let Some(pos) = input.pos.filter(|p| rect.contains(*p)) else {
            if input.released {
                self.driver.reset_gesture();
            }
            if was_inside {
                self.driver.pointer_leave();
            }
            ui.data_mut(|d| d.insert_temp(inside_key, false));
            return;
        };
        ui.data_mut(|d| d.insert_temp(inside_key, true));

        let pos = local(pos);
        if input.pressed {
            self.driver.pointer_down(pos);
        }
        if input.moved || !was_inside {
            self.driver.pointer_move(pos);
        }
        if input.released {
            self.driver.pointer_up(pos, input.modifiers);
        }
        if input.scroll != 0. {
            // one zoom step per notch regardless of the platform scroll unit
            self.driver.wheel(input.scroll.signum(), Some(pos));
        }
    }

    fn handle_screenshot(&mut self, ui: &Ui, rect: Rect) {
        if !self.driver.export_mut().is_awaiting() {
            return;
        }
        let image = ui.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        if let Some(image) = image {
            let frame = ExportedFrame::from_screenshot(&image, rect, ui.ctx().pixels_per_point());
            self.driver.export_mut().complete(frame);
        }
    }

    fn forward_events(&mut self) {
        let Some(sink) = self.events_sink else {
            return;
        };
        for e in self.driver.drain_events() {
            sink.send(e);
        }
    }
}

fn hover_ui(ui: &mut Ui, details: HoverDetails<'_>) {
    match details {
        HoverDetails::Entity {
            entity,
            cluster,
            patterns,
        } => {
            ui.strong(entity.label.as_str());
            if !entity.sub_label.is_empty() {
                ui.label(entity.sub_label.as_str());
            }
            ui.label(format!("{} · risk {}", entity.kind, entity.risk_level));
            if let Some(c) = cluster {
                ui.label(format!("cluster: {}", c.name));
            }
            for (k, v) in entity.attributes.iter() {
                ui.label(format!("{k}: {v}"));
            }
            if !patterns.is_empty() {
                ui.separator();
                for p in patterns {
                    ui.colored_label(risk_color(p.severity), p.description.as_str());
                }
            }
        }
        HoverDetails::Link {
            link,
            source,
            target,
        } => {
            let name = |e: Option<&crate::elements::Entity>, id: &str| {
                e.map_or_else(|| id.to_string(), |e| e.label.clone())
            };
            ui.strong(format!(
                "{} → {}",
                name(source, &link.source_id),
                name(target, &link.target_id)
            ));
            ui.label(format!("{} · weight {}", link.kind, link.weight));
            if let (Some(first), Some(last)) = (&link.first_seen, &link.last_seen) {
                ui.label(format!("{first} – {last}"));
            }
            for (k, v) in link.attributes.iter() {
                ui.label(format!("{k}: {v}"));
            }
        }
    }
}
