use crate::{graph::VisibleGraph, layouts::LayoutSnapshot};

use super::{core::step, ForceSettings};

/// Force simulation with a tick budget.
///
/// Every seed or explicit re-run grants `tick_budget` ticks; once they are spent the
/// simulation rests and [`ForceSimulation::tick`] stops producing snapshots.
#[derive(Debug, Clone, Default)]
pub struct ForceSimulation {
    settings: ForceSettings,
    ticks_left: u32,
    step_count: u64,
    last_avg_displacement: Option<f32>,
}

impl ForceSimulation {
    pub fn new(settings: ForceSettings) -> Self {
        Self {
            ticks_left: settings.tick_budget,
            settings,
            step_count: 0,
            last_avg_displacement: None,
        }
    }

    pub fn settings(&self) -> &ForceSettings {
        &self.settings
    }

    /// Replaces the settings. The remaining budget is kept unless it exceeds the new budget.
    pub fn set_settings(&mut self, settings: ForceSettings) {
        self.ticks_left = self.ticks_left.min(settings.tick_budget);
        self.settings = settings;
    }

    /// Grants a fresh tick budget.
    pub fn restart(&mut self) {
        self.ticks_left = self.settings.tick_budget;
        log::debug!("force simulation restarted with {} ticks", self.ticks_left);
    }

    pub fn is_resting(&self) -> bool {
        !self.settings.is_running || self.ticks_left == 0
    }

    pub fn ticks_left(&self) -> u32 {
        self.ticks_left
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_avg_displacement(&self) -> Option<f32> {
        self.last_avg_displacement
    }

    /// Runs one tick and returns the new snapshot, or `None` when resting or when there is
    /// nothing to lay out.
    pub fn tick(
        &mut self,
        prev: &LayoutSnapshot,
        g: &VisibleGraph,
        pinned: Option<&str>,
    ) -> Option<LayoutSnapshot> {
        if self.is_resting() || g.is_empty() || prev.is_empty() {
            return None;
        }

        let next = step(prev, g, &self.settings, self.settings.canvas_rect(), pinned);
        self.last_avg_displacement = next.average_displacement(prev);
        self.ticks_left -= 1;
        self.step_count += 1;
        if self.ticks_left == 0 {
            log::debug!(
                "force simulation at rest after {} steps, last displacement {:?}",
                self.step_count,
                self.last_avg_displacement
            );
        }
        Some(next)
    }
}
