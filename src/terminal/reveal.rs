//! Fire-once entrance reveal for elements scrolling into view

use ahash::AHashSet;

/// Visibility rule, mirroring an intersection observer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the element that must be visible
    pub threshold: f32,
    /// Added to the bottom edge of the viewport; negative shrinks it
    pub bottom_margin: f32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: -100.0,
        }
    }
}

impl RevealOptions {
    /// Visible fraction of an element spanning `[top, top + height)` in a
    /// viewport of `viewport_height`, after applying the bottom margin
    pub fn visible_ratio(&self, top: f32, height: f32, viewport_height: f32) -> f32 {
        if height <= 0.0 {
            return 0.0;
        }
        let view_bottom = viewport_height + self.bottom_margin;
        let visible = (top + height).min(view_bottom) - top.max(0.0);
        (visible / height).clamp(0.0, 1.0)
    }

    pub fn is_intersecting(&self, top: f32, height: f32, viewport_height: f32) -> bool {
        let ratio = self.visible_ratio(top, height, viewport_height);
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// One observation delivered for an element
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: String,
    pub intersecting: bool,
}

/// Tracks observed elements and reveals each one at most once
#[derive(Debug, Default)]
pub struct RevealTracker {
    options: RevealOptions,
    observed: AHashSet<String>,
    revealed: AHashSet<String>,
}

impl RevealTracker {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            observed: AHashSet::new(),
            revealed: AHashSet::new(),
        }
    }

    /// Start watching `id`; already revealed elements are not watched again
    pub fn observe(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.revealed.contains(&id) {
            self.observed.insert(id);
        }
    }

    /// Apply observations, returning ids revealed by this batch
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry]) -> Vec<String> {
        let mut newly = Vec::new();
        for entry in entries {
            if entry.intersecting && self.observed.remove(&entry.id) {
                self.revealed.insert(entry.id.clone());
                newly.push(entry.id.clone());
            }
        }
        newly
    }

    /// Compute observations from element geometry and apply them
    pub fn scan<'a>(
        &mut self,
        elements: impl IntoIterator<Item = (&'a str, f32, f32)>,
        viewport_height: f32,
    ) -> Vec<String> {
        let entries: Vec<IntersectionEntry> = elements
            .into_iter()
            .filter(|(id, _, _)| self.observed.contains(*id))
            .map(|(id, top, height)| IntersectionEntry {
                id: id.to_string(),
                intersecting: self.options.is_intersecting(top, height, viewport_height),
            })
            .collect();
        self.on_intersections(&entries)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn is_observed(&self, id: &str) -> bool {
        self.observed.contains(id)
    }

    /// Forget everything, e.g. when the observed elements are replaced
    pub fn reset(&mut self) {
        self.observed.clear();
        self.revealed.clear();
    }
}
