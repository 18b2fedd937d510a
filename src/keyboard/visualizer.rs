//! Keyboard visualizer state: keybind list, hover panel and key highlighting

use ahash::AHashSet;

use crate::core::error::Result;
use crate::keyboard::keybind::{Keybind, Platform};
use crate::keyboard::layout::{normalize_code, KeyCap};
use crate::keyboard::location::PageLocation;

pub const DEFAULT_HOVER_TITLE: &str = "Hover a key";
pub const DEFAULT_HOVER_DESC: &str = "Hover one of the highlighted keys to see the keybinding";

/// Contents of the info panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub title: String,
    pub desc: String,
}

impl Default for HoverInfo {
    fn default() -> Self {
        Self {
            title: DEFAULT_HOVER_TITLE.to_string(),
            desc: DEFAULT_HOVER_DESC.to_string(),
        }
    }
}

/// An outstanding keybind request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub platform: Platform,
}

impl FetchTicket {
    pub fn path(&self) -> String {
        self.platform.endpoint_path()
    }
}

/// What happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was replaced with this many entries
    Applied(usize),
    /// The request failed; the previous list is kept
    Failed,
    /// A newer request was issued since; the result was dropped
    Stale,
}

/// How a key cap should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Modifier { highlighted: bool },
    /// Part of the keybind under the pointer
    Highlighted,
    /// Referenced by some keybind of the platform
    Active,
    Idle,
}

#[derive(Debug, Default)]
pub struct KeyboardViz {
    platform: Platform,
    keybinds: Vec<Keybind>,
    loading: bool,
    hover_info: HoverInfo,
    highlighted: AHashSet<String>,
    /// Keys referenced by `keybinds`, rebuilt whenever the list is replaced
    active: AHashSet<String>,
    latest_seq: u64,
}

impl KeyboardViz {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            keybinds: Vec::new(),
            loading: false,
            hover_info: HoverInfo::default(),
            highlighted: AHashSet::new(),
            active: AHashSet::new(),
            latest_seq: 0,
        }
    }

    /// Visualizer for the platform named in the page's query string
    pub fn from_location(location: &PageLocation, default: Platform) -> Self {
        Self::new(location.platform(default))
    }

    /// Issue a request for the current platform
    ///
    /// Every earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.loading = true;
        let ticket = FetchTicket {
            seq: self.latest_seq,
            platform: self.platform,
        };
        tracing::debug!(seq = ticket.seq, path = %ticket.path(), "Fetching keybinds");
        ticket
    }

    /// Apply the result of a request issued by [`begin_fetch`](Self::begin_fetch)
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Keybind>>,
    ) -> FetchOutcome {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                platform = %ticket.platform,
                "Dropping stale keybind response"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(keybinds) => {
                let count = keybinds.len();
                self.active = keybinds
                    .iter()
                    .flat_map(|kb| kb.referenced_keys())
                    .collect();
                self.keybinds = keybinds;
                tracing::info!(platform = %ticket.platform, count, "Keybinds loaded");
                FetchOutcome::Applied(count)
            }
            Err(e) => {
                tracing::warn!(platform = %ticket.platform, error = %e, "Keybind fetch failed");
                FetchOutcome::Failed
            }
        }
    }

    /// Select a platform, record it in the URL, and request its keybinds
    pub fn switch_platform(
        &mut self,
        platform: Platform,
        location: &mut PageLocation,
    ) -> FetchTicket {
        self.platform = platform;
        location.push_query(&[("platform", platform.as_str())]);
        self.begin_fetch()
    }

    /// Keybinds bucketed by category, in order of first appearance
    pub fn grouped_keybinds(&self) -> Vec<(&str, Vec<&Keybind>)> {
        let mut groups: Vec<(&str, Vec<&Keybind>)> = Vec::new();
        for kb in &self.keybinds {
            match groups.iter_mut().find(|(category, _)| *category == kb.category) {
                Some((_, entries)) => entries.push(kb),
                None => groups.push((kb.category.as_str(), vec![kb])),
            }
        }
        groups
    }

    /// Every key and modifier referenced by any keybind, lowercased
    pub fn active_keys(&self) -> &AHashSet<String> {
        &self.active
    }

    pub fn key_state(&self, key: &KeyCap) -> KeyState {
        let base = normalize_code(key.code);
        let highlighted = self.highlighted.contains(key.code) || self.highlighted.contains(base);
        if key.modifier {
            return KeyState::Modifier { highlighted };
        }
        if highlighted {
            return KeyState::Highlighted;
        }
        if self.active.contains(key.code) || self.active.contains(base) {
            KeyState::Active
        } else {
            KeyState::Idle
        }
    }

    /// Space-separated style classes for a key cap
    pub fn key_classes(&self, key: &KeyCap) -> String {
        let mut classes = vec![key.width.class()];
        match self.key_state(key) {
            KeyState::Modifier { .. } => classes.push("modifier"),
            KeyState::Highlighted | KeyState::Active => classes.push("active"),
            KeyState::Idle => {}
        }
        classes.join(" ")
    }

    /// Keybinds whose key or modifiers involve `key`
    pub fn matching_keybinds(&self, key: &KeyCap) -> Vec<&Keybind> {
        let code = normalize_code(key.code);
        self.keybinds
            .iter()
            .filter(|kb| kb.key.to_lowercase() == code || kb.modifiers.iter().any(|m| m == code))
            .collect()
    }

    /// Pointer entered a key: show every bind it takes part in
    ///
    /// A key no bind references leaves the panel as it was.
    pub fn on_key_hover(&mut self, key: &KeyCap) {
        let matching = self.matching_keybinds(key);
        if matching.is_empty() {
            return;
        }
        let title = matching
            .iter()
            .map(|kb| kb.format())
            .collect::<Vec<_>>()
            .join(", ");
        let desc = matching
            .iter()
            .map(|kb| kb.action.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        let mut highlighted = AHashSet::new();
        for kb in &matching {
            highlighted.insert(kb.key.to_lowercase());
            highlighted.extend(kb.modifiers.iter().cloned());
        }
        self.hover_info = HoverInfo { title, desc };
        self.highlighted = highlighted;
    }

    pub fn on_key_leave(&mut self) {
        self.clear_highlight();
    }

    /// Pointer entered a keybind list entry
    pub fn highlight_keybind(&mut self, kb: &Keybind) {
        let mut highlighted = AHashSet::new();
        highlighted.insert(kb.key.to_lowercase());
        highlighted.extend(kb.modifiers.iter().cloned());
        self.highlighted = highlighted;
        self.hover_info = HoverInfo {
            title: kb.format(),
            desc: kb.action.clone(),
        };
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted.clear();
        self.hover_info = HoverInfo::default();
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn keybinds(&self) -> &[Keybind] {
        &self.keybinds
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn hover_info(&self) -> &HoverInfo {
        &self.hover_info
    }

    pub fn highlighted_keys(&self) -> &AHashSet<String> {
        &self.highlighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DotfolioError;
    use crate::keyboard::layout::find_key;

    fn sample() -> Vec<Keybind> {
        vec![
            Keybind::new("Focus", "h", &["alt"], "Focus west"),
            Keybind::new("Focus", "l", &["alt"], "Focus east"),
            Keybind::new("Move", "h", &["shift", "alt"], "Swap west"),
            Keybind::new("Apps", "Enter", &["cmd"], "Open terminal"),
        ]
    }

    fn loaded() -> KeyboardViz {
        let mut viz = KeyboardViz::new(Platform::Yabai);
        let ticket = viz.begin_fetch();
        viz.complete_fetch(ticket, Ok(sample()));
        viz
    }

    #[test]
    fn test_grouped_preserves_order_and_count() {
        let viz = loaded();
        let groups = viz.grouped_keybinds();
        let names: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["Focus", "Move", "Apps"]);
        let total: usize = groups.iter().map(|(_, e)| e.len()).sum();
        assert_eq!(total, viz.keybinds().len());
    }

    #[test]
    fn test_active_keys_lowercase() {
        let viz = loaded();
        let active = viz.active_keys();
        assert!(active.contains("enter"));
        assert!(active.contains("cmd"));
        assert!(!active.contains("Enter"));
    }

    #[test]
    fn test_active_keys_follow_replaced_list() {
        let mut viz = loaded();
        assert_eq!(viz.key_state(find_key("h").unwrap()), KeyState::Active);

        let ticket = viz.begin_fetch();
        let replacement = vec![Keybind::new("Spaces", "1", &["ctrl"], "Space 1")];
        viz.complete_fetch(ticket, Ok(replacement));
        assert!(viz.active_keys().contains("1"));
        assert!(!viz.active_keys().contains("h"));
        assert_eq!(viz.key_state(find_key("h").unwrap()), KeyState::Idle);
        assert_eq!(viz.key_state(find_key("1").unwrap()), KeyState::Active);

        // A failed request leaves the set alone
        let ticket = viz.begin_fetch();
        viz.complete_fetch(ticket, Err(DotfolioError::UnknownPlatform("x".into())));
        assert!(viz.active_keys().contains("1"));
    }

    #[test]
    fn test_hover_shows_all_matches() {
        let mut viz = loaded();
        viz.on_key_hover(find_key("h").unwrap());
        assert_eq!(viz.hover_info().title, "Alt + H, Shift + Alt + H");
        assert_eq!(viz.hover_info().desc, "Focus west | Swap west");
        let highlighted = viz.highlighted_keys();
        assert!(highlighted.contains("h"));
        assert!(highlighted.contains("alt"));
        assert!(highlighted.contains("shift"));
        assert!(!highlighted.contains("l"));
    }

    #[test]
    fn test_hover_right_variant_matches_modifier() {
        let mut viz = loaded();
        viz.on_key_hover(find_key("cmd-r").unwrap());
        assert_eq!(viz.hover_info().title, "Cmd + ENTER");
        assert_eq!(
            viz.key_state(find_key("cmd-r").unwrap()),
            KeyState::Modifier { highlighted: true }
        );
    }

    #[test]
    fn test_hover_unreferenced_key_keeps_default() {
        let mut viz = loaded();
        viz.on_key_hover(find_key("q").unwrap());
        assert_eq!(viz.hover_info(), &HoverInfo::default());
        assert!(viz.highlighted_keys().is_empty());
    }

    #[test]
    fn test_leave_resets_panel() {
        let mut viz = loaded();
        viz.on_key_hover(find_key("l").unwrap());
        assert_ne!(viz.hover_info(), &HoverInfo::default());
        viz.on_key_leave();
        assert_eq!(viz.hover_info(), &HoverInfo::default());
        assert!(viz.highlighted_keys().is_empty());
    }

    #[test]
    fn test_key_classes() {
        let mut viz = loaded();
        assert_eq!(viz.key_classes(find_key("h").unwrap()), " active");
        assert_eq!(viz.key_classes(find_key("q").unwrap()), "");
        assert_eq!(viz.key_classes(find_key("shift").unwrap()), "w-3 modifier");
        assert_eq!(viz.key_classes(find_key("enter").unwrap()), "w-2 active");

        viz.on_key_hover(find_key("l").unwrap());
        assert_eq!(viz.key_state(find_key("l").unwrap()), KeyState::Highlighted);
        assert_eq!(viz.key_state(find_key("h").unwrap()), KeyState::Active);
    }

    #[test]
    fn test_highlight_keybind_entry() {
        let mut viz = loaded();
        let kb = viz.keybinds()[2].clone();
        viz.highlight_keybind(&kb);
        assert_eq!(viz.hover_info().title, "Shift + Alt + H");
        assert_eq!(viz.hover_info().desc, "Swap west");
        viz.clear_highlight();
        assert_eq!(viz.hover_info(), &HoverInfo::default());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_list() {
        let mut viz = loaded();
        let ticket = viz.begin_fetch();
        assert!(viz.is_loading());
        let outcome = viz.complete_fetch(
            ticket,
            Err(DotfolioError::HttpStatus {
                url: "http://localhost/api/keybinds/yabai".into(),
                status: 404,
            }),
        );
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(!viz.is_loading());
        assert_eq!(viz.keybinds().len(), 4);
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut viz = KeyboardViz::new(Platform::Yabai);
        let mut location = PageLocation::parse("/keyboard");
        let first = viz.switch_platform(Platform::Hyprland, &mut location);
        let second = viz.switch_platform(Platform::Yabai, &mut location);

        let newer = vec![Keybind::new("Spaces", "1", &["alt"], "Space 1")];
        assert_eq!(viz.complete_fetch(second, Ok(newer)), FetchOutcome::Applied(1));
        assert_eq!(viz.complete_fetch(first, Ok(sample())), FetchOutcome::Stale);
        assert_eq!(viz.keybinds().len(), 1);
        assert_eq!(viz.platform(), Platform::Yabai);
        assert!(!viz.is_loading());
        assert_eq!(location.href(), "/keyboard?platform=yabai");
        assert_eq!(location.history().len(), 2);
    }
}
