use std::collections::HashMap;

use serde::Serialize;

use super::{normalize_history, upsert_history, HistoryEntry, HistoryError, HistoryStore};
use crate::models::HexColor;

/// One row of the "recent orders" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySwatch {
    pub order_name: String,
    pub color: HexColor,
    /// Black or white, whichever reads on top of `color`.
    pub text_color: HexColor,
}

/// order_name → color for the running session, seeded from the history.
pub struct OrderColorRegistry {
    colors: HashMap<String, HexColor>,
    history: Vec<HistoryEntry>,
    capacity: usize,
    store: Box<dyn HistoryStore>,
}

impl OrderColorRegistry {
    /// Build the registry from persisted history. A store that cannot be
    /// read leaves the history empty.
    pub fn load(store: Box<dyn HistoryStore>, capacity: usize) -> Self {
        let raw = match store.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Order history unreadable, starting empty");
                Vec::new()
            }
        };
        let history = normalize_history(raw, capacity);
        let mut registry = Self {
            colors: HashMap::new(),
            history,
            capacity,
            store,
        };
        registry.reload();
        tracing::debug!(entries = registry.history.len(), "Order history loaded");
        registry
    }

    /// Re-seed the session map from history. Colors for orders that are not
    /// in history are kept.
    pub fn reload(&mut self) {
        for entry in &self.history {
            self.colors.insert(entry.order_name.clone(), entry.color);
        }
    }

    pub fn get(&self, order_name: &str) -> Option<HexColor> {
        self.colors.get(order_name).copied()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// First-encounter color. Only the session map changes; history is
    /// touched when the order is exported or recolored.
    pub fn set_session_color(&mut self, order_name: &str, color: HexColor) {
        self.colors.insert(order_name.to_string(), color);
    }

    /// Operator recolor: session map, history upsert, persist.
    ///
    /// The in-memory state is updated even when persisting fails.
    pub fn assign(&mut self, order_name: &str, color: HexColor) -> Result<(), HistoryError> {
        self.colors.insert(order_name.to_string(), color);
        upsert_history(&mut self.history, order_name, color, self.capacity);
        tracing::info!(order = %order_name, color = %color, "Order color assigned");
        self.save()
    }

    /// Mark every exported order as recently touched and persist once.
    /// Orders without a color are not recorded.
    pub fn record_export<'a, I>(&mut self, order_names: I) -> Result<usize, HistoryError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut touched = 0;
        for name in order_names {
            if let Some(color) = self.get(name) {
                upsert_history(&mut self.history, name, color, self.capacity);
                touched += 1;
            }
        }
        self.save()?;
        Ok(touched)
    }

    /// Rewrite the whole trimmed history.
    pub fn save(&self) -> Result<(), HistoryError> {
        self.store.save(&self.history)
    }

    /// Drop session colors (history stays).
    pub fn clear_session(&mut self) {
        self.colors.clear();
    }

    /// Stored order, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Newest first, with contrast text colors.
    pub fn history_view(&self) -> Vec<HistorySwatch> {
        self.history
            .iter()
            .rev()
            .map(|e| HistorySwatch {
                order_name: e.order_name.clone(),
                color: e.color,
                text_color: e.color.contrast_text(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::JsonHistoryStore;

    fn color(hex: &str) -> HexColor {
        hex.parse().unwrap()
    }

    fn registry_in(dir: &std::path::Path, capacity: usize) -> OrderColorRegistry {
        let store = JsonHistoryStore::new(dir.join("order_history.json"));
        OrderColorRegistry::load(Box::new(store), capacity)
    }

    #[test]
    fn missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(dir.path(), 20);
        assert!(registry.history().is_empty());
        assert_eq!(registry.get("Acme"), None);
    }

    #[test]
    fn unreadable_store_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("order_history.json"), "][").unwrap();
        let registry = registry_in(dir.path(), 20);
        assert!(registry.history().is_empty());
    }

    #[test]
    fn assign_twice_leaves_single_newest_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(dir.path(), 20);
        registry.assign("Globex", color("123456")).unwrap();
        registry.assign("Acme", color("FF0000")).unwrap();
        registry.assign("Globex", color("654321")).unwrap();
        registry.assign("Acme", color("00FF00")).unwrap();

        let acme: Vec<_> = registry
            .history()
            .iter()
            .filter(|e| e.order_name == "Acme")
            .collect();
        assert_eq!(acme.len(), 1);
        assert_eq!(acme[0].color, color("00FF00"));
        assert_eq!(registry.history().last().unwrap().order_name, "Acme");
        assert_eq!(registry.get("Acme"), Some(color("00FF00")));
    }

    #[test]
    fn load_rebuilds_map_from_persisted_history() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut registry = registry_in(dir.path(), 20);
            registry.assign("Acme", color("FF0000")).unwrap();
            registry.assign("Initech", color("0000FF")).unwrap();
        }
        let registry = registry_in(dir.path(), 20);
        assert_eq!(registry.get("Acme"), Some(color("FF0000")));
        assert_eq!(registry.get("Initech"), Some(color("0000FF")));
    }

    #[test]
    fn eviction_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(dir.path(), 2);
        registry.assign("a", color("000001")).unwrap();
        registry.assign("b", color("000002")).unwrap();
        registry.assign("c", color("000003")).unwrap();

        let reloaded = registry_in(dir.path(), 2);
        let names: Vec<_> = reloaded.history().iter().map(|e| e.order_name.clone()).collect();
        assert_eq!(names, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(reloaded.get("a"), None);
    }

    #[test]
    fn session_color_does_not_touch_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(dir.path(), 20);
        registry.set_session_color("Acme", color("ABCDEF"));
        assert_eq!(registry.get("Acme"), Some(color("ABCDEF")));
        assert!(registry.history().is_empty());
        assert!(!dir.path().join("order_history.json").exists());
    }

    #[test]
    fn record_export_skips_uncolored_orders() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(dir.path(), 20);
        registry.set_session_color("Acme", color("ABCDEF"));
        let touched = registry.record_export(["Acme", "NoColor"]).unwrap();
        assert_eq!(touched, 1);
        assert_eq!(registry.history().len(), 1);

        let reloaded = registry_in(dir.path(), 20);
        assert_eq!(reloaded.get("Acme"), Some(color("ABCDEF")));
    }

    #[test]
    fn clear_and_reload_restores_history_colors_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(dir.path(), 20);
        registry.assign("Acme", color("FF0000")).unwrap();
        registry.set_session_color("Fresh", color("00FF00"));

        registry.clear_session();
        registry.reload();
        assert_eq!(registry.get("Acme"), Some(color("FF0000")));
        assert_eq!(registry.get("Fresh"), None);
    }

    #[test]
    fn history_view_is_newest_first_with_contrast() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(dir.path(), 20);
        registry.assign("Dark", color("000080")).unwrap();
        registry.assign("Light", color("FFFF00")).unwrap();

        let view = registry.history_view();
        assert_eq!(view[0].order_name, "Light");
        assert_eq!(view[0].text_color, HexColor::BLACK);
        assert_eq!(view[1].order_name, "Dark");
        assert_eq!(view[1].text_color, HexColor::WHITE);
    }
}
