use crate::{
    core::{config::PopupConfig, geo::Point},
    input::selection::SelectionResult,
    traits::SelectionSink,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Labels used to build the popup body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupTemplate {
    pub title: String,
    pub name_label: String,
    pub measure_label: String,
    pub unit: String,
}

impl PopupTemplate {
    pub fn from_config(config: &PopupConfig) -> Self {
        Self {
            title: config.title.clone(),
            name_label: config.name_label.clone(),
            measure_label: config.measure_label.clone(),
            unit: config.unit.clone(),
        }
    }

    /// HTML body for a feature; a missing measure shows as `-`
    pub fn render(&self, name: &str, measure: Option<f64>) -> String {
        let measure = measure.map_or_else(|| "-".to_string(), |m| m.to_string());
        format!(
            "<h3>{}</h3><p><b>{}:</b> {}</p><p><b>{}:</b> {} {}</p>",
            escape_html(&self.title),
            escape_html(&self.name_label),
            escape_html(name),
            escape_html(&self.measure_label),
            escape_html(&measure),
            escape_html(&self.unit),
        )
    }
}

impl Default for PopupTemplate {
    fn default() -> Self {
        Self::from_config(&PopupConfig::default())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Popup anchored to a map coordinate, hidden while it has no position
#[derive(Debug, Clone, PartialEq)]
pub struct PopupOverlay {
    position: Option<Point>,
    content: Option<String>,
    template: PopupTemplate,
    auto_pan: bool,
    auto_pan_duration: Duration,
}

impl PopupOverlay {
    pub fn new(template: PopupTemplate) -> Self {
        Self {
            position: None,
            content: None,
            template,
            auto_pan: false,
            auto_pan_duration: Duration::ZERO,
        }
    }

    pub fn from_config(config: &PopupConfig) -> Self {
        Self::new(PopupTemplate::from_config(config))
            .with_auto_pan(config.auto_pan, Duration::from_millis(config.auto_pan_duration_ms))
    }

    pub fn with_auto_pan(mut self, enabled: bool, duration: Duration) -> Self {
        self.auto_pan = enabled;
        self.auto_pan_duration = duration;
        self
    }

    pub fn show(&mut self, name: &str, measure: Option<f64>, coordinate: Point) {
        self.content = Some(self.template.render(name, measure));
        self.position = Some(coordinate);
    }

    /// Hides the popup. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.position = None;
        self.content = None;
        was_open
    }

    pub fn is_open(&self) -> bool {
        self.position.is_some()
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn template(&self) -> &PopupTemplate {
        &self.template
    }

    pub fn auto_pan(&self) -> bool {
        self.auto_pan
    }

    pub fn auto_pan_duration(&self) -> Duration {
        self.auto_pan_duration
    }
}

impl Default for PopupOverlay {
    fn default() -> Self {
        Self::from_config(&PopupConfig::default())
    }
}

impl SelectionSink for PopupOverlay {
    fn present(&mut self, result: &SelectionResult) {
        match result {
            SelectionResult::Hit {
                name,
                measure,
                coordinate,
            } => self.show(name, *measure, *coordinate),
            SelectionResult::Miss => {
                self.close();
            }
        }
    }
}
