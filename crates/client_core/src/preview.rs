//! Render model for a prepared route card: what the driver sees before
//! choosing to download it.

use shared::domain::{PreparedRoute, RouteBox, RouteId, Stop};

use crate::tags::{resolve_tag_color, TagColor};

/// Chips shown per card before collapsing the rest into a `+N` indicator.
pub const PREVIEW_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxChip {
    pub label: String,
    /// `"i/n"` for multi-box shipments.
    pub volume: Option<String>,
    pub color: TagColor,
}

impl BoxChip {
    fn from_box(item: &RouteBox) -> Self {
        let label = [
            item.tag_label.as_deref(),
            item.recipient.as_deref(),
            item.order_ref.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(item.id.as_str())
        .to_string();

        Self {
            label,
            volume: item.multi_box_label(),
            color: resolve_tag_color(item.tag_color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopChip {
    pub label: String,
    pub city: String,
    pub color: TagColor,
}

impl StopChip {
    fn from_stop(stop: &Stop) -> Self {
        let label = stop
            .tag_label
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(|tag| format!("{tag} · {}", stop.name))
            .unwrap_or_else(|| stop.name.clone());

        Self {
            label,
            city: stop.city.clone(),
            color: resolve_tag_color(stop.tag_color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePreview {
    pub route_id: RouteId,
    pub title: String,
    pub prepared_at: String,
    pub stop_count: usize,
    pub box_count: usize,
    pub stops: Vec<StopChip>,
    pub hidden_stops: usize,
    pub boxes: Vec<BoxChip>,
    pub hidden_boxes: usize,
}

impl RoutePreview {
    pub fn from_route(route: &PreparedRoute) -> Self {
        let title = route
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Rota {}", route.id));

        Self {
            route_id: route.id.clone(),
            title,
            prepared_at: route.prepared_at.format("%d/%m/%Y %H:%M").to_string(),
            stop_count: route.stops.len(),
            box_count: route.boxes.len(),
            stops: route
                .stops
                .iter()
                .take(PREVIEW_LIMIT)
                .map(StopChip::from_stop)
                .collect(),
            hidden_stops: route.stops.len().saturating_sub(PREVIEW_LIMIT),
            boxes: route
                .boxes
                .iter()
                .take(PREVIEW_LIMIT)
                .map(BoxChip::from_box)
                .collect(),
            hidden_boxes: route.boxes.len().saturating_sub(PREVIEW_LIMIT),
        }
    }

    pub fn more_boxes_label(&self) -> Option<String> {
        overflow_label(self.hidden_boxes)
    }

    pub fn more_stops_label(&self) -> Option<String> {
        overflow_label(self.hidden_stops)
    }
}

fn overflow_label(hidden: usize) -> Option<String> {
    (hidden > 0).then(|| format!("+{hidden}"))
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
mod tests;
