//! Grid item codec.
//!
//! Items arrive with the wire names of the front-end grid library (`i`, `w`,
//! `h`, `minH`, `maxH`, `x`, `y`). Layouts that went through a YAML round trip
//! lose the `y` key (YAML reads a bare `y` as boolean `true`), so those layouts
//! carry `cx`/`cy` instead. Decoding resolves the alias here and nowhere else:
//! once a [`WidgetItem`] exists it always has `x` and `y`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetItemError {
    #[error("invalid widget item {widget_type:?}: missing x/y (or cx/cy) coordinates")]
    MissingCoordinates { widget_type: String },
    #[error("invalid widget item: widget type (i) must not be empty")]
    EmptyWidgetType,
    #[error("invalid widget item {widget_type:?}: width and height must be at least 1")]
    ZeroSize { widget_type: String },
    #[error(
        "invalid widget item {widget_type:?}: height {height} outside bounds [{min_height}, {max_height}]"
    )]
    HeightOutOfBounds {
        widget_type: String,
        height: u32,
        min_height: u32,
        max_height: u32,
    },
}

/// One tile in a breakpoint grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWidgetItem")]
pub struct WidgetItem {
    #[serde(rename = "i")]
    pub widget_type: String,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
    #[serde(rename = "minH")]
    pub min_height: u32,
    #[serde(rename = "maxH")]
    pub max_height: u32,
    pub x: u32,
    pub y: u32,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Wire shape before coordinate resolution.
#[derive(Debug, Deserialize)]
struct RawWidgetItem {
    #[serde(rename = "i")]
    widget_type: String,
    #[serde(rename = "w")]
    width: u32,
    #[serde(rename = "h")]
    height: u32,
    #[serde(rename = "minH")]
    min_height: u32,
    #[serde(rename = "maxH")]
    max_height: u32,
    x: Option<u32>,
    y: Option<u32>,
    cx: Option<u32>,
    cy: Option<u32>,
    #[serde(rename = "static", default)]
    is_static: bool,
    #[serde(default)]
    title: Option<String>,
}

impl TryFrom<RawWidgetItem> for WidgetItem {
    type Error = WidgetItemError;

    fn try_from(raw: RawWidgetItem) -> Result<Self, Self::Error> {
        let (x, y) = match (raw.x, raw.y, raw.cx, raw.cy) {
            (Some(x), Some(y), _, _) => (x, y),
            (_, _, Some(cx), Some(cy)) => (cx, cy),
            _ => {
                return Err(WidgetItemError::MissingCoordinates {
                    widget_type: raw.widget_type,
                });
            }
        };

        let item = WidgetItem {
            widget_type: raw.widget_type,
            width: raw.width,
            height: raw.height,
            min_height: raw.min_height,
            max_height: raw.max_height,
            x,
            y,
            is_static: raw.is_static,
            title: raw.title,
        };
        item.validate()?;
        Ok(item)
    }
}

impl WidgetItem {
    /// Checks the dimension bounds a stored item must satisfy.
    pub fn validate(&self) -> Result<(), WidgetItemError> {
        if self.widget_type.trim().is_empty() {
            return Err(WidgetItemError::EmptyWidgetType);
        }
        if self.width == 0 || self.height == 0 {
            return Err(WidgetItemError::ZeroSize {
                widget_type: self.widget_type.clone(),
            });
        }
        if self.height < self.min_height || self.height > self.max_height {
            return Err(WidgetItemError::HeightOutOfBounds {
                widget_type: self.widget_type.clone(),
                height: self.height,
                min_height: self.min_height,
                max_height: self.max_height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_cx_cy_become_coordinates() {
        let item: WidgetItem = serde_json::from_value(
            json!({"w":1,"h":4,"minH":1,"maxH":10,"cx":0,"cy":3,"i":"foo"}),
        )
        .unwrap();
        assert_eq!(item.x, 0);
        assert_eq!(item.y, 3);
        assert_eq!(item.widget_type, "foo");
        assert!(!item.is_static);
        assert_eq!(item.title, None);
    }

    #[test]
    fn x_y_win_over_aliases() {
        let item: WidgetItem = serde_json::from_value(
            json!({"w":2,"h":2,"minH":1,"maxH":4,"x":5,"y":6,"cx":0,"cy":0,"i":"foo"}),
        )
        .unwrap();
        assert_eq!((item.x, item.y), (5, 6));
    }

    #[test]
    fn half_pair_falls_back_to_aliases() {
        let item: WidgetItem = serde_json::from_value(
            json!({"w":2,"h":2,"minH":1,"maxH":4,"x":5,"cx":1,"cy":2,"i":"foo"}),
        )
        .unwrap();
        assert_eq!((item.x, item.y), (1, 2));
    }

    #[test]
    fn missing_coordinates_rejected() {
        let err = serde_json::from_value::<WidgetItem>(
            json!({"w":1,"h":4,"minH":1,"maxH":10,"i":"foo"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing x/y"), "got: {err}");

        let err = serde_json::from_value::<WidgetItem>(
            json!({"w":1,"h":4,"minH":1,"maxH":10,"x":1,"cy":2,"i":"foo"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing x/y"), "got: {err}");
    }

    #[test]
    fn serializes_resolved_coordinates_only() {
        let item: WidgetItem = serde_json::from_value(
            json!({"w":1,"h":4,"minH":1,"maxH":10,"cx":0,"cy":3,"i":"foo","title":"Foo"}),
        )
        .unwrap();
        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["x"], 0);
        assert_eq!(out["y"], 3);
        assert_eq!(out["i"], "foo");
        assert_eq!(out["static"], false);
        assert_eq!(out["title"], "Foo");
        assert!(out.get("cx").is_none());
        assert!(out.get("cy").is_none());
    }

    #[test]
    fn dimension_bounds_enforced() {
        let zero = serde_json::from_value::<WidgetItem>(
            json!({"w":0,"h":4,"minH":1,"maxH":10,"x":0,"y":0,"i":"foo"}),
        );
        assert!(zero.is_err());

        let too_tall = serde_json::from_value::<WidgetItem>(
            json!({"w":1,"h":11,"minH":1,"maxH":10,"x":0,"y":0,"i":"foo"}),
        )
        .unwrap_err();
        assert!(too_tall.to_string().contains("outside bounds"));

        let empty_type = serde_json::from_value::<WidgetItem>(
            json!({"w":1,"h":1,"minH":1,"maxH":1,"x":0,"y":0,"i":""}),
        );
        assert!(empty_type.is_err());
    }

    #[test]
    fn negative_coordinates_rejected() {
        let res = serde_json::from_value::<WidgetItem>(
            json!({"w":1,"h":1,"minH":1,"maxH":1,"x":-1,"y":0,"i":"foo"}),
        );
        assert!(res.is_err());
    }
}
