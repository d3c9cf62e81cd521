use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);
    };
}

id_newtype!(NodeId);

impl NodeId {
    /// Id for the arena slot at `index`, `None` once ids no longer fit in `u32`.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// CSS `translate` value for this point, e.g. `12px 40px`.
    pub fn translate_value(&self) -> String {
        format!("{}px {}px", self.x, self.y)
    }
}

/// Category selected by a project filter control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTag {
    #[default]
    All,
    Category(String),
    /// Control without a `data-filter` attribute; matches items without a category.
    Untagged,
}

impl FilterTag {
    pub const ALL: &'static str = "all";

    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(Self::ALL) => Self::All,
            Some(tag) => Self::Category(tag.to_string()),
            None => Self::Untagged,
        }
    }

    pub fn shows(&self, item_category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Category(tag) => item_category == Some(tag.as_str()),
            Self::Untagged => item_category.is_none(),
        }
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Category(tag) => f.write_str(tag),
            Self::Untagged => f.write_str("<untagged>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Error,
    Success,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    Open,
    #[default]
    Closed,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        *self == Self::Open
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_never_wrap() {
        assert_eq!(NodeId::from_index(7), Some(NodeId(7)));
        assert_eq!(NodeId::from_index(7).map(NodeId::index), Some(7));
        let last = usize::try_from(u32::MAX).expect("usize holds u32");
        assert_eq!(NodeId::from_index(last), Some(NodeId(u32::MAX)));
        if let Some(past) = last.checked_add(1) {
            assert_eq!(NodeId::from_index(past), None);
        }
    }

    #[test]
    fn filter_tag_reads_all_and_categories() {
        assert_eq!(FilterTag::from_attribute(Some("all")), FilterTag::All);
        assert_eq!(
            FilterTag::from_attribute(Some("frontend")),
            FilterTag::Category("frontend".into())
        );
        assert_eq!(FilterTag::from_attribute(None), FilterTag::Untagged);
    }

    #[test]
    fn filter_tag_visibility_rules() {
        let frontend = FilterTag::Category("frontend".into());
        assert!(frontend.shows(Some("frontend")));
        assert!(!frontend.shows(Some("backend")));
        assert!(!frontend.shows(None));
        assert!(FilterTag::All.shows(None));
        assert!(FilterTag::Untagged.shows(None));
        assert!(!FilterTag::Untagged.shows(Some("frontend")));
    }

    #[test]
    fn translate_value_uses_pixel_units() {
        assert_eq!(Point::new(12.0, 40.5).translate_value(), "12px 40.5px");
    }

    #[test]
    fn menu_state_toggles() {
        assert_eq!(MenuState::default().toggled(), MenuState::Open);
        assert!(!MenuState::Open.toggled().is_open());
    }
}
