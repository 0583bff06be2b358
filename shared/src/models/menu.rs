//! Menu document and the preferences it is assembled from

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dish::{Dish, SubItem};
use crate::bucket::Bucket;
use crate::cuisine::ANY_MIX;

/// Sub-item snapshot carried inside a menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSubItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

impl From<SubItem> for MenuSubItem {
    fn from(sub: SubItem) -> Self {
        Self {
            id: Some(sub.id),
            name: sub.name,
            description: sub.description,
            dietary_tags: sub.dietary_tags,
        }
    }
}

/// Dish snapshot copied by value into a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Library dish id, absent for items never saved to the library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<MenuSubItem>,
}

impl From<Dish> for MenuItem {
    fn from(dish: Dish) -> Self {
        Self {
            id: Some(dish.id),
            name: dish.name,
            description: dish.description,
            dietary_tags: dish.dietary_tags,
            image_url: dish.image_url,
            sub_items: dish.sub_items.into_iter().map(MenuSubItem::from).collect(),
        }
    }
}

/// A titled, ordered group of menu items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Section title
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// Assembled menu document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub title: String,
    pub event_description: String,
    pub sections: Vec<Section>,
    pub wine_pairing: String,
    pub chefs_notes: String,
    #[serde(alias = "vibeDescription")]
    pub banner_url: String,
    #[serde(default = "default_cuisine_label", alias = "cuisineRegion")]
    pub cuisine_label: String,
}

fn default_cuisine_label() -> String {
    ANY_MIX.to_string()
}

/// Requested item count per bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    #[serde(default)]
    pub appetizers: u32,
    #[serde(default)]
    pub mains: u32,
    #[serde(default)]
    pub live_stations: u32,
    #[serde(default)]
    pub sides: u32,
    #[serde(default)]
    pub desserts: u32,
    #[serde(default)]
    pub beverages: u32,
}

impl Composition {
    pub fn get(&self, bucket: Bucket) -> u32 {
        match bucket {
            Bucket::Appetizers => self.appetizers,
            Bucket::Mains => self.mains,
            Bucket::LiveStations => self.live_stations,
            Bucket::Sides => self.sides,
            Bucket::Desserts => self.desserts,
            Bucket::Beverages => self.beverages,
        }
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            appetizers: 3,
            mains: 2,
            live_stations: 0,
            sides: 2,
            desserts: 1,
            beverages: 0,
        }
    }
}

/// Budget level, ordered from cheapest to most lavish
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Budget,
    #[default]
    Standard,
    Premium,
    Luxury,
}

impl BudgetLevel {
    /// Adjective phrase used in generated titles and descriptions
    pub fn qualifier(&self) -> &'static str {
        match self {
            Self::Luxury => "Exquisite and opulent",
            Self::Premium => "Sophisticated and elevated",
            Self::Standard => "Classic and delightful",
            Self::Budget => "Casual and inviting",
        }
    }
}

/// Event preferences submitted by staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub event_name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub client_name: String,
    #[validate(length(min = 1, max = 100, message = "Event type is required"))]
    pub event_type: String,
    #[serde(default, alias = "date")]
    pub event_date: String,
    #[validate(range(min = 1, max = 100000, message = "Guest count must be at least 1"))]
    pub guest_count: u32,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub composition: Composition,
    #[serde(default)]
    pub internal_notes: String,
    #[serde(default, alias = "budgetLevel")]
    pub budget: BudgetLevel,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            event_name: String::new(),
            client_name: String::new(),
            event_type: "Wedding".to_string(),
            event_date: String::new(),
            guest_count: 50,
            cuisines: vec![ANY_MIX.to_string()],
            composition: Composition::default(),
            internal_notes: String::new(),
            budget: BudgetLevel::Standard,
        }
    }
}
