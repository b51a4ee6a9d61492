//! Page → category resolution.
//!
//! Every gallery page is named after the category it shows: `kitchen.html`
//! loads the `kitchen` collection, `/premium-bedroom` loads
//! `premium-bedroom`. The aggregate `premium` page loads all six premium
//! collections at once. Matching is exact against a closed set of keys; an
//! unknown page loads nothing.
//!
//! ```text
//! /kitchen.html          → Category(Kitchen)
//! /rooms/living          → Category(Living)
//! /premium.html          → Premium  (six premium categories)
//! /  or /index.html      → None
//! /kitch                 → None     (no fuzzy matching)
//! ```

use std::fmt;
use std::str::FromStr;

/// A known image collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Kitchen,
    Living,
    Bedroom,
    Dining,
    Bathroom,
    Furniture,
    PremiumKitchen,
    PremiumLiving,
    PremiumBedroom,
    PremiumDining,
    PremiumBathroom,
    PremiumFurniture,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Kitchen,
        Category::Living,
        Category::Bedroom,
        Category::Dining,
        Category::Bathroom,
        Category::Furniture,
        Category::PremiumKitchen,
        Category::PremiumLiving,
        Category::PremiumBedroom,
        Category::PremiumDining,
        Category::PremiumBathroom,
        Category::PremiumFurniture,
    ];

    /// The categories loaded by the aggregate premium page, in page order.
    pub const PREMIUM: [Category; 6] = [
        Category::PremiumKitchen,
        Category::PremiumLiving,
        Category::PremiumBedroom,
        Category::PremiumDining,
        Category::PremiumBathroom,
        Category::PremiumFurniture,
    ];

    /// The key used in URLs, manifest names and container ids.
    pub fn key(self) -> &'static str {
        match self {
            Category::Kitchen => "kitchen",
            Category::Living => "living",
            Category::Bedroom => "bedroom",
            Category::Dining => "dining",
            Category::Bathroom => "bathroom",
            Category::Furniture => "furniture",
            Category::PremiumKitchen => "premium-kitchen",
            Category::PremiumLiving => "premium-living",
            Category::PremiumBedroom => "premium-bedroom",
            Category::PremiumDining => "premium-dining",
            Category::PremiumBathroom => "premium-bathroom",
            Category::PremiumFurniture => "premium-furniture",
        }
    }

    pub fn is_premium(self) -> bool {
        Self::PREMIUM.contains(&self)
    }

    /// Id of the element the category renders into: `{key}Gallery`.
    pub fn container_id(self) -> String {
        format!("{}Gallery", self.key())
    }

    /// Path of the category manifest: `/data/{key}.json`.
    pub fn manifest_path(self) -> String {
        format!("/data/{}.json", self.key())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// What a page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Category(Category),
    /// The aggregate page showing every premium category.
    Premium,
}

impl PageTarget {
    pub fn categories(self) -> Vec<Category> {
        match self {
            PageTarget::Category(c) => vec![c],
            PageTarget::Premium => Category::PREMIUM.to_vec(),
        }
    }
}

/// Page identifier for a path: the last segment without `.html`, `index`
/// for the site root.
pub fn page_name(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let last = path.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        return "index";
    }
    last.strip_suffix(".html").unwrap_or(last)
}

/// Resolve a page path to what it should load.
pub fn resolve(path: &str) -> Option<PageTarget> {
    let page = page_name(path);
    if page == "premium" {
        return Some(PageTarget::Premium);
    }
    page.parse::<Category>().ok().map(PageTarget::Category)
}
