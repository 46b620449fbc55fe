//! Read-only course catalog.
//!
//! The catalog is loaded once at process start from a JSON file and never
//! mutated at runtime. It is the source of truth for which entitlement ids
//! are purchasable and at what price; the authorization core consults it
//! only to validate id shape, never for access decisions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entitlements;

/// The full catalog: course id -> course definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub courses: BTreeMap<String, Course>,
}

/// One course: a titled set of blocks plus a full-bundle price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub title: String,

    /// Price of the `<course>-full` bundle, in cents.
    pub full_price_cents: i64,

    pub blocks: Vec<Block>,
}

/// One purchasable block within a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block number within the course (1-based); forms the entitlement id
    /// `<course>-block-<number>`.
    pub number: u32,

    pub title: String,

    pub price_cents: i64,
}

/// A priced, displayable catalog entry resolved from an entitlement id.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub entitlement_id: String,
    pub name: String,
    pub price_cents: i64,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse; the
    /// server refuses to start without a valid catalog.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read catalog file {path}: {e}"))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse catalog file {path}: {e}"))?;
        Ok(catalog)
    }

    /// Resolve an entitlement id to its catalog entry.
    ///
    /// Accepts `<course>-full` and `<course>-block-<n>` ids for courses and
    /// blocks that actually exist; anything else is None.
    pub fn item(&self, entitlement_id: &str) -> Option<CatalogItem> {
        for (course_id, course) in &self.courses {
            if entitlements::full_id(course_id) == entitlement_id {
                return Some(CatalogItem {
                    entitlement_id: entitlement_id.to_string(),
                    name: format!("{} — повний курс", course.title),
                    price_cents: course.full_price_cents,
                });
            }
            for block in &course.blocks {
                if entitlements::block_id(course_id, block.number) == entitlement_id {
                    return Some(CatalogItem {
                        entitlement_id: entitlement_id.to_string(),
                        name: format!("{} — {}", course.title, block.title),
                        price_cents: block.price_cents,
                    });
                }
            }
        }
        None
    }

    /// Whether the id names a purchasable catalog entry.
    pub fn contains(&self, entitlement_id: &str) -> bool {
        self.item(entitlement_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        serde_json::from_str(
            r#"{
                "courses": {
                    "course-1": {
                        "title": "Skin care",
                        "full_price_cents": 149900,
                        "blocks": [
                            { "number": 1, "title": "Basics", "price_cents": 49900 },
                            { "number": 2, "title": "Actives", "price_cents": 49900 }
                        ]
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_block_and_full_ids() {
        let catalog = sample();

        let block = catalog.item("course-1-block-2").unwrap();
        assert_eq!(block.price_cents, 49900);

        let full = catalog.item("course-1-full").unwrap();
        assert_eq!(full.price_cents, 149900);
    }

    #[test]
    fn rejects_ids_outside_the_catalog() {
        let catalog = sample();
        assert!(!catalog.contains("course-1-block-3"));
        assert!(!catalog.contains("course-2-full"));
        assert!(!catalog.contains("course-1"));
        assert!(!catalog.contains(""));
    }
}
