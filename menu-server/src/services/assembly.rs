//! Menu assembly
//!
//! Turns event [`Preferences`] into a [`Menu`]: dishes of the requested
//! cuisines are bucketed by category, each bucket is sampled up to the
//! requested count, and the surrounding text is generated from the
//! preferences. [`assemble`] is pure and takes the random source as an
//! argument; [`generate`] loads the library and banner first.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use shared::bucket::{Bucket, BucketRules};
use shared::cuisine::{CuisineFilter, cuisine_label, default_banner};
use shared::models::{Dish, Menu, MenuItem, Preferences, Section};
use sqlx::SqlitePool;

use crate::db::{self, RepoResult};
use crate::services::library;

const WINE_PAIRING: &str = "To complement these flavors, we suggest a full-bodied red for the mains and a crisp, aromatic white for the starters.";
const CHEFS_NOTES_LEAD: &str =
    "This menu has been architected with a focus on seasonal integrity and visual drama.";
const CHEFS_NOTES_DEFAULT: &str = "We've ensured a balance of textures and temperatures to provide a continuous culinary journey.";

/// Bucket dishes by category, keeping library order inside each bucket
pub fn bucketize(dishes: Vec<Dish>) -> BTreeMap<Bucket, Vec<MenuItem>> {
    let rules = BucketRules::category();
    let mut buckets: BTreeMap<Bucket, Vec<MenuItem>> = BTreeMap::new();
    for dish in dishes {
        buckets
            .entry(rules.classify(&dish.category))
            .or_default()
            .push(MenuItem::from(dish));
    }
    buckets
}

/// Uniformly sample up to `count` items with distinct names
///
/// Items repeating an earlier name are dropped before sampling. Fewer
/// candidates than `count` yields all of them.
pub fn sample<R: Rng + ?Sized>(candidates: Vec<MenuItem>, count: usize, rng: &mut R) -> Vec<MenuItem> {
    let mut pool: Vec<MenuItem> = Vec::with_capacity(candidates.len());
    for item in candidates {
        if !pool.iter().any(|p| p.name == item.name) {
            pool.push(item);
        }
    }
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

/// Assemble a menu from already loaded library dishes
pub fn assemble<R: Rng + ?Sized>(
    prefs: &Preferences,
    dishes: Vec<Dish>,
    banner_url: String,
    rng: &mut R,
) -> Menu {
    let mut buckets = bucketize(dishes);

    let sections: Vec<Section> = Bucket::ALL
        .iter()
        .filter_map(|bucket| {
            let candidates = buckets.remove(bucket).unwrap_or_default();
            let items = sample(candidates, prefs.composition.get(*bucket) as usize, &mut *rng);
            (!items.is_empty()).then(|| Section {
                id: None,
                category: bucket.title().to_string(),
                items,
            })
        })
        .collect();

    let label = cuisine_label(&prefs.cuisines);
    let qualifier = prefs.budget.qualifier();

    let title = if prefs.event_name.trim().is_empty() {
        format!("{qualifier} {label} Feast")
    } else {
        prefs.event_name.clone()
    };

    let client = if prefs.client_name.trim().is_empty() {
        "our guest of honor"
    } else {
        prefs.client_name.as_str()
    };

    let event_description = format!(
        "A {} curated exclusively for <b>{client}</b>. This {} selection celebrates the vibrant heritage of {label} cuisine, tailored for an intimate gathering of {} guests.",
        prefs.event_type.to_lowercase(),
        qualifier.to_lowercase(),
        prefs.guest_count,
    );

    let notes = prefs.internal_notes.trim();
    let chefs_notes = format!(
        "{CHEFS_NOTES_LEAD} {}",
        if notes.is_empty() { CHEFS_NOTES_DEFAULT } else { notes }
    );

    Menu {
        title,
        event_description,
        sections,
        wine_pairing: WINE_PAIRING.to_string(),
        chefs_notes,
        banner_url,
        cuisine_label: label,
    }
}

/// Stored banner override for a label, else the built-in one
pub async fn banner_for(pool: &SqlitePool, label: &str) -> RepoResult<String> {
    Ok(db::banners::find(pool, label)
        .await?
        .unwrap_or_else(|| default_banner(label)))
}

/// Load the library for the requested cuisines and assemble a menu
pub async fn generate(pool: &SqlitePool, prefs: &Preferences) -> RepoResult<Menu> {
    let filter = CuisineFilter::from_labels(&prefs.cuisines);
    let dishes = library::load(pool, &filter, None).await?;
    let banner = banner_for(pool, &cuisine_label(&prefs.cuisines)).await?;

    let menu = assemble(prefs, dishes, banner, &mut rand::thread_rng());
    tracing::debug!(
        title = %menu.title,
        sections = menu.sections.len(),
        "Menu assembled"
    );
    Ok(menu)
}
