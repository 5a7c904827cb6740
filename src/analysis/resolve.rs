use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::entities::item;
use crate::errors::ServiceError;

/// Tokens at or below this length never get check-digit stripping; short
/// codes are too likely to collide with an unrelated SKU once truncated.
const CHECK_DIGIT_MIN_LEN: usize = 6;

/// Catalog lookup capability.
///
/// Each method returns the catalog rows matching any of the given values;
/// values with no match are simply absent from the result. Implementations
/// are expected to batch (one query per call, not per value).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<item::Model>, ServiceError>;
    async fn find_by_skus(&self, skus: &[String]) -> Result<Vec<item::Model>, ServiceError>;
    async fn find_by_upcs(&self, upcs: &[String]) -> Result<Vec<item::Model>, ServiceError>;
}

/// Outcome of resolving a batch of raw identifier tokens.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Distinct matched items, in order of first match.
    pub items: Vec<item::Model>,
    /// Input tokens that matched nothing at any tier, in input order.
    pub unmatched: Vec<String>,
}

/// Resolves raw tokens (catalog ids, shelf-label SKUs, UPCs, or UPCs with a
/// printer-appended check digit) to catalog items.
///
/// Tiers, in order: exact catalog id, exact SKU, exact UPC, then for tokens
/// longer than six characters the same SKU/UPC lookups with the final
/// character stripped. A token consumed by one tier is excluded from the
/// later ones, and an unmatched token is reported rather than treated as an
/// error. Duplicate tokens and tokens resolving to the same item collapse to
/// a single entry.
pub async fn resolve_identifiers(
    catalog: &dyn CatalogSource,
    identifiers: &[String],
) -> Result<Resolution, ServiceError> {
    // Distinct tokens, preserving first-seen order.
    let mut tokens: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for token in identifiers {
        if seen.insert(token.clone()) {
            tokens.push(token.clone());
        }
    }

    let mut matched: HashMap<String, item::Model> = HashMap::new();

    // Tier 1: exact catalog id.
    if !tokens.is_empty() {
        for found in catalog.find_by_ids(&tokens).await? {
            matched.insert(found.id.clone(), found);
        }
    }
    let mut remaining: Vec<String> = tokens
        .iter()
        .filter(|t| !matched.contains_key(*t))
        .cloned()
        .collect();

    // Tier 2: exact secondary SKU.
    if !remaining.is_empty() {
        let by_sku = index_by_sku(catalog.find_by_skus(&remaining).await?);
        remaining.retain(|t| {
            if let Some(found) = by_sku.get(t) {
                matched.insert(t.clone(), found.clone());
                false
            } else {
                true
            }
        });
    }

    // Tier 3: exact UPC.
    if !remaining.is_empty() {
        let by_upc = index_by_upc(catalog.find_by_upcs(&remaining).await?);
        remaining.retain(|t| {
            if let Some(found) = by_upc.get(t) {
                matched.insert(t.clone(), found.clone());
                false
            } else {
                true
            }
        });
    }

    // Tier 4: label printers append a check digit the stored code lacks.
    // Strip the final character and retry the SKU/UPC tiers for anything
    // long enough to plausibly be a printed barcode.
    let strippable: HashMap<String, String> = remaining
        .iter()
        .filter(|t| t.chars().count() > CHECK_DIGIT_MIN_LEN)
        .map(|t| (t.clone(), strip_last_char(t)))
        .collect();

    if !strippable.is_empty() {
        let stripped_values: Vec<String> = strippable.values().cloned().collect();
        let by_sku = index_by_sku(catalog.find_by_skus(&stripped_values).await?);
        let by_upc = index_by_upc(catalog.find_by_upcs(&stripped_values).await?);

        remaining.retain(|t| {
            let Some(stripped) = strippable.get(t) else {
                return true;
            };
            if let Some(found) = by_sku.get(stripped).or_else(|| by_upc.get(stripped)) {
                matched.insert(t.clone(), found.clone());
                false
            } else {
                true
            }
        });
    }

    // Collapse to distinct items in order of first matching token.
    let mut items = Vec::new();
    let mut seen_items = HashSet::new();
    for token in &tokens {
        if let Some(found) = matched.get(token) {
            if seen_items.insert(found.id.clone()) {
                items.push(found.clone());
            }
        }
    }

    Ok(Resolution {
        items,
        unmatched: remaining,
    })
}

fn strip_last_char(token: &str) -> String {
    let mut chars = token.chars();
    chars.next_back();
    chars.as_str().to_string()
}

fn index_by_sku(found: Vec<item::Model>) -> HashMap<String, item::Model> {
    let mut map = HashMap::new();
    for model in found {
        if let Some(sku) = model.sku.clone() {
            map.entry(sku).or_insert(model);
        }
    }
    map
}

fn index_by_upc(found: Vec<item::Model>) -> HashMap<String, item::Model> {
    let mut map = HashMap::new();
    for model in found {
        if let Some(upc) = model.upc.clone() {
            map.entry(upc).or_insert(model);
        }
    }
    map
}
