//! Category and supplier facets accumulated from scanned records.
//!
//! The index only ever grows: each batch adds ids not yet seen, keeping the
//! first name observed for an id, and the lists are re-sorted by name after
//! every batch. [`FacetIndex::clear`] is the only way to shrink it.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use invdash_core::{Category, Reference, Supplier};
use serde_json::Value;

use crate::fields::{fold_key, FieldPolicy};
use crate::normalize;

#[derive(Debug, Default)]
struct Facets {
    categories: Vec<Category>,
    category_ids: HashSet<String>,
    suppliers: Vec<Supplier>,
    supplier_ids: HashSet<String>,
}

/// Thread-safe accumulator shared by the scanner and its readers.
#[derive(Debug, Default)]
pub struct FacetIndex {
    inner: RwLock<Facets>,
}

impl FacetIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one batch of raw records into the index. Records without both
    /// an id and a name for a facet contribute nothing to it.
    pub fn extract(&self, records: &[Value]) {
        self.extract_if(records, || true);
    }

    /// [`Self::extract`], skipped when `still_valid` fails. The check runs
    /// under the write lock, so it is ordered against [`Self::clear`].
    /// Returns whether the batch was folded in.
    pub fn extract_if<V>(&self, records: &[Value], still_valid: V) -> bool
    where
        V: FnOnce() -> bool,
    {
        let mut facets = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !still_valid() {
            return false;
        }
        let Facets {
            categories,
            category_ids,
            suppliers,
            supplier_ids,
        } = &mut *facets;

        let mut added = 0_usize;
        for record in records {
            added += usize::from(absorb(
                record,
                &normalize::CATEGORY_ID,
                &normalize::CATEGORY,
                categories,
                category_ids,
            ));
            added += usize::from(absorb(
                record,
                &normalize::SUPPLIER_ID,
                &normalize::SUPPLIER,
                suppliers,
                supplier_ids,
            ));
        }

        sort_by_name(categories);
        sort_by_name(suppliers);

        if added > 0 {
            tracing::debug!(
                added,
                categories = categories.len(),
                suppliers = suppliers.len(),
                "facet index grew"
            );
        }
        true
    }

    /// Categories seen so far, sorted by name.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .categories
            .clone()
    }

    /// Suppliers seen so far, sorted by name.
    #[must_use]
    pub fn suppliers(&self) -> Vec<Supplier> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .suppliers
            .clone()
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Facets::default();
    }
}

fn absorb(
    record: &Value,
    id_policy: &FieldPolicy,
    name_policy: &FieldPolicy,
    list: &mut Vec<Reference>,
    seen: &mut HashSet<String>,
) -> bool {
    let (Some(id), Some(name)) = (id_policy.text(record), name_policy.text(record)) else {
        return false;
    };
    if !seen.insert(id.clone()) {
        return false;
    }
    list.push(Reference { id, name });
    true
}

fn sort_by_name(list: &mut [Reference]) {
    list.sort_by(|a, b| {
        fold_key(&a.name)
            .cmp(&fold_key(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}
