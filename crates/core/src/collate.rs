//! Locale-aware comparison for product names.
//!
//! Uses the ICU collator for Spanish: accents and case only break ties,
//! `ñ` sorts after `n`, and lowercase comes before uppercase.

use std::cmp::Ordering;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use icu_locale_core::locale;

/// Spanish name collator.
pub struct NameCollator {
    collator: Option<CollatorBorrowed<'static>>,
}

impl NameCollator {
    /// Collator for the `es` locale from the compiled CLDR data.
    #[must_use]
    pub fn spanish() -> Self {
        Self {
            collator: Collator::try_new(locale!("es").into(), CollatorOptions::default()).ok(),
        }
    }

    /// Compare two names the way a Spanish reader would order them.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        }
    }
}
