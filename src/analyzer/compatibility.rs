use crate::analyzer::dimensions::DimensionProfile;
use crate::analyzer::tiers::TierList;
use crate::config::{MatchStrategy, MatcherConfig};
use crate::model::{Category, MatchResult, Product};
use crate::normalizer::normalize_device;
use tracing::debug;

/// Trait defining the interface for a device compatibility matcher.
pub trait Matcher {
    /// Computes the tiered list of devices compatible with `target_device` within
    /// `category`. Never fails: an empty catalog or no hits yields empty tiers.
    fn compute_matches(&self, catalog: &[Product], target_device: &str, category: Category) -> MatchResult;
}

/// Matcher over an in-memory catalog snapshot. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct MatcherImpl {
    config: MatcherConfig,
}

impl MatcherImpl {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Whether `product` lists the device whose normalized key is `target_key`.
    fn lists_device(&self, product: &Product, target_key: &str) -> bool {
        product.devices().into_iter().any(|device| {
            let key = normalize_device(device);
            match self.config.strategy {
                MatchStrategy::Exact => key == target_key,
                MatchStrategy::Contains => key.contains(target_key),
            }
        })
    }

    /// Products in `category` listing the target, in catalog order.
    fn listing<'a>(&self, catalog: &'a [Product], target_key: &str, category: Category) -> Vec<&'a Product> {
        in_category(catalog, category)
            .filter(|p| self.lists_device(p, target_key))
            .collect()
    }

    fn screen_guard_tiers(&self, catalog: &[Product], target_key: &str) -> MatchResult {
        let drawings = self.listing(catalog, target_key, Category::ScreenGuard);

        let mut original = TierList::new();
        for product in &drawings {
            original.extend_from_product(product);
        }

        let mut full_temper = TierList::new();
        let mut similar = TierList::new();

        // The first listing drawing is the dimensional reference, so catalog order
        // matters when several drawings list the same device.
        let reference = drawings
            .first()
            .map(|&p| (p, DimensionProfile::of(p)))
            .filter(|(_, profile)| profile.is_measurable());

        if let Some((reference, profile)) = reference {
            for candidate in in_category(catalog, Category::ScreenGuard) {
                if std::ptr::eq(candidate, reference) {
                    continue;
                }
                let candidate_profile = DimensionProfile::of(candidate);
                if candidate_profile.is_identical_to(&profile) {
                    full_temper.extend_from_product(candidate);
                }
                if self.config.include_similar && candidate_profile.is_slightly_narrower_than(&profile) {
                    similar.extend_from_product(candidate);
                }
            }
        }

        debug!(
            "Screen guard tiers: original={} full_temper={} similar={}",
            original.len(),
            full_temper.len(),
            similar.len()
        );

        MatchResult {
            original: Some(original.into_vec()),
            full_temper: Some(full_temper.into_vec()),
            similar: self.config.include_similar.then(|| similar.into_vec()),
            perfect: None,
        }
    }

    fn perfect_tier(&self, catalog: &[Product], target_key: &str, category: Category) -> MatchResult {
        let mut perfect = TierList::new();
        for product in self.listing(catalog, target_key, category) {
            perfect.extend_from_product(product);
        }
        if perfect.is_empty() {
            debug!("No {} lists '{}'", category, target_key);
        } else {
            debug!("{} perfect matches: {}", category, perfect.len());
        }

        MatchResult {
            perfect: Some(perfect.into_vec()),
            ..Default::default()
        }
    }

    fn empty_for(&self, category: Category) -> MatchResult {
        if category.is_screen_guard() {
            MatchResult {
                original: Some(Vec::new()),
                full_temper: Some(Vec::new()),
                similar: self.config.include_similar.then(Vec::new),
                perfect: None,
            }
        } else {
            MatchResult {
                perfect: Some(Vec::new()),
                ..Default::default()
            }
        }
    }
}

impl Matcher for MatcherImpl {
    fn compute_matches(&self, catalog: &[Product], target_device: &str, category: Category) -> MatchResult {
        let target_key = normalize_device(target_device);
        if target_key.is_empty() {
            return self.empty_for(category);
        }

        if category.is_screen_guard() {
            self.screen_guard_tiers(catalog, &target_key)
        } else {
            self.perfect_tier(catalog, &target_key, category)
        }
    }
}

fn in_category(catalog: &[Product], category: Category) -> impl Iterator<Item = &Product> {
    catalog.iter().filter(move |p| p.category == Some(category))
}
