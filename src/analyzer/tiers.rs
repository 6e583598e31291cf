use crate::model::Product;
use crate::normalizer::normalize_device;
use std::collections::HashSet;

/// Device names deduplicated by normalized key. Entries keep the order and the
/// spelling of their first occurrence.
#[derive(Debug, Default)]
pub struct TierList {
    seen: HashSet<String>,
    devices: Vec<String>,
}

impl TierList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an equivalent name is already present.
    pub fn push(&mut self, name: &str) -> bool {
        let key = normalize_device(name);
        if key.is_empty() || !self.seen.insert(key) {
            return false;
        }
        self.devices.push(name.trim().to_string());
        true
    }

    pub fn extend_from_product(&mut self, product: &Product) {
        for device in product.devices() {
            self.push(device);
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.devices
    }
}
