use crate::model::Product;

/// Height, width and radius must each differ by less than this for two drawings
/// to count as the same glass.
pub const EXACT_TOLERANCE_MM: f64 = 0.1;
/// Similar matches may differ in height by less than this.
pub const SIMILAR_HEIGHT_TOLERANCE_MM: f64 = 1.0;
/// Similar matches are narrower than the reference by an amount in this band.
pub const SIMILAR_WIDTH_MIN_MM: f64 = 0.01;
pub const SIMILAR_WIDTH_MAX_MM: f64 = 0.5;

// Float slack for band edges: 160.6 - 160.5 is 0.0999999999999943, which must
// still count as a full 0.1 mm.
const EPSILON: f64 = 1e-9;

/// Physical outline of a screen guard drawing, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionProfile {
    pub height: f64,
    pub width: f64,
    pub radius: f64,
}

impl DimensionProfile {
    pub fn of(product: &Product) -> Self {
        let specs = product.specs.as_ref();
        Self {
            height: specs.map(|s| s.height_mm()).unwrap_or(0.0),
            width: specs.map(|s| s.width_mm()).unwrap_or(0.0),
            radius: specs.map(|s| s.effective_radius()).unwrap_or(0.0),
        }
    }

    /// Only drawings with a positive height and width take part in dimensional tiers.
    pub fn is_measurable(&self) -> bool {
        self.height > 0.0 && self.width > 0.0
    }

    pub fn is_identical_to(&self, reference: &DimensionProfile) -> bool {
        self.is_measurable()
            && reference.is_measurable()
            && within(self.height, reference.height, EXACT_TOLERANCE_MM)
            && within(self.width, reference.width, EXACT_TOLERANCE_MM)
            && within(self.radius, reference.radius, EXACT_TOLERANCE_MM)
    }

    /// Slightly narrower than the reference and about as tall: usable, not ideal.
    pub fn is_slightly_narrower_than(&self, reference: &DimensionProfile) -> bool {
        if !self.is_measurable() || !reference.is_measurable() {
            return false;
        }
        let narrower_by = reference.width - self.width;
        (SIMILAR_WIDTH_MIN_MM - EPSILON..=SIMILAR_WIDTH_MAX_MM + EPSILON).contains(&narrower_by)
            && within(self.height, reference.height, SIMILAR_HEIGHT_TOLERANCE_MM)
    }
}

/// Strictly closer than `tolerance`; a difference equal to it, up to float noise, is out.
fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance - EPSILON
}
