use std::collections::BTreeMap;

use image::DynamicImage;
use tracing::debug;

use crate::config::BrandConfig;
use crate::models::ComplianceResult;

/// Score granted before any brand rule is applied. Logo and color
/// verification are not implemented, so a perfect score is never given.
pub const BASELINE_SCORE: u8 = 85;
const MISSING_LOGO_PENALTY: u8 = 15;

pub const CHECK_COLOR_COMPLIANCE: &str = "colorCompliance";
pub const CHECK_LOGO_PRESENCE: &str = "logoPresence";
pub const CHECK_TEXT_READABILITY: &str = "textReadability";
pub const CHECK_BRAND_GUIDELINES: &str = "brandGuidelines";

pub fn check_brand_compliance(_image: &DynamicImage, brand: &BrandConfig) -> ComplianceResult {
    let mut score = BASELINE_SCORE;
    let mut issues = Vec::new();
    let mut checks = BTreeMap::from([
        (CHECK_COLOR_COMPLIANCE.to_string(), true),
        (CHECK_LOGO_PRESENCE.to_string(), false),
        (CHECK_TEXT_READABILITY.to_string(), true),
        (CHECK_BRAND_GUIDELINES.to_string(), true),
    ]);

    if !brand.required_colors.is_empty() {
        // Color rules are accepted unconditionally for now.
        debug!(colors = brand.required_colors.len(), "Required brand colors not verified");
        checks.insert(CHECK_COLOR_COMPLIANCE.to_string(), true);
    }

    if brand.logo_required {
        checks.insert(CHECK_LOGO_PRESENCE.to_string(), false);
        issues.push("Logo detection not implemented".to_string());
        score -= MISSING_LOGO_PENALTY;
    }

    ComplianceResult { score, issues, checks }
}
