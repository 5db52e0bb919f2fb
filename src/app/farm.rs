//! Growth tier lookup for the farm scene.
//!
//! A wallet's CRT balance, scaled by [`POINTS_PER_TOKEN`], falls into one of
//! sixteen growth tiers (0, 30, 60, …, 450). The tier picks the farm image
//! and drives the "buy N more" prompt.

/// Growth points per whole CRT token.
pub const POINTS_PER_TOKEN: f64 = 100.0;

/// Width of one growth tier, in points.
pub const TIER_STEP: u32 = 30;

/// Terminal tier; farms do not grow past this.
pub const TIER_MAX: u32 = 450;

/// Tier bucket for a point count: 0 for an empty farm, otherwise the first
/// boundary strictly greater than `points`, capped at [`TIER_MAX`].
/// Negative input is treated as an empty farm.
pub fn growth_tier(points: f64) -> u32 {
    if points <= 0.0 {
        return 0;
    }
    if points >= TIER_MAX as f64 {
        return TIER_MAX;
    }
    next_boundary(points).min(TIER_MAX)
}

/// First tier boundary strictly above `points`. Only meaningful below
/// [`TIER_MAX`].
fn next_boundary(points: f64) -> u32 {
    ((points.max(0.0) / TIER_STEP as f64).floor() as u32 + 1) * TIER_STEP
}

pub fn farm_image(base_url: &str, points: f64) -> String {
    format!("{}/farm/{}.png", base_url, growth_tier(points))
}

/// Tokens left to buy before the next tier, formatted for display; "Full"
/// once the farm is maxed out.
pub fn points_to_next_tier(points: f64) -> String {
    if points >= TIER_MAX as f64 {
        return "Full".to_string();
    }
    let points = points.max(0.0);
    format_grouped((next_boundary(points) as f64 - points) / POINTS_PER_TOKEN)
}

pub fn farm_description(points: f64) -> String {
    let held = format_grouped(points.max(0.0) / POINTS_PER_TOKEN);
    if points < TIER_MAX as f64 {
        format!(
            "You have {held} (CRT). Buy {} more to grow one more 🥕. \
             May need to reload after buy for new seed growth.",
            points_to_next_tier(points)
        )
    } else {
        format!("You have {held} (CRT). New farm will open soon.")
    }
}

/// Shortens a wallet address to `head...tail` for titles. Inputs shorter
/// than eight characters are returned unchanged.
pub fn trim_address(address: &str) -> String {
    let len = address.chars().count();
    if len < 8 {
        return address.to_string();
    }
    let head: String = address.chars().take(4).collect();
    let tail: String = address.chars().skip(len - 4).collect();
    format!("{head}...{tail}")
}

/// en-US number formatting: thousands grouping, at most three fraction
/// digits, no trailing zeros. Expects non-negative input.
pub fn format_grouped(value: f64) -> String {
    let text = format!("{:.3}", value.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let grouped = group_thousands(whole);
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = Vec::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.into_iter().rev().collect()
}
