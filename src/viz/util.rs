//! Utility functions for visualization: fonts, colors, locale mapping, tick formatting.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;
use std::sync::Once;

/// Marker fill (blue-gray), drawn at [`MARKER_OPACITY`].
pub const MARKER_FILL: RGBColor = RGBColor(51, 102, 153);
pub const MARKER_OPACITY: f64 = 0.7;
pub const MARKER_STROKE: RGBColor = RGBColor(128, 128, 128);
pub const ACTIVE_LABEL: RGBColor = RGBColor(0, 0, 0);
pub const INACTIVE_LABEL: RGBColor = RGBColor(201, 201, 201);
pub const AXIS_COLOR: RGBColor = RGBColor(0, 0, 0);

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

pub fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            log::warn!("bundled sans-serif font could not be registered");
        }
    });
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Decimals needed to tell ticks `step` apart (`1` → 0, `0.5` → 1, `0.05` → 2).
pub fn tick_precision(step: f64) -> usize {
    if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    }
}

/// Format a tick value with thousands grouping and the precision its step calls for.
pub fn format_tick(v: f64, step: f64, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let decimals = tick_precision(step);
    let plain = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut out = String::new();
    if v < 0.0 && plain.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    match int_part.parse::<u64>() {
        Ok(n) => out.push_str(&n.to_formatted_string(locale)),
        Err(_) => out.push_str(int_part),
    }
    if !frac_part.is_empty() {
        out.push(dec_sep);
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(12.0, 2.0, "en"), "12");
        assert_eq!(format_tick(0.4, 0.2, "en"), "0.4");
        assert_eq!(format_tick(45000.0, 5000.0, "en"), "45,000");
        assert_eq!(format_tick(45000.0, 5000.0, "de"), "45.000");
        assert_eq!(format_tick(2.5, 0.5, "de"), "2,5");
        assert_eq!(format_tick(-3.0, 1.0, "en"), "-3");
        assert_eq!(format_tick(-0.0, 1.0, "en"), "0");
    }

    #[test]
    fn precision_from_step() {
        assert_eq!(tick_precision(1.0), 0);
        assert_eq!(tick_precision(5000.0), 0);
        assert_eq!(tick_precision(0.5), 1);
        assert_eq!(tick_precision(0.05), 2);
        assert_eq!(tick_precision(0.0), 0);
    }
}
