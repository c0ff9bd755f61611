//! Presentation data owned by the gateway: hero images and bot detection.

/// Hero images for individual innovations, keyed by (group, slug).
const HERO_IMAGES: &[(&str, &str, &str)] = &[
    ("pemprov-jabar", "jabar-digital-academy", "/static/img/hero/jabar-digital-academy.jpg"),
    ("pemprov-jabar", "jabar-form", "/static/img/hero/jabar-form.jpg"),
    ("bumn-bumd", "simotip", "/static/img/hero/simotip.jpg"),
];

/// Fallback hero image for each group.
const GROUP_HERO_IMAGES: &[(&str, &str)] = &[
    ("pemprov-jabar", "/static/img/hero/pemprov-jabar.jpg"),
    ("bumn-bumd", "/static/img/hero/bumn-bumd.jpg"),
    ("kementrian-lembaga-pt", "/static/img/hero/kementrian-lembaga-pt.jpg"),
    ("smp-sma-sederajat", "/static/img/hero/smp-sma-sederajat.jpg"),
    ("pemda-kota", "/static/img/hero/pemda-kota.jpg"),
    ("pemda-kabupaten", "/static/img/hero/pemda-kabupaten.jpg"),
];

const DEFAULT_HERO_IMAGE: &str = "/static/img/hero/default.jpg";

pub fn hero_image(group_slug: &str, slug: &str) -> &'static str {
    HERO_IMAGES
        .iter()
        .find(|(g, s, _)| *g == group_slug && *s == slug)
        .map(|(_, _, image)| *image)
        .or_else(|| {
            GROUP_HERO_IMAGES
                .iter()
                .find(|(g, _)| *g == group_slug)
                .map(|(_, image)| *image)
        })
        .unwrap_or(DEFAULT_HERO_IMAGE)
}

const BOT_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "bingpreview",
    "slurp",
    "curl",
    "wget",
    "headless",
    "python-requests",
];

/// Substring check on the lowercased user agent. An empty agent is not a bot.
pub fn is_bot(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    !ua.is_empty() && BOT_MARKERS.iter().any(|marker| ua.contains(marker))
}
