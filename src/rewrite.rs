//! Rendered-output rewriting.
//!
//! Works on text, never on a parsed document. A [`Rewriter`] is built once
//! from the frozen [`AssetRegistry`] and then applied to every rendered page
//! and stylesheet. Three passes, in order:
//!
//! ## Foreground: `<img>` → `<picture>`
//!
//! Every `<img>` tag whose `src` attribute is exactly a registered source path
//! (double or single quotes, any attribute order, tag name in any case) is
//! replaced, all occurrences at once:
//!
//! ```text
//! <img src="source/photos/sunset.jpg" alt="Dusk">
//!   ↓
//! <picture class="responsive-picture">
//!   <source type="image/webp" srcset="/photos/sunset-small.webp 480w, ...">
//!   <source type="image/jpeg" srcset="/photos/sunset-small.jpg 480w, ...">
//!   <img src="/photos/sunset-medium.jpg" alt="Dusk" loading="lazy">
//! </picture>
//! ```
//!
//! (whitespace added for display; the output is on one line). The `alt` value
//! is carried over byte for byte. Other attributes are dropped.
//!
//! ## Background: `url()` → `image-set()`
//!
//! The exact declaration `background-image: url("<source path>")` becomes a
//! plain `url()` fallback at the `xl` tier followed by an `image-set()` with
//! 1x/2x/3x density candidates (small/medium/large), WebP first:
//!
//! ```text
//! background-image: url("/img/hero-xl.jpg"); background-image: image-set(
//!     url("/img/hero-small.webp") type("image/webp") 1x, ... 3x,
//!     url("/img/hero-small.jpg") type("image/jpeg") 1x, ... 3x)
//! ```
//!
//! The fallback comes first so browsers without `image-set()` keep it and
//! browsers with it let the second declaration win.
//!
//! ## Support stylesheet
//!
//! A fixed `<style data-respimg>` block goes in front of the first `</head>`.
//! Documents without `</head>` (stylesheets, fragments) are left alone, and a
//! document that already carries the block does not get a second one.
//!
//! Output never contains a registered source path in a position the
//! rewriter matches, so rewriting rewritten text changes nothing.

use crate::config::PipelineConfig;
use crate::registry::AssetRegistry;
use crate::types::{AssetRecord, Derivative, Format, Tier};
use maud::{PreEscaped, html};
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Attribute marking the injected support stylesheet.
pub const STYLE_MARKER: &str = "data-respimg";

/// Runs of tag text outside or across whole quoted values, so a `>` inside
/// an attribute value does not end the tag.
const ATTR_RUN: &str = r#"(?:[^>"']|"[^"]*"|'[^']*')*"#;

/// One attribute of a tag: name, then an optional quoted or bare value.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s([A-Za-z_:][-\w:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("valid attribute pattern")
});

/// Density descriptors for the background `image-set()`.
static DENSITY_TIERS: [(Tier, &str); 3] = [
    (Tier::Small, "1x"),
    (Tier::Medium, "2x"),
    (Tier::Large, "3x"),
];

/// Settings the rewriter needs, lifted out of [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOptions {
    /// Derivative URLs are relative to this directory.
    pub base_dir: PathBuf,
    pub url_prefix: String,
    /// Class on every generated `<picture>`.
    pub picture_class: String,
    /// CSS `image-set()` substitution and the support stylesheet.
    pub backgrounds: bool,
    pub inject_styles: bool,
    pub background_selector: String,
}

impl RewriteOptions {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let bg = &config.background_images;
        Self {
            base_dir: config.paths.base_dir.clone(),
            url_prefix: config.paths.url_prefix.clone(),
            picture_class: bg.class.clone(),
            backgrounds: bg.enabled,
            inject_styles: bg.inject_styles,
            background_selector: bg.selector.clone(),
        }
    }

    /// Public URL of a derivative stored in `directory`.
    pub fn derivative_url(&self, directory: &Path, file_name: &str) -> String {
        let relative = directory.strip_prefix(&self.base_dir).unwrap_or(directory);
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect();

        let mut url = self.url_prefix.clone();
        if !url.is_empty() && !url.ends_with('/') {
            url.push('/');
        }
        for segment in segments {
            url.push_str(&segment);
            url.push('/');
        }
        url.push_str(file_name);
        url
    }

    fn url(&self, record: &AssetRecord, derivative: &Derivative) -> String {
        self.derivative_url(&record.directory, &derivative.file_name())
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// `<img>` substitution for one foreground record.
struct PictureRule {
    source_path: String,
    pattern: Regex,
    class: String,
    webp_srcset: String,
    fallback_mime: &'static str,
    fallback_srcset: String,
    fallback_src: String,
}

impl PictureRule {
    fn new(record: &AssetRecord, options: &RewriteOptions) -> Option<Self> {
        let fallback = record.fallback_format();
        let fallback_src = record
            .derivative(Tier::Medium, fallback)
            .or_else(|| record.in_format(fallback).next())?;

        let escaped = regex::escape(&record.source_path);
        let pattern = format!(
            r#"<(?i:img)\b{ATTR_RUN}?\s(?i:src)\s*=\s*(?:"{escaped}"|'{escaped}'){ATTR_RUN}>"#
        );
        let pattern = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(source = %record.source_path, "cannot build <img> matcher: {e}");
                return None;
            }
        };

        Some(Self {
            source_path: record.source_path.clone(),
            pattern,
            class: options.picture_class.clone(),
            webp_srcset: srcset(record, Format::WebP, options),
            fallback_mime: fallback.mime(),
            fallback_srcset: srcset(record, fallback, options),
            fallback_src: options.url(record, fallback_src),
        })
    }

    fn render(&self, alt: Option<String>) -> String {
        html! {
            picture class=(self.class) {
                source type="image/webp" srcset=(self.webp_srcset);
                source type=(self.fallback_mime) srcset=(self.fallback_srcset);
                img src=(self.fallback_src) alt=[alt.map(PreEscaped)] loading="lazy";
            }
        }
        .into_string()
    }

    fn apply(&self, text: &str) -> Option<String> {
        if !text.contains(&self.source_path) {
            return None;
        }
        let mut hits = 0;
        let replaced = self.pattern.replace_all(text, |caps: &Captures| {
            hits += 1;
            self.render(extract_alt(&caps[0]))
        });
        if hits == 0 {
            return None;
        }
        debug!(source = %self.source_path, hits, "replaced <img> tags");
        Some(replaced.into_owned())
    }
}

/// `background-image` substitution for one background record.
struct BackgroundRule {
    needle: String,
    block: String,
}

impl BackgroundRule {
    fn new(record: &AssetRecord, options: &RewriteOptions) -> Option<Self> {
        let fallback = record.fallback_format();
        let xl = record
            .derivative(Tier::Xl, fallback)
            .or_else(|| record.in_format(fallback).last())?;

        let candidates: Vec<String> = [Format::WebP, fallback]
            .into_iter()
            .flat_map(|format| {
                DENSITY_TIERS.iter().filter_map(move |&(tier, density)| {
                    record.derivative(tier, format).map(|d| {
                        format!(
                            r#"url("{}") type("{}") {}"#,
                            options.url(record, d),
                            format.mime(),
                            density
                        )
                    })
                })
            })
            .collect();

        Some(Self {
            needle: format!(r#"background-image: url("{}")"#, record.source_path),
            block: format!(
                r#"background-image: url("{}"); background-image: image-set({})"#,
                options.url(record, xl),
                candidates.join(", ")
            ),
        })
    }

    fn apply(&self, text: &str) -> Option<String> {
        text.contains(&self.needle)
            .then(|| text.replace(&self.needle, &self.block))
    }
}

/// Applies every registered substitution to rendered text.
pub struct Rewriter {
    pictures: Vec<PictureRule>,
    backgrounds: Vec<BackgroundRule>,
    stylesheet: Option<String>,
}

impl Rewriter {
    pub fn new(registry: &AssetRegistry, options: &RewriteOptions) -> Self {
        let pictures = registry
            .foreground()
            .filter_map(|record| PictureRule::new(record, options))
            .collect();
        let backgrounds = if options.backgrounds {
            registry
                .background()
                .filter_map(|record| BackgroundRule::new(record, options))
                .collect()
        } else {
            Vec::new()
        };
        let stylesheet = (options.backgrounds && options.inject_styles)
            .then(|| support_stylesheet(&options.background_selector, &options.picture_class));

        Self {
            pictures,
            backgrounds,
            stylesheet,
        }
    }

    /// Number of substitution rules (one per usable record).
    pub fn rule_count(&self) -> usize {
        self.pictures.len() + self.backgrounds.len()
    }

    /// Rewrite one rendered document.
    pub fn rewrite(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.pictures {
            if let Some(replaced) = rule.apply(&out) {
                out = replaced;
            }
        }
        for rule in &self.backgrounds {
            if let Some(replaced) = rule.apply(&out) {
                out = replaced;
            }
        }
        if let Some(style) = &self.stylesheet {
            if let Some(injected) = inject_stylesheet(&out, style) {
                out = injected;
            }
        }
        out
    }
}

/// `url w` pairs for one format, in tier order.
fn srcset(record: &AssetRecord, format: Format, options: &RewriteOptions) -> String {
    record
        .in_format(format)
        .map(|d| format!("{} {}w", options.url(record, d), d.width))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `alt` value of an `<img>` tag, ready to emit inside double quotes.
fn extract_alt(tag: &str) -> Option<String> {
    let caps = ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case("alt"))?;
    if let Some(single) = caps.get(3) {
        // Single-quoted values may hold a bare `"`
        return Some(single.as_str().replace('"', "&quot;"));
    }
    Some(
        caps.get(2)
            .or_else(|| caps.get(4))
            .map_or("", |value| value.as_str())
            .to_string(),
    )
}

/// The fixed support stylesheet.
pub fn support_stylesheet(selector: &str, class: &str) -> String {
    format!(
        "<style {STYLE_MARKER}>\n\
         {selector} {{ background-size: cover; background-position: center; background-repeat: no-repeat; }}\n\
         picture.{class} {{ display: block; }}\n\
         picture.{class} > img {{ display: block; width: 100%; height: auto; }}\n\
         </style>\n"
    )
}

/// Insert `style` before the first `</head>`, unless already present.
fn inject_stylesheet(text: &str, style: &str) -> Option<String> {
    if text.contains(&format!("<style {STYLE_MARKER}>")) {
        return None;
    }
    let at = text.find("</head>")?;
    let mut out = String::with_capacity(text.len() + style.len());
    out.push_str(&text[..at]);
    out.push_str(style);
    out.push_str(&text[at..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{classified_record, sample_record};
    use crate::types::Classification;

    const SUNSET_PICTURE: &str = concat!(
        r#"<picture class="responsive-picture">"#,
        r#"<source type="image/webp" srcset="/photos/sunset-small.webp 480w, /photos/sunset-medium.webp 768w, /photos/sunset-large.webp 1280w, /photos/sunset-xl.webp 1920w">"#,
        r#"<source type="image/jpeg" srcset="/photos/sunset-small.jpg 480w, /photos/sunset-medium.jpg 768w, /photos/sunset-large.jpg 1280w, /photos/sunset-xl.jpg 1920w">"#,
        r#"<img src="/photos/sunset-medium.jpg" alt="Dusk" loading="lazy">"#,
        r#"</picture>"#,
    );

    const HERO_BLOCK: &str = concat!(
        r#"background-image: url("/img/hero-xl.jpg"); background-image: image-set("#,
        r#"url("/img/hero-small.webp") type("image/webp") 1x, "#,
        r#"url("/img/hero-medium.webp") type("image/webp") 2x, "#,
        r#"url("/img/hero-large.webp") type("image/webp") 3x, "#,
        r#"url("/img/hero-small.jpg") type("image/jpeg") 1x, "#,
        r#"url("/img/hero-medium.jpg") type("image/jpeg") 2x, "#,
        r#"url("/img/hero-large.jpg") type("image/jpeg") 3x)"#,
    );

    fn rewriter(paths: &[&str], options: &RewriteOptions) -> Rewriter {
        let registry: AssetRegistry = paths.iter().map(|p| classified_record(p)).collect();
        Rewriter::new(&registry, options)
    }

    fn default_rewriter(paths: &[&str]) -> Rewriter {
        rewriter(paths, &RewriteOptions::default())
    }

    // =========================================================================
    // Foreground
    // =========================================================================

    #[test]
    fn img_becomes_picture() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let out = rw.rewrite(r#"<p><img src="source/photos/sunset.jpg" alt="Dusk"></p>"#);
        assert_eq!(out, format!("<p>{SUNSET_PICTURE}</p>"));
    }

    #[test]
    fn single_quotes_and_attribute_order() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let out = rw.rewrite(r#"<IMG class="x" alt="Dusk" src='source/photos/sunset.jpg' />"#);
        assert_eq!(out, SUNSET_PICTURE);
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let tag = r#"<img src="source/photos/sunset.jpg" alt="Dusk">"#;
        let out = rw.rewrite(&format!("{tag}\n{tag}"));
        assert_eq!(out, format!("{SUNSET_PICTURE}\n{SUNSET_PICTURE}"));
    }

    #[test]
    fn match_is_literal_and_case_sensitive() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        for text in [
            r#"<img src="Source/photos/sunset.jpg">"#,
            r#"<img src="source/photos/sunset.jpg.bak">"#,
            r#"<img src="/source/photos/sunset.jpg">"#,
            r#"<img data-src="source/photos/sunset.jpg">"#,
            r#"<a href="source/photos/sunset.jpg">full size</a>"#,
        ] {
            assert_eq!(rw.rewrite(text), text);
        }
    }

    #[test]
    fn regex_metacharacters_in_path_are_literal() {
        let rw = default_rewriter(&["source/a+b (1).jpg"]);
        let out = rw.rewrite(r#"<img src="source/a+b (1).jpg">"#);
        assert!(out.starts_with("<picture"));
        assert_eq!(rw.rewrite(r#"<img src="source/aab (1).jpg">"#), r#"<img src="source/aab (1).jpg">"#);
    }

    #[test]
    fn missing_alt_is_omitted() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let out = rw.rewrite(r#"<img src="source/photos/sunset.jpg">"#);
        assert!(out.contains(r#"<img src="/photos/sunset-medium.jpg" loading="lazy">"#));
    }

    #[test]
    fn alt_is_kept_verbatim() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let out = rw.rewrite(r#"<img alt="Fish &amp; chips" src="source/photos/sunset.jpg">"#);
        assert!(out.contains(r#"alt="Fish &amp; chips""#));

        let out = rw.rewrite(r#"<img alt='He said "hi"' src="source/photos/sunset.jpg">"#);
        assert!(out.contains(r#"alt="He said &quot;hi&quot;""#));
    }

    #[test]
    fn angle_bracket_inside_attribute_values() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let out = rw.rewrite(
            r#"<p><img title="1 > 0" alt="a > b" src="source/photos/sunset.jpg" data-x='<>'></p>"#,
        );
        assert!(out.starts_with(r#"<p><picture class="responsive-picture">"#));
        assert!(out.contains(r#"<img src="/photos/sunset-medium.jpg" alt="a > b" loading="lazy">"#));
        assert!(out.ends_with("</picture></p>"));
        assert!(!out.contains("source/photos/sunset.jpg"));
        assert_eq!(rw.rewrite(&out), out);
    }

    #[test]
    fn src_inside_another_attribute_value_is_not_a_match() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let text = r#"<img title=' src="source/photos/sunset.jpg"' src="other.jpg">"#;
        assert_eq!(rw.rewrite(text), text);
    }

    #[test]
    fn alt_is_read_from_the_alt_attribute_only() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let out = rw.rewrite(r#"<img title="x alt='no'" src="source/photos/sunset.jpg">"#);
        assert!(out.contains(r#"<img src="/photos/sunset-medium.jpg" loading="lazy">"#));

        let out = rw.rewrite(r#"<img hidden ALT=Dusk src="source/photos/sunset.jpg">"#);
        assert!(out.contains(r#"alt="Dusk""#));
    }

    #[test]
    fn png_source_uses_png_fallback() {
        let rw = default_rewriter(&["source/logo.png"]);
        let out = rw.rewrite(r#"<img src="source/logo.png">"#);
        assert!(out.contains(r#"<source type="image/png" srcset="/logo-small.png 480w"#));
        assert!(out.contains(r#"<img src="/logo-medium.png""#));
    }

    #[test]
    fn unregistered_paths_pass_through() {
        let rw = default_rewriter(&["source/photos/sunset.jpg"]);
        let text = r#"<img src="source/photos/anim.gif"><img src="source/other.jpg">"#;
        assert_eq!(rw.rewrite(text), text);
    }

    #[test]
    fn background_records_do_not_become_pictures() {
        let rw = default_rewriter(&["source/img/hero.jpg"]);
        let text = r#"<img src="source/img/hero.jpg">"#;
        assert_eq!(rw.rewrite(text), text);
    }

    #[test]
    fn custom_class() {
        let options = RewriteOptions {
            picture_class: "pic".into(),
            ..RewriteOptions::default()
        };
        let rw = rewriter(&["source/photos/sunset.jpg"], &options);
        let out = rw.rewrite(r#"<img src="source/photos/sunset.jpg">"#);
        assert!(out.starts_with(r#"<picture class="pic">"#));
    }

    // =========================================================================
    // Background
    // =========================================================================

    #[test]
    fn background_declaration_becomes_image_set() {
        let rw = default_rewriter(&["source/img/hero.jpg"]);
        let out = rw.rewrite(r#".banner { background-image: url("source/img/hero.jpg"); }"#);
        assert_eq!(out, format!(".banner {{ {HERO_BLOCK}; }}"));
    }

    #[test]
    fn background_every_occurrence() {
        let rw = default_rewriter(&["source/img/hero.jpg"]);
        let decl = r#"background-image: url("source/img/hero.jpg")"#;
        let out = rw.rewrite(&format!("a {{ {decl}; }} b {{ {decl}; }}"));
        assert_eq!(out.matches("image-set(").count(), 2);
    }

    #[test]
    fn background_match_is_exact() {
        let rw = default_rewriter(&["source/img/hero.jpg"]);
        for text in [
            r#"background-image: url('source/img/hero.jpg')"#,
            r#"background-image:url("source/img/hero.jpg")"#,
            r#"background: url("source/img/hero.jpg")"#,
        ] {
            assert_eq!(rw.rewrite(text), text);
        }
    }

    #[test]
    fn backgrounds_disabled_suppresses_substitution_and_styles() {
        let options = RewriteOptions {
            backgrounds: false,
            ..RewriteOptions::default()
        };
        let rw = rewriter(&["source/img/hero.jpg"], &options);
        let text = r#"<html><head></head><body style='background-image: url("source/img/hero.jpg")'></body></html>"#;
        assert_eq!(rw.rewrite(text), text);
        assert_eq!(rw.rule_count(), 0);
    }

    // =========================================================================
    // Support stylesheet
    // =========================================================================

    #[test]
    fn stylesheet_goes_before_first_head_close() {
        let rw = default_rewriter(&[]);
        let out = rw.rewrite("<html><head><title>t</title></head><body></body></html>");
        let style = support_stylesheet(".responsive-bg", "responsive-picture");
        assert_eq!(
            out,
            format!("<html><head><title>t</title>{style}</head><body></body></html>")
        );
    }

    #[test]
    fn stylesheet_is_not_injected_twice() {
        let rw = default_rewriter(&[]);
        let once = rw.rewrite("<head></head>");
        assert_eq!(rw.rewrite(&once), once);
        assert_eq!(once.matches(STYLE_MARKER).count(), 1);
    }

    #[test]
    fn no_head_no_stylesheet() {
        let rw = default_rewriter(&[]);
        assert_eq!(rw.rewrite(".a { color: red; }"), ".a { color: red; }");
    }

    #[test]
    fn inject_styles_off_keeps_backgrounds() {
        let options = RewriteOptions {
            inject_styles: false,
            ..RewriteOptions::default()
        };
        let rw = rewriter(&["source/img/hero.jpg"], &options);
        let out = rw.rewrite(
            r#"<head></head><div style='background-image: url("source/img/hero.jpg")'></div>"#,
        );
        assert!(!out.contains(STYLE_MARKER));
        assert!(out.contains("image-set("));
    }

    #[test]
    fn stylesheet_uses_configured_selector_and_class() {
        let style = support_stylesheet(".cover", "pic");
        assert!(style.starts_with("<style data-respimg>"));
        assert!(style.contains(".cover { background-size: cover;"));
        assert!(style.contains("picture.pic > img {"));
    }

    // =========================================================================
    // Whole-document behavior
    // =========================================================================

    #[test]
    fn rewrite_is_idempotent() {
        let rw = default_rewriter(&["source/photos/sunset.jpg", "source/img/hero.jpg"]);
        let text = concat!(
            r#"<html><head><style>.b { background-image: url("source/img/hero.jpg"); }</style></head>"#,
            r#"<body><img src="source/photos/sunset.jpg" alt="Dusk"></body></html>"#
        );
        let once = rw.rewrite(text);
        assert_ne!(once, text);
        assert_eq!(rw.rewrite(&once), once);
    }

    #[test]
    fn rule_count_per_record() {
        let registry: AssetRegistry = [
            sample_record("source/a.jpg", Classification::Foreground),
            sample_record("source/b.jpg", Classification::Foreground),
            sample_record("source/bg-c.jpg", Classification::Background),
        ]
        .into_iter()
        .collect();
        assert_eq!(Rewriter::new(&registry, &RewriteOptions::default()).rule_count(), 3);
    }

    // =========================================================================
    // URLs
    // =========================================================================

    #[test]
    fn url_relative_to_base_dir() {
        let options = RewriteOptions::default();
        assert_eq!(
            options.derivative_url(Path::new("source/photos/2024"), "a-small.webp"),
            "/photos/2024/a-small.webp"
        );
        assert_eq!(
            options.derivative_url(Path::new("source"), "a-small.webp"),
            "/a-small.webp"
        );
    }

    #[test]
    fn url_outside_base_dir_is_used_as_is() {
        let options = RewriteOptions::default();
        assert_eq!(
            options.derivative_url(Path::new("themes/x/source/img"), "bg-small.jpg"),
            "/themes/x/source/img/bg-small.jpg"
        );
    }

    #[test]
    fn url_prefix_variants() {
        let mut options = RewriteOptions {
            url_prefix: "/blog".into(),
            ..RewriteOptions::default()
        };
        assert_eq!(
            options.derivative_url(Path::new("source/img"), "a.jpg"),
            "/blog/img/a.jpg"
        );
        options.url_prefix = String::new();
        assert_eq!(
            options.derivative_url(Path::new("source/img"), "a.jpg"),
            "img/a.jpg"
        );
        options.url_prefix = "https://cdn.example.com/".into();
        assert_eq!(
            options.derivative_url(Path::new("source/img"), "a.jpg"),
            "https://cdn.example.com/img/a.jpg"
        );
    }
}
