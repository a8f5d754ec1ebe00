use super::catalog::{Category, Condition, Rule, RuleCatalog, ScoringWeights, Severity};

pub const DEFAULT_CATALOG_VERSION: &str = "1.0.0";
pub const ENGINE_NAME: &str = "seo-health";

impl Default for RuleCatalog {
    fn default() -> Self {
        Self {
            version: DEFAULT_CATALOG_VERSION.to_string(),
            engine: ENGINE_NAME.to_string(),
            scoring: ScoringWeights::default(),
            categories: vec![
                common_seo(),
                speed(),
                security(),
                mobile(),
                advanced(),
            ],
        }
    }
}

fn common_seo() -> Category {
    Category {
        id: "common_seo".to_string(),
        name: "Common SEO".to_string(),
        max_points: 30,
        rules: vec![
            Rule::with_thresholds(
                "title_length",
                Severity::High,
                "Page title is missing or not between 30 and 65 characters",
                "Write a unique, descriptive title of 30-65 characters that leads with the main keyword",
                Condition::new("title.length", "between", [30.0, 65.0]),
                Some(Condition::new("title.length", "between", [10.0, 80.0])),
            ),
            Rule::with_thresholds(
                "meta_description",
                Severity::High,
                "Meta description is missing or not between 70 and 160 characters",
                "Add a meta description of 70-160 characters summarising the page",
                Condition::new("metaDescription.length", "between", [70.0, 160.0]),
                Some(Condition::new("metaDescription.length", "between", [50.0, 200.0])),
            ),
            Rule::with_checks(
                "single_h1",
                Severity::Medium,
                "Page does not have exactly one H1 heading",
                "Use a single H1 that states the topic of the page",
                vec![Condition::new("headings.h1Count", "equals", 1.0)],
            ),
            Rule::with_checks(
                "heading_hierarchy",
                Severity::Low,
                "Heading levels skip or appear out of order",
                "Nest headings in order (H1, then H2, then H3) without skipping levels",
                vec![Condition::new("headings.hierarchyValid", "equals", true)],
            ),
            Rule::with_thresholds(
                "image_alt_text",
                Severity::Medium,
                "Images are missing alt text",
                "Add descriptive alt attributes to every meaningful image",
                Condition::new("images.altCoverage", "gte", 90.0),
                Some(Condition::new("images.altCoverage", "gte", 70.0)),
            ),
            Rule::with_checks(
                "canonical_tag",
                Severity::Medium,
                "Canonical link is missing",
                "Declare a rel=\"canonical\" link pointing at the preferred URL",
                vec![Condition::new("links.canonicalPresent", "equals", true)],
            ),
            Rule::with_checks(
                "indexable",
                Severity::High,
                "Page is blocked from indexing",
                "Remove noindex directives and robots.txt rules that block this page",
                vec![
                    Condition::new("robots.indexable", "equals", true),
                    Condition::new("robots.allowedByRobotsTxt", "equals", true),
                ],
            ),
            Rule::with_checks(
                "sitemap",
                Severity::Low,
                "No XML sitemap was found",
                "Publish a sitemap.xml and reference it from robots.txt",
                vec![Condition::new("crawl.sitemapFound", "equals", true)],
            ),
            Rule::with_thresholds(
                "content_length",
                Severity::Medium,
                "Page has thin content",
                "Expand the main content to at least 300 words of useful text",
                Condition::new("content.wordCount", "gte", 300.0),
                Some(Condition::new("content.wordCount", "gte", 150.0)),
            ),
        ],
    }
}

fn speed() -> Category {
    Category {
        id: "speed".to_string(),
        name: "Speed & Performance".to_string(),
        max_points: 25,
        rules: vec![
            Rule::with_thresholds(
                "html_size",
                Severity::Medium,
                "HTML document is too large",
                "Minify markup and move inline scripts and styles to external files",
                Condition::new("html.sizeKb", "lt", 100.0),
                Some(Condition::new("html.sizeKb", "lt", 250.0)),
            ),
            Rule::with_thresholds(
                "response_time",
                Severity::High,
                "Server response time is slow",
                "Reduce time to first byte with caching, a CDN or faster backend queries",
                Condition::new("performance.ttfbMs", "lt", 600.0),
                Some(Condition::new("performance.ttfbMs", "lt", 1500.0)),
            ),
            Rule::with_thresholds(
                "request_count",
                Severity::Low,
                "Page makes too many HTTP requests",
                "Bundle assets and remove unused third-party resources",
                Condition::new("performance.requestCount", "lte", 50.0),
                Some(Condition::new("performance.requestCount", "lte", 100.0)),
            ),
            Rule::with_checks(
                "compression",
                Severity::Medium,
                "Text responses are not compressed",
                "Enable gzip or brotli compression on the server",
                vec![Condition::new("performance.compressionEnabled", "equals", true)],
            ),
            Rule::with_thresholds(
                "render_blocking",
                Severity::Low,
                "Render-blocking resources delay first paint",
                "Defer non-critical scripts and inline critical CSS",
                Condition::new("performance.renderBlockingResources", "lte", 2.0),
                Some(Condition::new("performance.renderBlockingResources", "lte", 5.0)),
            ),
        ],
    }
}

fn security() -> Category {
    Category {
        id: "security".to_string(),
        name: "Security".to_string(),
        max_points: 20,
        rules: vec![
            Rule::with_checks(
                "https",
                Severity::High,
                "Page is not served over HTTPS",
                "Install a TLS certificate and redirect all HTTP traffic to HTTPS",
                vec![Condition::new("security.https", "equals", true)],
            ),
            Rule::with_checks(
                "mixed_content",
                Severity::Medium,
                "Page loads insecure resources over HTTP",
                "Serve every script, stylesheet and image over HTTPS",
                vec![Condition::new("security.mixedContentCount", "equals", 0.0)],
            ),
            Rule::with_checks(
                "hsts",
                Severity::Low,
                "Strict-Transport-Security header is missing",
                "Send an HSTS header with a max-age of at least six months",
                vec![Condition::new("security.hstsEnabled", "equals", true)],
            ),
            Rule::with_checks(
                "security_headers",
                Severity::Low,
                "Recommended security headers are missing",
                "Send X-Content-Type-Options: nosniff and an X-Frame-Options header",
                vec![
                    Condition::new("security.contentTypeOptions", "equals", true),
                    Condition::new("security.frameOptions", "equals", true),
                ],
            ),
        ],
    }
}

fn mobile() -> Category {
    Category {
        id: "mobile".to_string(),
        name: "Mobile Usability".to_string(),
        max_points: 15,
        rules: vec![
            Rule::with_checks(
                "viewport",
                Severity::High,
                "Viewport meta tag is missing",
                "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
                vec![Condition::new("mobile.viewportPresent", "equals", true)],
            ),
            Rule::with_thresholds(
                "legible_fonts",
                Severity::Medium,
                "Text is too small to read on mobile",
                "Use a base font size of at least 16px",
                Condition::new("mobile.legibleFontRatio", "gte", 95.0),
                Some(Condition::new("mobile.legibleFontRatio", "gte", 80.0)),
            ),
            Rule::with_thresholds(
                "tap_targets",
                Severity::Low,
                "Tap targets are too small or too close together",
                "Make buttons and links at least 48px and space them apart",
                Condition::new("mobile.tapTargetIssues", "equals", 0.0),
                Some(Condition::new("mobile.tapTargetIssues", "lte", 3.0)),
            ),
        ],
    }
}

fn advanced() -> Category {
    Category {
        id: "advanced".to_string(),
        name: "Advanced SEO".to_string(),
        max_points: 10,
        rules: vec![
            Rule::with_checks(
                "structured_data",
                Severity::Medium,
                "No structured data was found",
                "Describe the page with schema.org JSON-LD",
                vec![Condition::new("advanced.structuredDataPresent", "equals", true)],
            ),
            Rule::with_checks(
                "open_graph",
                Severity::Low,
                "Open Graph tags are missing",
                "Add og:title, og:description and og:image for social sharing",
                vec![Condition::new("social.openGraphPresent", "equals", true)],
            ),
            Rule::with_checks(
                "lang_attribute",
                Severity::Low,
                "The html element has no lang attribute",
                "Declare the page language, e.g. <html lang=\"en\">",
                vec![Condition::new("advanced.langPresent", "equals", true)],
            ),
            Rule::with_thresholds(
                "url_length",
                Severity::Low,
                "URL is long",
                "Keep URLs short, readable and free of tracking parameters",
                Condition::new("url.length", "lte", 75.0),
                Some(Condition::new("url.length", "lte", 115.0)),
            ),
            Rule::with_checks(
                "keyword_density",
                Severity::Low,
                "Main keyword density looks unnatural",
                "Write for readers; keep the main keyword between 0.5% and 3% of the text",
                vec![Condition::new("content.keywordDensity", "between", [0.5, 3.0])],
            ),
        ],
    }
}
