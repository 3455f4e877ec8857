//! Site-specific page-text extraction rules.
//!
//! The extraction itself happens in the page (a content script); this module only
//! decides which CSS selectors apply to a host and defines the collaborator seam.

use serde::{Deserialize, Serialize};

/// CSS selectors to read posting text from on a given host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRule {
    pub host: String,
    pub selectors: Vec<String>,
}

impl SiteRule {
    pub fn new(host: &str, selectors: &[&str]) -> Self {
        Self {
            host: normalize_host(host),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn applies_to(&self, host: &str) -> bool {
        host == self.host || host.ends_with(&format!(".{}", self.host))
    }
}

/// Text returned by a page-text collaborator. `ok == false` means extraction failed
/// and the caller should show a notice instead of analysing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub ok: bool,
    pub text: String,
}

impl PageText {
    pub fn failed() -> Self {
        Self::default()
    }

    /// Usable text, if extraction succeeded and produced something.
    pub fn usable_text(&self) -> Option<&str> {
        Some(self.text.as_str()).filter(|t| self.ok && !t.trim().is_empty())
    }
}

/// Supplies the visible text of a page, applying a site rule when one matches.
pub trait PageTextSource {
    fn page_text(&self, url: &str, rule: Option<&SiteRule>) -> PageText;
}

pub fn default_site_rules() -> Vec<SiteRule> {
    vec![
        SiteRule::new(
            "linkedin.com",
            &[".jobs-description__content", ".jobs-box__html-content"],
        ),
        SiteRule::new("indeed.com", &["#jobDescriptionText"]),
        SiteRule::new("greenhouse.io", &["#content", ".job__description"]),
        SiteRule::new("lever.co", &[".posting-page .section-wrapper"]),
        SiteRule::new("workdayjobs.com", &["[data-automation-id='jobPostingDescription']"]),
    ]
}

/// Lower-cases and strips scheme, credentials, path, port and a leading `www.`.
pub fn normalize_host(input: &str) -> String {
    let without_scheme = input
        .trim()
        .split_once("://")
        .map_or(input.trim(), |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default().to_ascii_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// The rule for `host_or_url`, preferring the most specific (longest) host.
pub fn rule_for_host<'a>(rules: &'a [SiteRule], host_or_url: &str) -> Option<&'a SiteRule> {
    let host = normalize_host(host_or_url);
    rules
        .iter()
        .filter(|rule| rule.applies_to(&host))
        .max_by_key(|rule| rule.host.len())
}

/// Fetches page text through `source` using the matching rule, logging failures.
pub fn fetch_posting_text(
    source: &dyn PageTextSource,
    rules: &[SiteRule],
    url: &str,
) -> Option<String> {
    let rule = rule_for_host(rules, url);
    let page = source.page_text(url, rule);
    match page.usable_text() {
        Some(text) => Some(text.to_string()),
        None => {
            tracing::warn!(url, rule = ?rule.map(|r| &r.host), "page text unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(PageText);

    impl PageTextSource for FixedSource {
        fn page_text(&self, _url: &str, rule: Option<&SiteRule>) -> PageText {
            let mut page = self.0.clone();
            if let Some(rule) = rule {
                page.text = format!("{} via {}", page.text, rule.selectors[0]);
            }
            page
        }
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("https://www.LinkedIn.com/jobs/view/1"), "linkedin.com");
        assert_eq!(normalize_host("boards.greenhouse.io:443"), "boards.greenhouse.io");
        assert_eq!(normalize_host("http://user@example.com?q=1"), "example.com");
    }

    #[test]
    fn test_rule_matches_subdomains() {
        let rules = default_site_rules();
        let rule = rule_for_host(&rules, "https://boards.greenhouse.io/acme/jobs/1").unwrap();
        assert_eq!(rule.host, "greenhouse.io");
    }

    #[test]
    fn test_rule_does_not_match_lookalike_host() {
        let rules = default_site_rules();
        assert!(rule_for_host(&rules, "notindeed.com").is_none());
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let rules = vec![
            SiteRule::new("example.com", &["body"]),
            SiteRule::new("jobs.example.com", &["#posting"]),
        ];
        let rule = rule_for_host(&rules, "jobs.example.com").unwrap();
        assert_eq!(rule.selectors, vec!["#posting"]);
    }

    #[test]
    fn test_fetch_applies_rule_and_rejects_failures() {
        let rules = default_site_rules();
        let ok = FixedSource(PageText {
            ok: true,
            text: "Posting".to_string(),
        });
        assert_eq!(
            fetch_posting_text(&ok, &rules, "https://www.indeed.com/viewjob").as_deref(),
            Some("Posting via #jobDescriptionText")
        );

        let failed = FixedSource(PageText::failed());
        assert_eq!(fetch_posting_text(&failed, &rules, "https://x.org"), None);
    }
}
