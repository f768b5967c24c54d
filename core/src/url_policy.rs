use url::Url;

/// Path extensions we are willing to fetch; anything else with an extension is skipped.
const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "shtml", "php", "asp", "aspx", "jsp"];

/// Decides which discovered urls the crawler may follow.
///
/// A url is internal when it shares the seed's scheme, host and port and its path sits under the
/// seed's directory.
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    scheme: String,
    host: String,
    port: Option<u16>,
    prefix: String,
}

impl UrlPolicy {
    /// Builds the policy around a seed. Returns `None` when the seed does not normalize.
    pub fn for_seed(seed: &str) -> Option<Self> {
        let url = Url::parse(&Self::normalize(seed)?).ok()?;
        let path = url.path();
        let prefix = match path.rfind('/') {
            Some(i) => path[..=i].to_string(),
            None => "/".to_string(),
        };
        Some(Self {
            scheme: url.scheme().to_string(),
            host: url.host_str()?.to_ascii_lowercase(),
            port: url.port_or_known_default(),
            prefix,
        })
    }

    /// Canonical form of `raw`: http(s) only, fragment removed, page-like paths only.
    pub fn normalize(raw: &str) -> Option<String> {
        let mut url = Url::parse(raw.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return None;
        }
        url.set_fragment(None);
        let last = url.path_segments().and_then(|mut s| s.next_back()).unwrap_or("");
        if let Some((_, ext)) = last.rsplit_once('.') {
            if !PAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                return None;
            }
        }
        Some(url.to_string())
    }

    pub fn is_internal(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else { return false };
        url.scheme() == self.scheme
            && url.host_str().map(|h| h.eq_ignore_ascii_case(&self.host)).unwrap_or(false)
            && url.port_or_known_default() == self.port
            && url.path().starts_with(&self.prefix)
    }
}
