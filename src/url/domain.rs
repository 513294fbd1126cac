use url::{Host, Url};

/// Label dropped from every domain part
const WWW: &str = "www";

/// Extracts the domain a link points at, minus any `www` part
///
/// The host is split into subdomain, domain label and public suffix using the Public
/// Suffix List. Parts that are empty or exactly `www` are dropped and the rest are joined
/// with `.`. IP addresses are returned unchanged.
///
/// Malformed input never fails: the best host that can be recovered is used, and a link
/// with no recognisable host yields an empty string.
///
/// # Examples
///
/// ```
/// use drudge_links::url::registrable_domain;
///
/// assert_eq!(registrable_domain("http://www.example.com/x"), "example.com");
/// assert_eq!(registrable_domain("http://sub.example.co.uk/y"), "sub.example.co.uk");
/// assert_eq!(registrable_domain("not a url"), "");
/// ```
pub fn registrable_domain(link: &str) -> String {
    let host = match extract_host(link) {
        Some(host) => host,
        None => return String::new(),
    };

    if is_ip_address(&host) {
        return host;
    }

    let host = host.trim_end_matches('.');
    let suffix = psl::suffix_str(host).unwrap_or("");

    let (subdomain, label) = match psl::domain_str(host) {
        Some(registrable) => {
            let subdomain = host
                .strip_suffix(registrable)
                .unwrap_or("")
                .trim_end_matches('.');
            let label = registrable
                .strip_suffix(suffix)
                .unwrap_or(registrable)
                .trim_end_matches('.');
            (subdomain, label)
        }
        // The host is itself a public suffix
        None => ("", ""),
    };

    let suffix = if label.is_empty() && subdomain.is_empty() {
        host
    } else {
        suffix
    };

    [subdomain, label, suffix]
        .into_iter()
        .filter(|part| !part.is_empty() && *part != WWW)
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns the lowercase host of a link
///
/// Absolute URLs are parsed properly. Anything else falls back to a lenient scan:
/// the scheme, userinfo, port, path, query and fragment are stripped from the text.
///
/// # Examples
///
/// ```
/// use drudge_links::url::extract_host;
///
/// assert_eq!(extract_host("https://EXAMPLE.com:8080/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("example.com/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("/relative/path"), None);
/// ```
pub fn extract_host(link: &str) -> Option<String> {
    let link = link.trim();

    if let Ok(url) = Url::parse(link) {
        if let Some(host) = url.host_str() {
            return Some(host.to_lowercase());
        }
    }

    let rest = link.split_once("://").map(|(_, rest)| rest).unwrap_or(link);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    let host = authority.split(':').next().unwrap_or("").trim();

    if host.is_empty() || host.contains(char::is_whitespace) {
        None
    } else {
        Some(host.to_lowercase())
    }
}

fn is_ip_address(host: &str) -> bool {
    matches!(Host::parse(host), Ok(Host::Ipv4(_)) | Ok(Host::Ipv6(_)))
}
