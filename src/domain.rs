//! Checks that a drop is viewed on the domain it was shared on.
//!
//! Drops can be shared on their owner's custom domain. Without this check, one user's custom domain
//! could serve any other user's drops.

use reqwest::Url;

/// The prefix stripped from the request's host before comparing it to a drop's domain.
const WWW_PREFIX: &str = "www.";

/// Returns whether a drop with the specified share URL may be served to a request with the
/// specified `Host` header.
///
/// The default domains may serve any drop. Otherwise, the request's host must be the drop's
/// domain, optionally prefixed with `www.`. Both hosts are compared in their lowercase ASCII
/// (Punycode) forms, so internationalized domains match however they're written.
pub(crate) fn matches(
    share_url: Option<&str>,
    host: Option<&str>,
    default_domains: &[String],
) -> bool {
    let Some(actual) = host.and_then(|host| host.split(':').next()).and_then(to_ascii) else {
        return false;
    };

    if default_domains.iter().any(|domain| *domain == actual) {
        return true;
    }

    let Some(expected) = share_url
        .and_then(share_url_domain)
        .and_then(|domain| to_ascii(&domain))
    else {
        return false;
    };

    actual == expected || actual.strip_prefix(WWW_PREFIX) == Some(expected.as_str())
}

/// Extracts the host from a share URL.
fn share_url_domain(share_url: &str) -> Option<String> {
    Url::parse(share_url).ok()?.host_str().map(str::to_owned)
}

/// Converts a domain name to its lowercase ASCII form, or `None` if it isn't a valid domain.
pub(crate) fn to_ascii(domain: &str) -> Option<String> {
    if domain.is_empty() {
        return None;
    }

    idna::domain_to_ascii(domain)
        .ok()
        .map(|domain| domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Domains that can serve any drop.
    fn default_domains() -> Vec<String> {
        vec!["cl.ly".into(), "www.cl.ly".into()]
    }

    #[test]
    fn default_domains_serve_any_drop() {
        let share_url = Some("http://drops.example.com/hhgttg");

        assert!(matches(share_url, Some("cl.ly"), &default_domains()), "cl.ly should match");
        assert!(
            matches(share_url, Some("www.cl.ly:80"), &default_domains()),
            "www.cl.ly with a port should match"
        );
        assert!(
            matches(None, Some("CL.LY"), &default_domains()),
            "default domain should match without a share URL"
        );
    }

    #[test]
    fn custom_domains() {
        let share_url = Some("http://drops.example.com/hhgttg");

        for host in [
            "drops.example.com",
            "DROPS.Example.COM",
            "drops.example.com:8080",
            "www.drops.example.com",
        ] {
            assert!(matches(share_url, Some(host), &default_domains()), "{host} should match");
        }

        for host in ["example.com", "other.example.com", "drops.example.com.evil.test"] {
            assert!(!matches(share_url, Some(host), &default_domains()), "{host} shouldn't match");
        }
    }

    #[test]
    fn www_is_only_stripped_from_the_request() {
        let share_url = Some("http://www.example.com/hhgttg");

        assert!(
            !matches(share_url, Some("example.com"), &default_domains()),
            "bare domain shouldn't serve a www share URL"
        );
    }

    #[test]
    fn internationalized_domains() {
        let share_url = Some("http://xn--exampl-gva.com/hhgttg");

        for host in ["examplé.com", "EXAMPLÉ.COM", "example\u{0301}.com", "www.examplé.com"] {
            assert!(matches(share_url, Some(host), &default_domains()), "{host} should match");
        }

        let share_url = Some("http://examplé.com/hhgttg");

        assert!(
            matches(share_url, Some("xn--exampl-gva.com"), &default_domains()),
            "Punycode host should match a Unicode share URL"
        );
    }

    #[test]
    fn missing_hosts_never_match() {
        let share_url = Some("http://drops.example.com/hhgttg");

        assert!(!matches(share_url, None, &default_domains()), "no host shouldn't match");
        assert!(!matches(share_url, Some(""), &default_domains()), "empty host shouldn't match");
        assert!(
            !matches(None, Some("drops.example.com"), &default_domains()),
            "no share URL shouldn't match a custom domain"
        );
        assert!(
            !matches(Some("not a url"), Some("drops.example.com"), &default_domains()),
            "invalid share URL shouldn't match"
        );
    }
}
