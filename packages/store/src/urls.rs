//! URL clean-up for operator input: scheme defaulting for project links and rewriting of
//! third-party share links into their direct-content form.

/// Prefix `https://` to a non-empty URL that does not start with `http://` or `https://`.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    let head = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

/// Rewrite known share-page links to a URL that serves the file itself.
///
/// - Google Drive `/file/d/<id>/view` and `open?id=<id>` become `uc?export=view&id=<id>`.
/// - Dropbox `www.dropbox.com/...` becomes `dl.dropboxusercontent.com/...` without `dl`/`raw`.
///
/// Anything else is returned trimmed but otherwise untouched.
pub fn rewrite_share_link(url: &str) -> String {
    let trimmed = url.trim();
    let Some(parts) = UrlParts::parse(trimmed) else {
        return trimmed.to_string();
    };

    match parts.host.as_str() {
        "drive.google.com" => match parts.drive_file_id() {
            Some(id) => format!("https://drive.google.com/uc?export=view&id={id}"),
            None => trimmed.to_string(),
        },
        "www.dropbox.com" | "dropbox.com" => {
            let kept: Vec<&str> = parts
                .query_pairs()
                .filter(|(key, _)| *key != "dl" && *key != "raw")
                .map(|(_, pair)| pair)
                .collect();
            if kept.is_empty() {
                format!("https://dl.dropboxusercontent.com{}", parts.path)
            } else {
                format!(
                    "https://dl.dropboxusercontent.com{}?{}",
                    parts.path,
                    kept.join("&")
                )
            }
        }
        _ => trimmed.to_string(),
    }
}

struct UrlParts<'a> {
    host: String,
    path: &'a str,
    query: &'a str,
}

impl<'a> UrlParts<'a> {
    fn parse(url: &'a str) -> Option<Self> {
        if !has_http_scheme(url) {
            return None;
        }
        let rest = &url[url.find("://")? + 3..];
        let rest = rest.split('#').next().unwrap_or(rest);
        let host_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let host = rest[..host_end].to_ascii_lowercase();
        if host.is_empty() {
            return None;
        }
        let tail = &rest[host_end..];
        let (path, query) = match tail.split_once('?') {
            Some((path, query)) => (path, query),
            None => (tail, ""),
        };
        Some(Self { host, path, query })
    }

    /// `(key, "key=value")` for every non-empty query pair.
    fn query_pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| (pair.split('=').next().unwrap_or(pair), pair))
    }

    fn drive_file_id(&self) -> Option<&'a str> {
        if let Some(rest) = self.path.strip_prefix("/file/d/") {
            let id = rest.split('/').next().unwrap_or(rest);
            return (!id.is_empty()).then_some(id);
        }
        self.query_pairs()
            .find(|(key, _)| *key == "id")
            .and_then(|(_, pair)| pair.split_once('=').map(|(_, value)| value))
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(normalize_url("github.com/me"), "https://github.com/me");
        assert_eq!(normalize_url("  me.dev "), "https://me.dev");
    }

    #[test]
    fn existing_scheme_is_kept() {
        assert_eq!(normalize_url("https://github.com/me"), "https://github.com/me");
        assert_eq!(normalize_url("http://localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn empty_link_stays_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn drive_file_link_becomes_direct() {
        let link = "https://drive.google.com/file/d/1AbC_dEf/view?usp=sharing";
        assert_eq!(
            rewrite_share_link(link),
            "https://drive.google.com/uc?export=view&id=1AbC_dEf"
        );
    }

    #[test]
    fn drive_open_link_becomes_direct() {
        let link = "https://drive.google.com/open?id=XYZ123";
        assert_eq!(
            rewrite_share_link(link),
            "https://drive.google.com/uc?export=view&id=XYZ123"
        );
    }

    #[test]
    fn dropbox_link_drops_download_flag() {
        let link = "https://www.dropbox.com/scl/fi/abc/shot.png?rlkey=k1&dl=0";
        assert_eq!(
            rewrite_share_link(link),
            "https://dl.dropboxusercontent.com/scl/fi/abc/shot.png?rlkey=k1"
        );

        let old_style = "https://www.dropbox.com/s/abc/shot.png?dl=0";
        assert_eq!(
            rewrite_share_link(old_style),
            "https://dl.dropboxusercontent.com/s/abc/shot.png"
        );
    }

    #[test]
    fn other_links_are_untouched() {
        let link = "https://cdn.example.com/img/cover.png?w=800";
        assert_eq!(rewrite_share_link(link), link);
        assert_eq!(rewrite_share_link("not a url"), "not a url");
    }
}
