use ::url::Url;

/// Resolves a hyperlink found on `page_url` into an absolute URL
///
/// # Resolution Steps
///
/// 1. Missing or blank href resolves to the page itself
/// 2. Absolute hrefs (with a scheme) are returned unchanged
/// 3. Root-relative and scheme-relative hrefs are joined against the page origin
/// 4. Otherwise, leading `../` segments are counted and stripped; that many
///    trailing segments are removed from the page's directory path (never
///    going above the root), and the remainder is joined onto it
///
/// Resolution never fails: when the page URL itself cannot be parsed the
/// href is returned as given.
///
/// # Examples
///
/// ```
/// use bookshelf::url::resolve_link;
///
/// let page = "https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";
/// assert_eq!(
///     resolve_link(page, Some("../../media/cache/fe/72/cover.jpg")),
///     "https://books.toscrape.com/media/cache/fe/72/cover.jpg"
/// );
/// ```
pub fn resolve_link(page_url: &str, href: Option<&str>) -> String {
    let href = href.map(str::trim).unwrap_or("");
    if href.is_empty() {
        return page_url.to_string();
    }

    if let Ok(absolute) = Url::parse(href) {
        return absolute.to_string();
    }

    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot resolve '{}' against '{}': {}", href, page_url, e);
            return href.to_string();
        }
    };

    if href.starts_with('/') || href.starts_with('#') || href.starts_with('?') {
        return join_or_keep(&base, href);
    }

    let (depth, remainder) = split_parent_segments(href);
    let mut directory = directory_segments(&base);
    directory.truncate(directory.len().saturating_sub(depth));

    let mut directory_url = base.clone();
    directory_url.set_query(None);
    directory_url.set_fragment(None);
    if directory.is_empty() {
        directory_url.set_path("/");
    } else {
        directory_url.set_path(&format!("/{}/", directory.join("/")));
    }

    join_or_keep(&directory_url, remainder)
}

/// Counts leading parent-directory segments and returns the rest of the href
///
/// `./` segments interleaved with the leading `../` run are skipped without
/// counting.
pub fn split_parent_segments(href: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = href;

    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            depth += 1;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if rest == ".." {
            depth += 1;
            rest = "";
        } else if rest == "." {
            rest = "";
        } else {
            break;
        }
    }

    (depth, rest)
}

/// Non-empty path segments of the directory containing the page
fn directory_segments(base: &Url) -> Vec<String> {
    let Some(segments) = base.path_segments() else {
        return Vec::new();
    };

    let mut segments: Vec<&str> = segments.collect();
    // The last segment is the page itself (empty for a trailing slash)
    segments.pop();

    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_or_keep(base: &Url, reference: &str) -> String {
    match base.join(reference) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            tracing::debug!("Failed to join '{}' onto '{}': {}", reference, base, e);
            reference.to_string()
        }
    }
}
