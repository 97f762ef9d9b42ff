use once_cell::sync::Lazy;
use url::Url;

static BASE: Lazy<Option<Url>> = Lazy::new(|| Url::parse("http://localhost/").ok());

/// Reads the `highlight` query parameter from a document location.
///
/// `location` may be an absolute URL or a path with a query string
/// (`/chart/Markets?highlight=1234567`). Empty values count as absent.
pub fn highlight_from_location(location: &str) -> Option<String> {
    let base = BASE.as_ref()?;
    let url = base.join(location.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "highlight")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
