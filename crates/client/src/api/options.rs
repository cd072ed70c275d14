//! Query-string encoding for optional parameter records
//!
//! Parameter records describe themselves through [`QueryParams`]; there is no
//! reflection. Absence is expressed with `Option`, so "no parameters" and
//! "parameters that happen to be empty" stay distinct.

use std::collections::BTreeMap;

use url::Url;

use super::errors::ApiError;

/// A record that renders itself as query key/value pairs.
pub trait QueryParams {
    /// Pairs to encode. Order does not matter; output is canonicalised.
    fn query_pairs(&self) -> Vec<(String, String)>;
}

impl QueryParams for BTreeMap<String, String> {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl QueryParams for Vec<(String, String)> {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.clone()
    }
}

/// Replace the query component of `path` with the encoding of `params`.
///
/// `None` returns `path` untouched. Keys are sorted (stably, so repeated keys
/// keep their relative order) and form-urlencoded. Relative paths stay
/// relative and fragments are preserved.
///
/// # Errors
/// Returns `ApiError::Url` when `path` is not a parseable URL reference.
pub fn add_options<P>(path: &str, params: Option<&P>) -> Result<String, ApiError>
where
    P: QueryParams + ?Sized,
{
    let Some(params) = params else {
        return Ok(path.to_string());
    };

    let query = encode_query(params);

    match Url::parse(path) {
        Ok(mut url) => {
            url.set_query((!query.is_empty()).then_some(query.as_str()));
            Ok(url.into())
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://relative.invalid/")
                .and_then(|base| base.join(path))
                .map_err(|source| ApiError::url(path, source))?;
            Ok(splice_query(path, &query))
        }
        Err(source) => Err(ApiError::url(path, source)),
    }
}

/// Canonical query string for `params`, without the leading `?`.
pub fn encode_query<P: QueryParams + ?Sized>(params: &P) -> String {
    let mut pairs = params.query_pairs();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    url::form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs.iter()).finish()
}

fn splice_query(path: &str, query: &str) -> String {
    let (rest, fragment) = match path.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (path, None),
    };
    let base = rest.split_once('?').map_or(rest, |(base, _)| base);

    let mut out = String::with_capacity(path.len() + query.len() + 1);
    out.push_str(base);
    if !query.is_empty() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
