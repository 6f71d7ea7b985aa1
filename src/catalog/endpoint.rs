//! Endpoint descriptor resolution.
//!
//! Categories are configured with opaque descriptors like
//! `/discover/movie?sort_by=popularity.desc&year=2024`. Splitting them here
//! keeps caller-supplied query parameters from colliding with the pagination
//! and auth parameters the client injects at request time.

use thiserror::Error;

/// A resolved endpoint: the request path plus caller-supplied query pairs.
///
/// Pairs preserve the order they appear in the descriptor. Keys and values
/// are passed through verbatim (no percent-decoding); configuration is
/// expected to supply already-safe tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("endpoint descriptor has an empty path: {0:?}")]
    EmptyPath(String),
    #[error("endpoint descriptor contains more than one '?': {0:?}")]
    MultipleQueryMarkers(String),
}

/// Split a descriptor into `(path, query pairs)`.
///
/// - No `?`: the whole descriptor is the path, query is empty.
/// - Exactly one `?`: the remainder is split on `&`, each segment on the
///   first `=`. A segment without `=` maps the key to an empty string.
///   Empty segments (`a=1&&b=2`) are skipped.
/// - An empty path or a second `?` is malformed.
pub fn resolve(descriptor: &str) -> Result<Endpoint, EndpointError> {
    if descriptor.matches('?').count() > 1 {
        return Err(EndpointError::MultipleQueryMarkers(descriptor.to_string()));
    }

    let (path, query_string) = match descriptor.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (descriptor, None),
    };

    if path.is_empty() {
        return Err(EndpointError::EmptyPath(descriptor.to_string()));
    }

    let query = query_string
        .map(|qs| {
            qs.split('&')
                .filter(|segment| !segment.is_empty())
                .map(|segment| match segment.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (segment.to_string(), String::new()),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Endpoint {
        path: path.to_string(),
        query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_path_has_no_query() {
        let endpoint = resolve("/movie/popular").unwrap();
        assert_eq!(endpoint.path, "/movie/popular");
        assert!(endpoint.query.is_empty());
    }

    #[test]
    fn splits_path_and_query_pairs() {
        let endpoint = resolve("/discover/movie?sort_by=popularity.desc&year=2024").unwrap();
        assert_eq!(endpoint.path, "/discover/movie");
        assert_eq!(
            endpoint.query,
            vec![
                ("sort_by".to_string(), "popularity.desc".to_string()),
                ("year".to_string(), "2024".to_string()),
            ]
        );
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let endpoint = resolve("/discover/movie?filter=a=b").unwrap();
        assert_eq!(endpoint.query, vec![("filter".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn segment_without_equals_maps_to_empty_value() {
        let endpoint = resolve("/movie/upcoming?region").unwrap();
        assert_eq!(endpoint.query, vec![("region".to_string(), String::new())]);
    }

    #[test]
    fn empty_segments_are_skipped() {
        let endpoint = resolve("/discover/movie?a=1&&b=2").unwrap();
        assert_eq!(
            endpoint.query,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn empty_query_string_is_allowed() {
        let endpoint = resolve("/movie/popular?").unwrap();
        assert_eq!(endpoint.path, "/movie/popular");
        assert!(endpoint.query.is_empty());
    }

    #[test]
    fn empty_path_is_malformed() {
        assert_eq!(
            resolve("?page=2"),
            Err(EndpointError::EmptyPath("?page=2".to_string()))
        );
        assert!(matches!(resolve(""), Err(EndpointError::EmptyPath(_))));
    }

    #[test]
    fn second_question_mark_is_malformed() {
        assert_eq!(
            resolve("/movie/popular?a=1?b=2"),
            Err(EndpointError::MultipleQueryMarkers(
                "/movie/popular?a=1?b=2".to_string()
            ))
        );
    }

    proptest! {
        /// Resolution never panics, and a resolved path never contains '?'.
        #[test]
        fn resolve_never_panics(descriptor in ".{0,200}") {
            if let Ok(endpoint) = resolve(&descriptor) {
                prop_assert!(!endpoint.path.contains('?'));
                prop_assert!(!endpoint.path.is_empty());
            }
        }

        /// Descriptors made of a path plus well-formed pairs resolve losslessly.
        #[test]
        fn well_formed_pairs_roundtrip(
            path in "/[a-z/]{1,20}",
            pairs in prop::collection::vec(("[a-z_]{1,10}", "[a-z0-9.]{1,10}"), 0..5),
        ) {
            let descriptor = if pairs.is_empty() {
                path.clone()
            } else {
                let qs: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("{path}?{}", qs.join("&"))
            };

            let endpoint = resolve(&descriptor).unwrap();
            prop_assert_eq!(endpoint.path, path);
            prop_assert_eq!(endpoint.query, pairs);
        }
    }
}
