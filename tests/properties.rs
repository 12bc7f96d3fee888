// ABOUTME: Property tests for tag sanitization, key building, environment prefixes, fingerprints.

use ci_deploy::config::Environment;
use ci_deploy::sync::ContentFingerprint;
use ci_deploy::types::{
    CommitId, MAX_TAG_VALUE_LEN, ObjectKey, RepositoryUri, sanitize_tag_value,
};
use proptest::prelude::*;
use std::path::PathBuf;

fn allowed(c: char) -> bool {
    c.is_alphanumeric() || " +-=._:/@".contains(c)
}

proptest! {
    #[test]
    fn sanitized_values_fit_the_tag_grammar(value in any::<String>()) {
        let clean = sanitize_tag_value(&value);
        prop_assert!(clean.chars().count() <= MAX_TAG_VALUE_LEN);
        prop_assert!(clean.chars().all(allowed));
    }

    #[test]
    fn sanitizing_is_idempotent(value in any::<String>()) {
        let once = sanitize_tag_value(&value);
        prop_assert_eq!(sanitize_tag_value(&once), once);
    }

    #[test]
    fn keys_have_no_empty_segments(
        prefix in "(/?[a-z0-9]{0,4}){0,3}/?",
        parts in prop::collection::vec("[a-zA-Z0-9 ._-]{1,8}", 1..4),
    ) {
        prop_assume!(parts.iter().all(|p| p != "." && p != ".."));
        let relative: PathBuf = parts.iter().collect();

        let key = ObjectKey::join(&prefix, &relative).unwrap();

        prop_assert!(!key.as_str().starts_with('/'));
        prop_assert!(!key.as_str().ends_with('/'));
        prop_assert!(!key.as_str().contains("//"));
        prop_assert!(key.as_str().ends_with(parts.last().unwrap().as_str()));
        prop_assert!(key.cdn_path().starts_with('/'));
    }

    #[test]
    fn prefixed_variable_is_exposed_unprefixed(
        prefix in "[A-Z][A-Z0-9]{0,6}",
        name in "[A-Z][A-Z0-9_]{0,10}",
        value in "[a-z0-9]{1,10}",
    ) {
        let env = Environment::from_vars([
            (name.clone(), "original".to_string()),
            (format!("{prefix}_{name}"), value.clone()),
        ]);

        let resolved = env.with_prefix(&prefix.to_lowercase());

        prop_assert_eq!(resolved.get(&name), Some(value.as_str()));
    }

    #[test]
    fn image_is_uri_colon_commit(commit in "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,40}") {
        let uri = RepositoryUri::parse("registry.example.com/team/web").unwrap();
        let commit = CommitId::new(&commit).unwrap();
        prop_assert_eq!(
            uri.image_for(&commit),
            format!("registry.example.com/team/web:{}", commit)
        );
    }

    #[test]
    fn fingerprint_matches_its_own_etag(body in prop::collection::vec(any::<u8>(), 0..512)) {
        let fingerprint = ContentFingerprint::of_bytes(&body);
        let etag = format!("\"{}\"", fingerprint.as_hex());
        prop_assert!(fingerprint.matches_etag(&etag));
        let multipart = format!("\"{}-2\"", fingerprint.as_hex());
        prop_assert!(!fingerprint.matches_etag(&multipart));
    }
}
