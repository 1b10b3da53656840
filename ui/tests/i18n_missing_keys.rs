//! Every locale must define every message the en-US fallback defines, once.
//!
//! Keys are found with a line heuristic (`key =` at the start of a line),
//! which is enough for the flat message files this crate ships.

use std::collections::{BTreeSet, HashMap};

const FALLBACK: (&str, &str) = ("en-US", include_str!("../i18n/en-US/kaizen-ui.ftl"));

const LOCALES: &[(&str, &str)] = &[("es-ES", include_str!("../i18n/es-ES/kaizen-ui.ftl"))];

fn message_keys(src: &str) -> Vec<&str> {
    src.lines()
        .filter(|line| !line.starts_with([' ', '\t', '#', '.', '[', '*', '}']))
        .filter_map(|line| line.split_once('='))
        .map(|(key, _)| key.trim())
        .filter(|key| !key.is_empty() && !key.contains(char::is_whitespace))
        .collect()
}

fn duplicates<'a>(keys: &[&'a str]) -> BTreeSet<&'a str> {
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(*key).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(key, _)| key)
        .collect()
}

#[test]
fn fallback_is_non_empty_and_unique() {
    let keys = message_keys(FALLBACK.1);
    assert!(!keys.is_empty(), "{} defines no messages", FALLBACK.0);
    assert!(duplicates(&keys).is_empty(), "duplicate keys in {}: {:?}", FALLBACK.0, duplicates(&keys));
}

#[test]
fn all_locales_have_all_fallback_keys() {
    let expected: BTreeSet<&str> = message_keys(FALLBACK.1).into_iter().collect();

    let failures: Vec<String> = LOCALES
        .iter()
        .filter_map(|(locale, src)| {
            let keys = message_keys(src);
            let dups = duplicates(&keys);
            let present: BTreeSet<&str> = keys.into_iter().collect();
            let missing: Vec<&str> = expected.difference(&present).copied().collect();

            (!missing.is_empty() || !dups.is_empty())
                .then(|| format!("{locale}: missing {missing:?}, duplicated {dups:?}"))
        })
        .collect();

    assert!(failures.is_empty(), "translation check failed:\n{}", failures.join("\n"));
}

#[test]
fn compile_time_domain_matches_bundle_files() {
    let config = include_str!("../i18n.toml");
    let domain = config
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "domain")
        .map(|(_, value)| value.trim().trim_matches('"'));
    assert_eq!(domain, Some("kaizen-ui"), "i18n.toml must name the kaizen-ui.ftl bundles");
}
