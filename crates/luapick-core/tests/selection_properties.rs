//! Selection and range properties exercised through the public API.

use luapick_core::{
    ApiVersion, Candidate, Constraints, Family, RangeDefaults, RangeSpec, ResolveError, Version,
    parse_range, select,
};
use std::path::PathBuf;

fn candidate(path: &str, family: Family, api: (u32, u32), release: (u32, u32, u32)) -> Candidate {
    Candidate {
        path: PathBuf::from(path),
        family,
        api: ApiVersion::new(api.0, api.1).unwrap(),
        release: Version::new(release.0, release.1, release.2).unwrap(),
    }
}

#[test]
fn test_range_bounds_use_context_defaults() {
    let closed = parse_range("5.2-5.3", RangeDefaults::RELEASE).unwrap();
    assert_eq!(closed.min().encode(), 50200);
    assert_eq!(closed.max().encode(), 50399);

    let open_max = parse_range("5.2-", RangeDefaults::RELEASE).unwrap();
    assert_eq!(open_max.max(), RangeDefaults::RELEASE.max);

    let open_min = parse_range("-5.3", RangeDefaults::RELEASE).unwrap();
    assert_eq!(open_min.min(), RangeDefaults::RELEASE.min);
    assert_eq!(open_min.max().encode(), 50399);
}

#[test]
fn test_malformed_range_is_a_config_error() {
    let spec = RangeSpec::parse("5.x");
    let err: ResolveError = Constraints::from_specs(Some(&spec), None, None, false, false)
        .unwrap_err()
        .into();
    assert!(err.is_config());
    assert!(err.to_string().starts_with("configuration error"));
}

#[test]
fn test_jit_dual_range_applies_to_jit_family_only() {
    let release = RangeSpec::parse("5.1");
    let jit = RangeSpec::parse("2.1");
    let constraints =
        Constraints::from_specs(Some(&release), Some(&jit), None, false, false).unwrap();

    let jit_winner = select(
        constraints,
        vec![candidate("/a/luajit", Family::Jit, (5, 1), (2, 1, 0))],
    );
    assert!(jit_winner.is_some());

    let reference = select(
        constraints,
        vec![candidate("/a/lua", Family::Reference, (5, 1), (2, 1, 0))],
    );
    assert!(reference.is_none());
}

#[test]
fn test_equal_candidates_keep_search_order() {
    let input = vec![
        candidate("/first/lua5.4", Family::Reference, (5, 4), (5, 4, 6)),
        candidate("/second/lua5.4", Family::Reference, (5, 4), (5, 4, 6)),
    ];
    for _ in 0..3 {
        let winner = select(Constraints::default(), input.clone()).unwrap();
        assert_eq!(winner.path, PathBuf::from("/first/lua5.4"));
    }
}
