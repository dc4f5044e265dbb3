// tests/layers.rs

//! Layer closure and include/exclude rules over whole layer graphs.

mod common;

use common::{config, graph, layer, sorted};
use fpack::config::ConfigModel;
use fpack::layers::LayerDirective;

#[test]
fn test_optional_cycle_is_visited_once() {
    let graph = graph(vec![layer("D", &[("E", true)]), layer("E", &[("D", true)])]);

    let config = graph.include(&config(), "D").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(resolution.active().len(), 2);
    assert_eq!(sorted(resolution.active()), vec!["D", "E"]);
    assert!(resolution.excluded().is_empty());
}

#[test]
fn test_exclude_only_transitive_dependencies() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("A", &[("base", false), ("B", true)]),
        layer("B", &[("base", false)]),
        layer("C", &[("base", false)]),
    ]);

    // B is not reachable from C
    let only_c = graph.include(&config(), "C").unwrap();
    let err = graph.exclude(&only_c, "B").unwrap_err();
    assert!(err.is_description());
    assert!(err.to_string().contains("not a dependency"));

    let with_a = graph.include(&only_c, "A").unwrap();
    assert!(graph.resolve(&with_a).unwrap().is_active("B"));

    let without_b = graph.exclude(&with_a, "B").unwrap();
    let resolution = graph.resolve(&without_b).unwrap();
    assert_eq!(sorted(resolution.active()), vec!["A", "C", "base"]);
    assert_eq!(resolution.excluded(), ["B".to_string()]);
    assert!(resolution.dropped().is_empty());

    let err = graph.exclude(&without_b, "base").unwrap_err();
    assert!(err.is_description());
    assert!(err.to_string().contains("required by included layer"));
}

#[test]
fn test_shared_base_survives_removal() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("A", &[("base", false)]),
        layer("B", &[("base", false)]),
    ]);

    let mut config = config();
    for name in ["A", "B"] {
        config = graph.include(&config, name).unwrap();
    }
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(resolution.active(), ["base", "A", "B"].map(String::from));

    // an explicit inclusion has to be removed rather than excluded
    assert!(graph.exclude(&config, "B").unwrap_err().is_description());

    let config = graph.remove_included(&config, "B").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(resolution.active(), ["base", "A"].map(String::from));
}

#[test]
fn test_exclusion_cascades_to_dependents() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("X", &[("base", false)]),
        layer("Y", &[("X", false)]),
        layer("Z", &[("base", false), ("Y", true)]),
    ]);

    let config = graph.include(&config(), "Z").unwrap();
    assert_eq!(graph.resolve(&config).unwrap().active(), ["base", "X", "Y", "Z"].map(String::from));

    let config = graph.exclude(&config, "X").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(resolution.active(), ["base", "Z"].map(String::from));
    assert_eq!(resolution.dropped(), ["Y".to_string()]);

    let config = graph.unexclude(&config, "X").unwrap();
    assert_eq!(graph.resolve(&config).unwrap().active().len(), 4);
}

#[test]
fn test_directives_in_sequence() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("web", &[("base", false), ("metrics", true)]),
        layer("metrics", &[]),
    ]);

    let mut config = config();
    for text in ["web", "-metrics", "+metrics", "-metrics"] {
        let directive = LayerDirective::parse(text).unwrap();
        config = graph.apply(&config, &directive).unwrap();
    }
    assert!(config.is_layer_excluded("metrics"));
    assert_eq!(graph.resolve(&config).unwrap().active(), ["base", "web"].map(String::from));

    let err = graph
        .apply(&config, &LayerDirective::parse("+base").unwrap())
        .unwrap_err();
    assert!(err.is_description());

    let err = graph
        .apply(&config, &LayerDirective::parse("missing").unwrap())
        .unwrap_err();
    assert!(err.is_resolution());
}

#[test]
fn test_cascade_releases_orphaned_dependencies() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("extra", &[]),
        layer("mid", &[("base", false), ("extra", true)]),
        layer("top", &[("mid", true)]),
    ]);

    let config = graph.include(&config(), "top").unwrap();
    assert_eq!(graph.resolve(&config).unwrap().active().len(), 4);

    // extra was only reachable through mid
    let config = graph.exclude(&config, "base").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(resolution.active(), ["top".to_string()]);
    assert_eq!(resolution.excluded(), ["base".to_string()]);
    assert_eq!(resolution.dropped(), ["mid".to_string()]);
}

#[test]
fn test_cascade_keeps_shared_dependencies() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("tools", &[]),
        layer("extra", &[("tools", false)]),
        layer("mid", &[("base", false), ("extra", true)]),
        layer("web", &[("extra", true)]),
        layer("top", &[("mid", true), ("web", true)]),
    ]);

    let config = graph.include(&config(), "top").unwrap();
    let config = graph.exclude(&config, "base").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(sorted(resolution.active()), vec!["extra", "tools", "top", "web"]);
    assert_eq!(resolution.dropped(), ["mid".to_string()]);

    let config = graph.unexclude(&config, "base").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert!(resolution.is_active("mid"));
    assert!(resolution.dropped().is_empty());
}

#[test]
fn test_cascade_through_required_chain() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("c", &[("base", false)]),
        layer("b", &[("c", false)]),
        layer("a", &[("b", false)]),
        layer("top", &[("a", true)]),
    ]);

    let config = graph.include(&config(), "top").unwrap();
    let config = graph.exclude(&config, "base").unwrap();
    let resolution = graph.resolve(&config).unwrap();
    assert_eq!(resolution.active(), ["top".to_string()]);
    assert_eq!(resolution.dropped(), ["c", "b", "a"].map(String::from));
}

#[test]
fn test_transitive_requirement_blocks_exclusion() {
    let graph = graph(vec![
        layer("disk", &[]),
        layer("db", &[("disk", false)]),
        layer("svc", &[("db", false)]),
        layer("app", &[("svc", false)]),
    ]);

    let config = graph.include(&config(), "app").unwrap();
    for name in ["svc", "db", "disk"] {
        let err = graph.exclude(&config, name).unwrap_err();
        assert!(err.is_description(), "{} should be rejected as required", name);
        assert!(err.to_string().contains("required by included layer app"));
    }
    assert_eq!(config.excluded_layers().count(), 0);
}

#[test]
fn test_resolution_ignores_layer_inheritance_flag() {
    let graph = graph(vec![
        layer("base", &[]),
        layer("web", &[("base", false), ("metrics", true)]),
        layer("metrics", &[]),
    ]);

    let inherited = graph.include(&config(), "web").unwrap();
    let inherited = graph.exclude(&inherited, "metrics").unwrap();
    assert!(inherited.is_inherit_layers());

    let mut builder = ConfigModel::builder_from(&inherited);
    builder.set_inherit_layers(false);
    let standalone = builder.build();
    assert!(!standalone.is_inherit_layers());

    assert_eq!(
        graph.resolve(&inherited).unwrap(),
        graph.resolve(&standalone).unwrap()
    );
}
