// tests/provisioning.rs

//! Dependency aggregate behavior through the provisioning config builder.

mod common;

use common::{direct, fpl, transitive};
use fpack::config::{ConfigCustomizationsEdit, ConfigId};
use fpack::fp::{FeaturePackConfig, FeaturePackDepsEdit};
use fpack::location::UniverseSpec;
use fpack::provisioning::ProvisioningConfig;

#[test]
fn test_producer_is_direct_or_transitive() {
    let mut builder = ProvisioningConfig::builder();
    builder
        .add_transitive_dep(None, transitive("core@u(r):1.x#1.0"))
        .unwrap();
    let err = builder
        .add_feature_pack_dep(None, direct("core@u(r):1.x#1.0"))
        .unwrap_err();
    assert!(err.is_description());

    let mut builder = ProvisioningConfig::builder();
    builder
        .add_feature_pack_dep(None, direct("core@u(r):1.x#1.0"))
        .unwrap();
    assert!(
        builder
            .add_transitive_dep(None, transitive("core@u(r):1.x#1.0"))
            .unwrap_err()
            .is_description()
    );
    assert!(
        builder
            .add_feature_pack_dep(None, direct("core@u(r):2.x#2.0"))
            .unwrap_err()
            .is_description()
    );
}

#[test]
fn test_replacement_keeps_or_moves_origin() {
    let mut builder = ProvisioningConfig::builder();
    builder
        .add_feature_pack_dep(Some("web"), direct("web@u(r):1.x#1.0"))
        .unwrap()
        .add_feature_pack_dep(Some("core"), direct("core@u(r):1.x#1.0"))
        .unwrap();

    builder
        .add_feature_pack_dep_with(None, direct("web@u(r):1.x#1.1"), true)
        .unwrap();
    let kept = builder.clone().build();
    let web = kept.deps().dep_by_origin("web").unwrap();
    assert_eq!(web.location().build(), Some("1.1"));
    // replaced in place
    let order: Vec<_> = kept
        .deps()
        .feature_pack_deps()
        .map(|dep| dep.location().producer_name().to_string())
        .collect();
    assert_eq!(order, ["web", "core"]);

    // an origin owned by another producer is rejected
    assert!(
        builder
            .add_feature_pack_dep_with(Some("core"), direct("web@u(r):1.x#1.2"), true)
            .unwrap_err()
            .is_description()
    );

    builder
        .add_feature_pack_dep_with(Some("frontend"), direct("web@u(r):1.x#1.2"), true)
        .unwrap();
    let moved = builder.build();
    assert!(moved.deps().dep_by_origin("web").unwrap_err().is_resolution());
    assert_eq!(
        moved.deps().dep_by_origin("frontend").unwrap().location().build(),
        Some("1.2")
    );
    assert_eq!(moved.deps().origins().count(), 2);
}

#[test]
fn test_remove_requires_matching_location() {
    let mut builder = ProvisioningConfig::builder();
    builder
        .add_feature_pack_dep(Some("core"), direct("core@u(r):1.x#1.0"))
        .unwrap();

    let err = builder
        .remove_feature_pack_dep(&fpl("core@u(r):1.x#0.9"))
        .unwrap_err();
    assert!(err.is_resolution());
    let err = builder
        .remove_transitive_dep(&fpl("core@u(r):1.x#1.0"))
        .unwrap_err();
    assert!(err.is_resolution());

    builder
        .remove_feature_pack_dep(&fpl("core@u(r):1.x#1.0"))
        .unwrap();
    let config = builder.build();
    assert!(!config.deps().has_feature_pack_deps());
    assert!(config.deps().dep_by_origin("core").is_err());
}

#[test]
fn test_default_universe_substitution() {
    let mut builder = ProvisioningConfig::builder();
    builder
        .set_default_universe(Some(UniverseSpec::new("maven", "org.example:universe")))
        .add_universe("community", UniverseSpec::new("maven", "org.example:community"))
        .unwrap()
        .add_feature_pack_dep(None, direct("core:1.x#1.0"))
        .unwrap()
        .add_feature_pack_dep(None, direct("web@community:1.x#1.0"))
        .unwrap()
        .add_feature_pack_dep(None, direct("tools@git(https://example.org/tools):main#3"))
        .unwrap();
    let config = builder.build();

    let universes: Vec<_> = config
        .deps()
        .feature_pack_deps()
        .map(|dep| dep.location().universe().unwrap().to_string())
        .collect();
    assert_eq!(
        universes,
        [
            "maven(org.example:universe)",
            "maven(org.example:community)",
            "git(https://example.org/tools)",
        ]
    );
}

#[test]
fn test_replay_preserves_order() {
    let mut dep = FeaturePackConfig::builder(fpl("web@u(r):1.x#1.0"));
    dep.exclude_package("docs")
        .unwrap()
        .include_default_config(ConfigId::named("standalone", "web.xml"))
        .unwrap();

    let mut builder = ProvisioningConfig::builder();
    builder
        .add_feature_pack_dep(Some("web"), dep.build())
        .unwrap()
        .add_transitive_dep(Some("base"), transitive("base@u(r):1.x#1.0"))
        .unwrap()
        .add_feature_pack_dep(None, direct("core@u(r):1.x#1.0"))
        .unwrap()
        .set_inherit_configs(false)
        .add_option("zeta", "1")
        .add_option("alpha", "2");
    let original = builder.build();

    let mut replay = ProvisioningConfig::builder_from(&original).unwrap();
    replay.add_option("omega", "3");
    let copy = replay.build();

    let producers: Vec<_> = copy
        .deps()
        .feature_pack_deps()
        .map(|dep| dep.location().producer_name())
        .collect();
    assert_eq!(producers, ["web", "core"]);
    let options: Vec<_> = copy.options().keys().map(String::as_str).collect();
    assert_eq!(options, ["zeta", "alpha", "omega"]);
    assert_eq!(copy.deps().origin_of(&fpl("base@u(r):1.x").producer()), Some("base"));
    assert!(copy.deps().dep_by_origin("web").unwrap().is_package_excluded("docs"));
    assert_eq!(copy.configs().inherit_configs(), Some(false));
    assert_eq!(original.options().len(), 2);
}

#[test]
fn test_config_selection() {
    let mut dep = FeaturePackConfig::builder(fpl("server@u(r):1.x#1.0"));
    dep.set_inherit_configs(false)
        .include_config_model("standalone")
        .unwrap()
        .exclude_default_config(ConfigId::named("standalone", "ha.xml"))
        .unwrap()
        .exclude_config_model("domain", true)
        .unwrap();
    let dep = dep.build();
    let configs = dep.configs();

    let provided = [
        ConfigId::named("standalone", "standalone.xml"),
        ConfigId::named("standalone", "ha.xml"),
        ConfigId::named("domain", "domain.xml"),
        ConfigId::model_only("domain"),
        ConfigId::named("host", "host.xml"),
    ];
    let selected = configs.select_configs(&provided);
    assert_eq!(
        selected,
        [&provided[0], &provided[3]],
        "named standalone config and model-only domain config"
    );
}
