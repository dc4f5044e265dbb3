// src/config/group.rs

//! Feature groups: include/exclude trees over specs and features
//!
//! A group body records which specs and individual features it includes or
//! excludes, the child items it adds, and overrides aimed at features of
//! other feature-packs. Overrides for another origin live in a nested body
//! keyed by that origin, so callers can write them as if they were local.

use indexmap::IndexMap;
use tracing::trace;

use super::feature::FeatureConfig;
use crate::error::{Error, Result};
use crate::selection::{Selection, Side};
use crate::spec::{FeatureId, SpecId};

/// A child of a group or feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigItem {
    Feature(FeatureConfig),
    Group(FeatureGroup),
}

impl ConfigItem {
    pub fn is_group(&self) -> bool {
        matches!(self, ConfigItem::Group(_))
    }

    pub fn origin(&self) -> Option<&str> {
        match self {
            ConfigItem::Feature(feature) => feature.origin(),
            ConfigItem::Group(group) => group.body().origin(),
        }
    }
}

/// The content shared by groups, layers and config models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroupBody {
    origin: Option<String>,
    inherit_features: bool,
    specs: Selection<SpecId>,
    features: Selection<FeatureId, Option<FeatureConfig>, Option<String>>,
    external: IndexMap<String, FeatureGroupBody>,
    items: Vec<ConfigItem>,
}

impl Default for FeatureGroupBody {
    fn default() -> Self {
        Self {
            origin: None,
            inherit_features: true,
            specs: Selection::new(),
            features: Selection::new(),
            external: IndexMap::new(),
            items: Vec::new(),
        }
    }
}

impl FeatureGroupBody {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_origin(origin: &str) -> Self {
        Self {
            origin: Some(origin.to_string()),
            ..Self::default()
        }
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_inherit_features(&self) -> bool {
        self.inherit_features
    }

    pub fn specs(&self) -> &Selection<SpecId> {
        &self.specs
    }

    pub fn is_spec_included(&self, spec: &SpecId) -> bool {
        self.specs.is_included(spec)
    }

    pub fn is_spec_excluded(&self, spec: &SpecId) -> bool {
        self.specs.is_excluded(spec)
    }

    /// Included features with their optional override bodies, and excluded
    /// features with their optional parent reference
    pub fn features(&self) -> &Selection<FeatureId, Option<FeatureConfig>, Option<String>> {
        &self.features
    }

    pub fn is_feature_included(&self, id: &FeatureId) -> bool {
        self.features.is_included(id)
    }

    pub fn is_feature_excluded(&self, id: &FeatureId) -> bool {
        self.features.is_excluded(id)
    }

    pub fn external_groups(&self) -> &IndexMap<String, FeatureGroupBody> {
        &self.external
    }

    pub fn external_group(&self, origin: &str) -> Option<&FeatureGroupBody> {
        self.external.get(origin)
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    /// True when the body adds nothing and overrides nothing
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
            && self.features.is_empty()
            && self.external.is_empty()
            && self.items.is_empty()
            && self.inherit_features
    }

    /// Run an edit against the body responsible for `origin`
    ///
    /// A new external body is only kept when the edit succeeds.
    fn edit_for<T>(
        &mut self,
        origin: Option<&str>,
        edit: impl FnOnce(&mut FeatureGroupBody) -> Result<T>,
    ) -> Result<T> {
        let origin = match origin {
            Some(origin) if self.origin.as_deref() != Some(origin) => origin,
            _ => return edit(self),
        };
        if let Some(external) = self.external.get_mut(origin) {
            return edit(external);
        }
        let mut external = FeatureGroupBody::with_origin(origin);
        let out = edit(&mut external)?;
        trace!("created external group for origin {}", origin);
        self.external.insert(origin.to_string(), external);
        Ok(out)
    }
}

/// Merge the parameters of an id into an override body
///
/// The body may repeat id parameters with the same value; any other value
/// is a conflict.
fn merge_id_params(id: &FeatureId, body: FeatureConfig) -> Result<FeatureConfig> {
    if body.spec() != id.spec() {
        return Err(Error::description(format!(
            "Feature {} cannot be overridden by a feature of spec {}",
            id,
            body.spec()
        )));
    }
    for (name, value) in id.params() {
        let conflicting = body.is_unset(name)
            || body.is_reset(name)
            || body.param(name).is_some_and(|v| v != value.as_str());
        if conflicting {
            return Err(Error::description(format!(
                "Parameter {} of included feature {} conflicts with the feature id",
                name, id
            )));
        }
    }
    let mut builder = FeatureConfig::builder_from(&body);
    for (name, value) in id.params() {
        if body.param(name).is_none() {
            builder.set_param(name.clone(), value.clone())?;
        }
    }
    Ok(builder.build())
}

fn select_spec(
    body: &mut FeatureGroupBody,
    origin: Option<&str>,
    spec: SpecId,
    side: Side,
) -> Result<()> {
    body.edit_for(origin, |group| {
        let outcome = match side {
            Side::Included => group.specs.include(spec.clone(), ()),
            Side::Excluded => group.specs.exclude(spec.clone(), ()),
        };
        outcome
            .map(|_| ())
            .map_err(|c| c.describe("Feature spec", &spec))
    })
}

fn include_feature_in(
    body: &mut FeatureGroupBody,
    origin: Option<&str>,
    id: FeatureId,
    config: Option<FeatureConfig>,
) -> Result<()> {
    let config = config.map(|c| merge_id_params(&id, c)).transpose()?;
    body.edit_for(origin, |group| {
        group
            .features
            .include(id.clone(), config)
            .map(|_| ())
            .map_err(|c| c.describe("Feature", &id))
    })
}

fn exclude_feature_in(
    body: &mut FeatureGroupBody,
    origin: Option<&str>,
    id: FeatureId,
    parent_ref: Option<String>,
) -> Result<()> {
    body.edit_for(origin, |group| {
        group
            .features
            .exclude(id.clone(), parent_ref)
            .map(|_| ())
            .map_err(|c| c.describe("Feature", &id))
    })
}

/// Undo a selection in the body responsible for `origin`
///
/// An external body left empty by the removal is dropped.
fn deselect_in(
    body: &mut FeatureGroupBody,
    origin: Option<&str>,
    remove: impl FnOnce(&mut FeatureGroupBody) -> Result<()>,
) -> Result<()> {
    body.edit_for(origin, remove)?;
    if let Some(origin) = origin {
        if body.external.get(origin).is_some_and(FeatureGroupBody::is_empty) {
            trace!("dropping empty external group for origin {}", origin);
            body.external.shift_remove(origin);
        }
    }
    Ok(())
}

fn deselect_spec(
    body: &mut FeatureGroupBody,
    origin: Option<&str>,
    spec: &SpecId,
    side: Side,
) -> Result<()> {
    deselect_in(body, origin, |group| {
        let (removed, state) = match side {
            Side::Included => (group.specs.remove_included(spec).is_some(), "included"),
            Side::Excluded => (group.specs.remove_excluded(spec).is_some(), "excluded"),
        };
        if !removed {
            return Err(Error::description(format!("Feature spec {} is not {}", spec, state)));
        }
        Ok(())
    })
}

fn deselect_feature(
    body: &mut FeatureGroupBody,
    origin: Option<&str>,
    id: &FeatureId,
    side: Side,
) -> Result<()> {
    deselect_in(body, origin, |group| {
        let (removed, state) = match side {
            Side::Included => (group.features.remove_included(id).is_some(), "included"),
            Side::Excluded => (group.features.remove_excluded(id).is_some(), "excluded"),
        };
        if !removed {
            return Err(Error::description(format!("Feature {} is not {}", id, state)));
        }
        Ok(())
    })
}

/// Group editing operations shared by every builder that owns a group body
pub trait FeatureGroupEdit {
    fn group_body_mut(&mut self) -> &mut FeatureGroupBody;

    /// Set the origin the body belongs to
    ///
    /// External bodies are keyed relative to the origin, so it can no longer
    /// change once one has been recorded.
    fn set_origin(&mut self, origin: Option<String>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let body = self.group_body_mut();
        if body.origin != origin && !body.external.is_empty() {
            return Err(Error::description(format!(
                "Cannot change origin of a group body with external groups for {}",
                body.external.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
            )));
        }
        body.origin = origin;
        Ok(self)
    }

    fn set_inherit_features(&mut self, inherit: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.group_body_mut().inherit_features = inherit;
        self
    }

    fn include_spec(&mut self, spec: impl Into<SpecId>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        select_spec(self.group_body_mut(), None, spec.into(), Side::Included)?;
        Ok(self)
    }

    fn include_spec_from(&mut self, origin: &str, spec: impl Into<SpecId>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        select_spec(self.group_body_mut(), Some(origin), spec.into(), Side::Included)?;
        Ok(self)
    }

    fn exclude_spec(&mut self, spec: impl Into<SpecId>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        select_spec(self.group_body_mut(), None, spec.into(), Side::Excluded)?;
        Ok(self)
    }

    fn exclude_spec_from(&mut self, origin: &str, spec: impl Into<SpecId>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        select_spec(self.group_body_mut(), Some(origin), spec.into(), Side::Excluded)?;
        Ok(self)
    }

    fn remove_included_spec(&mut self, spec: &SpecId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_spec(self.group_body_mut(), None, spec, Side::Included)?;
        Ok(self)
    }

    fn remove_included_spec_from(&mut self, origin: &str, spec: &SpecId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_spec(self.group_body_mut(), Some(origin), spec, Side::Included)?;
        Ok(self)
    }

    fn remove_excluded_spec(&mut self, spec: &SpecId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_spec(self.group_body_mut(), None, spec, Side::Excluded)?;
        Ok(self)
    }

    fn remove_excluded_spec_from(&mut self, origin: &str, spec: &SpecId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_spec(self.group_body_mut(), Some(origin), spec, Side::Excluded)?;
        Ok(self)
    }

    /// Include a feature by id, optionally overriding its parameters
    ///
    /// An override body declaring another origin is recorded against that
    /// origin.
    fn include_feature(&mut self, id: FeatureId, body: Option<FeatureConfig>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let origin = body.as_ref().and_then(|b| b.origin().map(str::to_string));
        include_feature_in(self.group_body_mut(), origin.as_deref(), id, body)?;
        Ok(self)
    }

    fn include_feature_from(
        &mut self,
        origin: &str,
        id: FeatureId,
        body: Option<FeatureConfig>,
    ) -> Result<&mut Self>
    where
        Self: Sized,
    {
        include_feature_in(self.group_body_mut(), Some(origin), id, body)?;
        Ok(self)
    }

    fn exclude_feature(&mut self, id: FeatureId, parent_ref: Option<String>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        exclude_feature_in(self.group_body_mut(), None, id, parent_ref)?;
        Ok(self)
    }

    fn exclude_feature_from(
        &mut self,
        origin: &str,
        id: FeatureId,
        parent_ref: Option<String>,
    ) -> Result<&mut Self>
    where
        Self: Sized,
    {
        exclude_feature_in(self.group_body_mut(), Some(origin), id, parent_ref)?;
        Ok(self)
    }

    fn remove_included_feature(&mut self, id: &FeatureId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_feature(self.group_body_mut(), None, id, Side::Included)?;
        Ok(self)
    }

    fn remove_included_feature_from(&mut self, origin: &str, id: &FeatureId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_feature(self.group_body_mut(), Some(origin), id, Side::Included)?;
        Ok(self)
    }

    fn remove_excluded_feature(&mut self, id: &FeatureId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_feature(self.group_body_mut(), None, id, Side::Excluded)?;
        Ok(self)
    }

    fn remove_excluded_feature_from(&mut self, origin: &str, id: &FeatureId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        deselect_feature(self.group_body_mut(), Some(origin), id, Side::Excluded)?;
        Ok(self)
    }

    fn add_feature(&mut self, feature: FeatureConfig) -> &mut Self
    where
        Self: Sized,
    {
        self.group_body_mut().items.push(ConfigItem::Feature(feature));
        self
    }

    fn add_group(&mut self, group: FeatureGroup) -> &mut Self
    where
        Self: Sized,
    {
        self.group_body_mut().items.push(ConfigItem::Group(group));
        self
    }

    /// Remove a previously added feature matching the spec and every id
    /// parameter
    fn remove_feature(&mut self, id: &FeatureId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let items = &mut self.group_body_mut().items;
        let index = items
            .iter()
            .position(|item| matches!(item, ConfigItem::Feature(f) if f.matches_id(id)))
            .ok_or_else(|| Error::description(format!("Feature {} has not been added", id)))?;
        items.remove(index);
        Ok(self)
    }
}

impl FeatureGroupEdit for FeatureGroupBody {
    fn group_body_mut(&mut self) -> &mut FeatureGroupBody {
        self
    }
}

/// A named, reusable group of features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    name: String,
    body: FeatureGroupBody,
}

impl FeatureGroup {
    pub fn builder(name: impl Into<String>) -> FeatureGroupBuilder {
        FeatureGroupBuilder {
            group: FeatureGroup {
                name: name.into(),
                body: FeatureGroupBody::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &FeatureGroupBody {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct FeatureGroupBuilder {
    group: FeatureGroup,
}

impl FeatureGroupBuilder {
    /// Replace the body wholesale
    pub fn with_body(&mut self, body: FeatureGroupBody) -> &mut Self {
        self.group.body = body;
        self
    }

    pub fn build(self) -> FeatureGroup {
        self.group
    }
}

impl FeatureGroupEdit for FeatureGroupBuilder {
    fn group_body_mut(&mut self) -> &mut FeatureGroupBody {
        &mut self.group.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> FeatureId {
        FeatureId::parse(s).unwrap()
    }

    #[test]
    fn test_spec_include_exclude_conflict() {
        let mut group = FeatureGroup::builder("g");
        group.include_spec("interface").unwrap();
        let err = group.exclude_spec("interface").unwrap_err();
        assert!(err.is_description());
        assert!(err.to_string().contains("interface"));

        let mut group = FeatureGroup::builder("g");
        group.exclude_spec("interface").unwrap();
        assert!(group.include_spec("interface").is_err());

        group.remove_excluded_spec(&SpecId::new("interface")).unwrap();
        group.include_spec("interface").unwrap();
        assert!(group.remove_excluded_spec(&SpecId::new("interface")).is_err());
    }

    #[test]
    fn test_feature_include_exclude_conflict() {
        let mut group = FeatureGroup::builder("g");
        group.exclude_feature(id("socket:name=http"), None).unwrap();
        assert!(group.include_feature(id("socket:name=http"), None).is_err());
        group.include_feature(id("socket:name=https"), None).unwrap();
        assert!(group.exclude_feature(id("socket:name=https"), None).is_err());
    }

    #[test]
    fn test_include_feature_merges_id_params() {
        let mut body = FeatureConfig::builder("socket");
        body.set_param("port", "8080").unwrap();

        let mut group = FeatureGroup::builder("g");
        group
            .include_feature(id("socket:name=http"), Some(body.build()))
            .unwrap();
        let group = group.build();

        let merged = group.body().features().included_value(&id("socket:name=http")).unwrap();
        let merged = merged.as_ref().unwrap();
        assert_eq!(merged.param("name"), Some("http"));
        assert_eq!(merged.param("port"), Some("8080"));
    }

    #[test]
    fn test_include_feature_param_conflict() {
        let mut body = FeatureConfig::builder("socket");
        body.set_param("name", "https").unwrap();

        let mut group = FeatureGroup::builder("g");
        let err = group
            .include_feature(id("socket:name=http"), Some(body.build()))
            .unwrap_err();
        assert!(err.is_description());
        assert!(group.build().body().features().is_empty());
    }

    #[test]
    fn test_external_origin_redirect() {
        let mut body = FeatureConfig::builder("socket");
        body.set_origin("core");

        let mut group = FeatureGroup::builder("g");
        group.set_origin(Some("local".to_string())).unwrap();
        group
            .include_feature(id("socket:name=http"), Some(body.build()))
            .unwrap()
            .exclude_spec_from("core", "logging")
            .unwrap()
            .include_spec_from("local", "interface")
            .unwrap();
        let group = group.build();

        assert!(!group.body().is_feature_included(&id("socket:name=http")));
        let core = group.body().external_group("core").unwrap();
        assert_eq!(core.origin(), Some("core"));
        assert!(core.is_feature_included(&id("socket:name=http")));
        assert!(core.is_spec_excluded(&SpecId::new("logging")));
        assert!(group.body().is_spec_included(&SpecId::new("interface")));
    }

    #[test]
    fn test_remove_from_external_origin() {
        let mut group = FeatureGroup::builder("g");
        group
            .include_spec_from("core", "interface")
            .unwrap()
            .exclude_spec_from("core", "logging")
            .unwrap()
            .exclude_feature_from("web", id("socket:name=http"), None)
            .unwrap();

        // the local body never saw these
        assert!(group.remove_included_spec(&SpecId::new("interface")).is_err());

        group
            .remove_included_spec_from("core", &SpecId::new("interface"))
            .unwrap()
            .remove_excluded_feature_from("web", &id("socket:name=http"))
            .unwrap();
        assert!(
            group
                .remove_included_spec_from("core", &SpecId::new("interface"))
                .unwrap_err()
                .is_description()
        );
        let body = group.clone().build().body().clone();
        let core = body.external_group("core").unwrap();
        assert!(!core.is_spec_included(&SpecId::new("interface")));
        assert!(core.is_spec_excluded(&SpecId::new("logging")));
        assert!(body.external_group("web").is_none());

        group
            .remove_excluded_spec_from("core", &SpecId::new("logging"))
            .unwrap();
        assert!(group.clone().build().body().external_groups().is_empty());

        assert!(
            group
                .remove_included_feature_from("other", &id("socket:name=http"))
                .is_err()
        );
        assert!(group.build().body().external_group("other").is_none());
    }

    #[test]
    fn test_origin_fixed_once_externals_exist() {
        let mut group = FeatureGroup::builder("g");
        group.set_origin(Some("local".to_string())).unwrap();
        group.set_origin(None).unwrap();
        group.exclude_spec_from("core", "logging").unwrap();

        let err = group.set_origin(Some("core".to_string())).unwrap_err();
        assert!(err.is_description());
        // setting the same origin again is harmless
        group.set_origin(None).unwrap();

        let group = group.build();
        assert_eq!(group.body().origin(), None);
        assert!(group.body().external_group("core").is_some());
    }

    #[test]
    fn test_failed_external_edit_leaves_no_trace() {
        let mut group = FeatureGroup::builder("g");
        let mut body = FeatureConfig::builder("other");
        body.set_origin("core");
        assert!(group
            .include_feature(id("socket:name=http"), Some(body.build()))
            .is_err());
        assert!(group.build().body().external_groups().is_empty());
    }

    #[test]
    fn test_remove_feature_requires_exact_match() {
        let mut feature = FeatureConfig::builder("socket");
        feature
            .set_param("name", "http")
            .unwrap()
            .set_param("host", "main")
            .unwrap();

        let mut group = FeatureGroup::builder("g");
        group.add_feature(feature.build());
        assert!(group.remove_feature(&id("socket:name=http,host=other")).is_err());
        group.remove_feature(&id("socket:host=main,name=http")).unwrap();
        assert!(group.build().body().items().is_empty());
    }
}
