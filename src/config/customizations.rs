// src/config/customizations.rs

//! Per-dependency overrides of which configs are installed

use indexmap::IndexMap;
use tracing::trace;

use super::id::ConfigId;
use super::model::ConfigModel;
use crate::error::{Error, Result};
use crate::selection::Selection;

/// Config overrides carried by the provisioning root and by each
/// feature-pack dependency
///
/// Model exclusion carries a named-only flag: when set, only configs that
/// have a name are excluded and model-only configs of the model stay in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCustomizations {
    inherit_configs: Option<bool>,
    inherit_model_only_configs: bool,
    models: Selection<String, (), bool>,
    configs: Selection<ConfigId>,
    defined: IndexMap<ConfigId, ConfigModel>,
}

impl Default for ConfigCustomizations {
    fn default() -> Self {
        Self {
            inherit_configs: None,
            inherit_model_only_configs: true,
            models: Selection::new(),
            configs: Selection::new(),
            defined: IndexMap::new(),
        }
    }
}

impl ConfigCustomizations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit inherit-configs setting, if any
    pub fn inherit_configs(&self) -> Option<bool> {
        self.inherit_configs
    }

    pub fn is_inherit_configs(&self, default: bool) -> bool {
        self.inherit_configs.unwrap_or(default)
    }

    pub fn is_inherit_model_only_configs(&self) -> bool {
        self.inherit_model_only_configs
    }

    /// Included models, and excluded models with their named-only flag
    pub fn models(&self) -> &Selection<String, (), bool> {
        &self.models
    }

    /// Explicitly included and excluded configs
    pub fn configs(&self) -> &Selection<ConfigId> {
        &self.configs
    }

    pub fn is_config_model_included(&self, model: &str) -> bool {
        self.models.is_included(model)
    }

    /// Whether the model of `id` is excluded for this particular config
    pub fn is_config_model_excluded(&self, id: &ConfigId) -> bool {
        let Some(model) = id.model() else {
            return false;
        };
        match self.models.excluded_value(model) {
            Some(&named_only) => !named_only || id.name().is_some(),
            None => false,
        }
    }

    pub fn is_config_included(&self, id: &ConfigId) -> bool {
        self.configs.is_included(id)
    }

    pub fn is_config_excluded(&self, id: &ConfigId) -> bool {
        self.configs.is_excluded(id)
    }

    pub fn defined_configs(&self) -> impl Iterator<Item = &ConfigModel> {
        self.defined.values()
    }

    pub fn defined_config(&self, id: &ConfigId) -> Option<&ConfigModel> {
        self.defined.get(id)
    }

    pub fn has_defined_configs(&self) -> bool {
        !self.defined.is_empty()
    }

    /// True when nothing differs from the defaults
    pub fn is_empty(&self) -> bool {
        self.inherit_configs.is_none()
            && self.inherit_model_only_configs
            && self.models.is_empty()
            && self.configs.is_empty()
            && self.defined.is_empty()
    }

    /// Decide whether a config offered by a feature-pack is installed
    ///
    /// An explicit config exclude or include decides first. Then model
    /// exclusion, then model inclusion. Model-only configs then follow the
    /// model-only inheritance flag and everything else follows
    /// inherit-configs, which defaults to true.
    pub fn selects_config(&self, id: &ConfigId) -> bool {
        if self.configs.is_excluded(id) {
            return false;
        }
        if self.configs.is_included(id) {
            return true;
        }
        if self.is_config_model_excluded(id) {
            return false;
        }
        if let Some(model) = id.model() {
            if self.models.is_included(model) {
                return true;
            }
        }
        if id.is_model_only() {
            return self.inherit_model_only_configs;
        }
        self.is_inherit_configs(true)
    }

    pub fn select_configs<'a, I>(&self, ids: I) -> Vec<&'a ConfigId>
    where
        I: IntoIterator<Item = &'a ConfigId>,
    {
        ids.into_iter()
            .filter(|id| {
                let selected = self.selects_config(id);
                if !selected {
                    trace!("config {} not selected", id);
                }
                selected
            })
            .collect()
    }
}

/// Customization edits shared by the builders that carry them
pub trait ConfigCustomizationsEdit {
    fn customizations_mut(&mut self) -> &mut ConfigCustomizations;

    fn set_inherit_configs(&mut self, inherit: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.customizations_mut().inherit_configs = Some(inherit);
        self
    }

    fn set_inherit_model_only_configs(&mut self, inherit: bool) -> &mut Self
    where
        Self: Sized,
    {
        self.customizations_mut().inherit_model_only_configs = inherit;
        self
    }

    fn include_config_model(&mut self, model: impl Into<String>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let model = model.into();
        self.customizations_mut()
            .models
            .include(model.clone(), ())
            .map_err(|c| c.describe("Config model", &model))?;
        Ok(self)
    }

    /// Exclude a model; with `named_only` its model-only configs stay in
    fn exclude_config_model(&mut self, model: impl Into<String>, named_only: bool) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let model = model.into();
        self.customizations_mut()
            .models
            .exclude(model.clone(), named_only)
            .map_err(|c| c.describe("Config model", &model))?;
        Ok(self)
    }

    fn remove_included_config_model(&mut self, model: &str) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .models
            .remove_included(model)
            .ok_or_else(|| Error::description(format!("Config model {} is not included", model)))?;
        Ok(self)
    }

    fn remove_excluded_config_model(&mut self, model: &str) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .models
            .remove_excluded(model)
            .ok_or_else(|| Error::description(format!("Config model {} is not excluded", model)))?;
        Ok(self)
    }

    fn include_default_config(&mut self, id: ConfigId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .configs
            .include(id.clone(), ())
            .map_err(|c| c.describe("Config", &id))?;
        Ok(self)
    }

    fn exclude_default_config(&mut self, id: ConfigId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .configs
            .exclude(id.clone(), ())
            .map_err(|c| c.describe("Config", &id))?;
        Ok(self)
    }

    fn remove_included_default_config(&mut self, id: &ConfigId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .configs
            .remove_included(id)
            .ok_or_else(|| Error::description(format!("Config {} is not included", id)))?;
        Ok(self)
    }

    fn remove_excluded_default_config(&mut self, id: &ConfigId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .configs
            .remove_excluded(id)
            .ok_or_else(|| Error::description(format!("Config {} is not excluded", id)))?;
        Ok(self)
    }

    /// Define a config locally
    fn add_config(&mut self, config: ConfigModel) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let defined = &mut self.customizations_mut().defined;
        if defined.contains_key(config.id()) {
            return Err(Error::description(format!(
                "Config {} has already been defined",
                config.id()
            )));
        }
        defined.insert(config.id().clone(), config);
        Ok(self)
    }

    fn remove_config(&mut self, id: &ConfigId) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.customizations_mut()
            .defined
            .shift_remove(id)
            .ok_or_else(|| Error::description(format!("Config {} has not been defined", id)))?;
        Ok(self)
    }

    /// Replace every customization with those of `other`
    fn init_configs(&mut self, other: &ConfigCustomizations) -> &mut Self
    where
        Self: Sized,
    {
        *self.customizations_mut() = other.clone();
        self
    }
}

impl ConfigCustomizationsEdit for ConfigCustomizations {
    fn customizations_mut(&mut self) -> &mut ConfigCustomizations {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_include_exclude_conflict() {
        let mut custom = ConfigCustomizations::new();
        custom.include_config_model("standalone").unwrap();
        let err = custom.exclude_config_model("standalone", false).unwrap_err();
        assert!(err.to_string().contains("standalone"));

        custom.exclude_config_model("host", true).unwrap();
        assert!(custom.include_config_model("host").is_err());
        custom.remove_excluded_config_model("host").unwrap();
        custom.include_config_model("host").unwrap();
    }

    #[test]
    fn test_config_include_exclude_conflict() {
        let id = ConfigId::named("standalone", "standalone.xml");
        let mut custom = ConfigCustomizations::new();
        custom.exclude_default_config(id.clone()).unwrap();
        assert!(custom.include_default_config(id.clone()).is_err());
        assert!(custom.remove_included_default_config(&id).is_err());
        custom.remove_excluded_default_config(&id).unwrap();
        custom.include_default_config(id.clone()).unwrap();
        assert!(custom.is_config_included(&id));
    }

    #[test]
    fn test_named_only_model_exclusion() {
        let mut custom = ConfigCustomizations::new();
        custom.exclude_config_model("standalone", true).unwrap();
        assert!(custom.is_config_model_excluded(&ConfigId::named("standalone", "a.xml")));
        assert!(!custom.is_config_model_excluded(&ConfigId::model_only("standalone")));

        custom.remove_excluded_config_model("standalone").unwrap();
        custom.exclude_config_model("standalone", false).unwrap();
        assert!(custom.is_config_model_excluded(&ConfigId::model_only("standalone")));
        assert!(!custom.is_config_model_excluded(&ConfigId::named("host", "a.xml")));
    }

    #[test]
    fn test_defined_configs() {
        let config = ConfigModel::builder(Some("m".into()), Some("n".into())).build();
        let mut custom = ConfigCustomizations::new();
        custom.add_config(config.clone()).unwrap();
        assert!(custom.add_config(config.clone()).unwrap_err().is_description());
        assert_eq!(custom.defined_config(config.id()), Some(&config));

        custom.remove_config(config.id()).unwrap();
        assert!(custom.remove_config(config.id()).is_err());
        assert!(custom.is_empty());
    }

    #[test]
    fn test_selects_config() {
        let web = ConfigId::named("standalone", "web.xml");
        let full = ConfigId::named("standalone", "full.xml");
        let host = ConfigId::model_only("host");
        let domain = ConfigId::named("domain", "domain.xml");

        let mut custom = ConfigCustomizations::new();
        custom.set_inherit_configs(false);
        custom.include_config_model("standalone").unwrap();
        custom.exclude_default_config(full.clone()).unwrap();

        let all = [web.clone(), full.clone(), host.clone(), domain.clone()];
        assert_eq!(custom.select_configs(&all), vec![&web, &host]);

        custom.set_inherit_model_only_configs(false);
        assert!(!custom.selects_config(&host));

        let mut inherit = ConfigCustomizations::new();
        inherit.exclude_config_model("standalone", true).unwrap();
        inherit.include_default_config(full.clone()).unwrap();
        assert!(!inherit.selects_config(&web));
        assert!(inherit.selects_config(&full));
        assert!(inherit.selects_config(&ConfigId::model_only("standalone")));
        assert!(inherit.selects_config(&domain));
    }

    #[test]
    fn test_init_configs() {
        let mut source = ConfigCustomizations::new();
        source.set_inherit_configs(false);
        source.include_config_model("m").unwrap();

        let mut target = ConfigCustomizations::new();
        target.exclude_config_model("other", false).unwrap();
        target.init_configs(&source);
        assert_eq!(target, source);
    }
}
