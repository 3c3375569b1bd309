use four_bar_kin::{Linkage, Method, NewtonCfg, Policy, Sweep};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub(crate) type AnyResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Run configuration, read from a RON file.
///
/// Every field is optional, an empty `()` is the example linkage swept over
/// a full turn.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub(crate) struct Cfg {
    pub(crate) linkage: Linkage,
    pub(crate) sweep: Sweep,
    pub(crate) method: Method,
    pub(crate) newton: NewtonCfg,
    pub(crate) policy: Policy,
}

impl Cfg {
    pub(crate) fn from_ron(s: &str) -> AnyResult<Self> {
        let cfg = ron::from_str::<Self>(s)?;
        cfg.linkage.validate()?;
        cfg.sweep.validate()?;
        Ok(cfg)
    }

    pub(crate) fn load(path: Option<&Path>) -> AnyResult<Self> {
        match path {
            Some(path) => {
                tracing::debug!("load config from {}", path.display());
                Self::from_ron(&std::fs::read_to_string(path)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn to_ron(&self) -> AnyResult<String> {
        let pretty = ron::ser::PrettyConfig::new().struct_names(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}
