use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// On-disk shape of a routing problem. Every top-level field is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct DataSet {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) depot: Option<DataSetLocation>,
    #[serde(default)]
    pub(crate) vehicles: Option<Vec<DataSetVehicle>>,
    #[serde(default)]
    pub(crate) visits: Option<Vec<DataSetLocation>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct DataSetLocation {
    // older datasets call it `label`
    #[serde(default, alias = "label")]
    pub(crate) description: Option<String>,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    #[serde(default)]
    pub(crate) required_skill: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct DataSetVehicle {
    pub(crate) name: String,
    pub(crate) capacity: i32,
    #[serde(default)]
    pub(crate) skill_set: Option<BTreeSet<String>>,
}
