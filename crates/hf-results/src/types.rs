//! Result record types.

use serde::{Deserialize, Serialize};

/// One vessel at one time point: the four signals at its first inflow and
/// first outflow node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRecord {
    pub name: String,
    pub time: f64,
    pub pressure_in: f64,
    pub pressure_out: f64,
    pub flow_in: f64,
    pub flow_out: f64,
}

/// One solution variable at one time point, long format.
///
/// Connection variables are named `<quantity>:<upstream>:<downstream>`,
/// block-internal variables `<quantity>:<block>`. The derivative is present
/// only when requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableRecord {
    pub name: String,
    pub time: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ydot: Option<f64>,
}
