//! Input graph as produced by the metrics backend

use serde::{Deserialize, Serialize};

pub type NodeId = i64;

/// A metric compared against a baseline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub base_value: f64,
    pub value: f64,
    pub increase: f64,
    pub increase_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeMetricsType {
    Cpu,
    Memory,
    Disk,
    Goroutines,
    GcDurationSeconds,
    MemAllocBytes,
    Threads,
    NetworkMysqlConnection,
    NetworkRedisConnection,
    NetworkEtcdConnection,
    #[serde(rename = "pod_count")]
    PodCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    pub metrics_type: NodeMetricsType,
    pub comparison: Comparison,
}

/// A service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    /// Display name, not necessarily unique
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<NodeMetrics>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            qps: None,
            latency: None,
            error_rate: None,
            metrics: Vec::new(),
        }
    }
}

/// Latency of a call, either a plain number of seconds or a comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Latency {
    Seconds(f64),
    Comparison(Comparison),
}

impl Latency {
    /// Current latency in seconds
    pub fn value(&self) -> f64 {
        match self {
            Latency::Seconds(value) => *value,
            Latency::Comparison(comparison) => comparison.value,
        }
    }

    /// Absolute increase over the baseline, zero without a baseline
    pub fn increase(&self) -> f64 {
        match self {
            Latency::Seconds(_) => 0.0,
            Latency::Comparison(comparison) => comparison.increase,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Latency::Seconds(0.0)
    }
}

/// A contributing path of a link, only shown as tooltip detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEdge {
    pub name: String,
    pub value: f64,
    pub error_rate: f64,
    pub latency: Latency,
}

/// A call from `source` to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub latency: Latency,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_edges: Vec<SubEdge>,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            value: 0.0,
            error_rate: 0.0,
            latency: Latency::default(),
            sub_edges: Vec::new(),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}
