use crate::runner::state::{ProbeResult, TestSummary};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Endpoints and identity the run used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub rpc_url: String,
    pub frontend_url: String,
    pub test_account: Option<String>,
    pub browser_available: bool,
}

/// Probe results keyed by name, in declared order.
///
/// Serialized as a JSON object whose key order is the run order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMap(Vec<ProbeResult>);

impl ResultMap {
    pub fn new(results: Vec<ProbeResult>) -> Self {
        Self(results)
    }

    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.0.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ResultMap {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Entry body without the name, which becomes the map key
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultEntry {
    status: crate::runner::state::ProbeStatus,
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
    duration_ms: u64,
}

impl Serialize for ResultMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for r in &self.0 {
            map.serialize_entry(
                &r.name,
                &ResultEntry {
                    status: r.status.clone(),
                    message: r.message.clone(),
                    notes: r.notes.clone(),
                    duration_ms: r.duration_ms,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ResultMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of probe name to result")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ResultMap, A::Error> {
                let mut results = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, entry)) = access.next_entry::<String, ResultEntry>()? {
                    if results.iter().any(|r: &ProbeResult| r.name == name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate probe result: {}",
                            name
                        )));
                    }
                    results.push(ProbeResult {
                        name,
                        status: entry.status,
                        message: entry.message,
                        notes: entry.notes,
                        duration_ms: entry.duration_ms,
                    });
                }
                Ok(ResultMap(results))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// The run's primary artifact.
///
/// `summary` is derived from `results` when the report is built or loaded
/// and cannot be set on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "StoredReport")]
pub struct TestReport {
    pub run_id: String,
    pub timestamp: String,
    pub environment: Environment,
    results: ResultMap,
    summary: TestSummary,
}

impl TestReport {
    pub fn new(
        run_id: String,
        timestamp: String,
        environment: Environment,
        results: ResultMap,
    ) -> Self {
        let summary = TestSummary::from_results(&results);
        Self {
            run_id,
            timestamp,
            environment,
            results,
            summary,
        }
    }

    pub fn results(&self) -> &ResultMap {
        &self.results
    }

    pub fn summary(&self) -> TestSummary {
        self.summary
    }
}

/// On-disk shape; any stored summary is ignored
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReport {
    run_id: String,
    timestamp: String,
    environment: Environment,
    results: ResultMap,
}

impl From<StoredReport> for TestReport {
    fn from(stored: StoredReport) -> Self {
        TestReport::new(
            stored.run_id,
            stored.timestamp,
            stored.environment,
            stored.results,
        )
    }
}
