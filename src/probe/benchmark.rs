use anyhow::Result;
use async_trait::async_trait;
use std::time::Instant;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};
use crate::identity::{fixed_transfer, TestIdentity};

/// Bulk identity creation and signing throughput.
/// Timings are informational; only errors fail the probe.
pub struct SigningBenchmarkProbe;

#[derive(Debug, Clone, Copy)]
pub struct BenchmarkTimings {
    pub identities: usize,
    pub creation_ms: f64,
    pub signing_ms: f64,
}

pub fn run_benchmark(count: usize, chain_id: u64) -> Result<BenchmarkTimings> {
    let start = Instant::now();
    let identities = (0..count)
        .map(|_| TestIdentity::generate())
        .collect::<Result<Vec<_>>>()?;
    let creation_ms = start.elapsed().as_secs_f64() * 1000.0;

    let tx = fixed_transfer(chain_id);
    let start = Instant::now();
    for identity in &identities {
        identity.sign_transaction(tx.clone())?;
    }
    let signing_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(BenchmarkTimings {
        identities: identities.len(),
        creation_ms,
        signing_ms,
    })
}

#[async_trait]
impl Probe for SigningBenchmarkProbe {
    fn name(&self) -> &str {
        "Performance Tests"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let timings = run_benchmark(env.config.benchmark_identities, env.config.chain_id)?;

        findings.note(format!(
            "Created {} accounts in {:.3} ms",
            timings.identities, timings.creation_ms
        ));
        findings.note(format!(
            "Signed {} transactions in {:.3} ms",
            timings.identities, timings.signing_ms
        ));
        Ok(ProbeOutcome::passed(format!(
            "{} identities: create {:.1} ms, sign {:.1} ms",
            timings.identities, timings.creation_ms, timings.signing_ms
        )))
    }
}
