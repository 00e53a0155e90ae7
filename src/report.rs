//! Post-pass report persistence.
//!
//! Writes the finished result record as pretty JSON under a per-scenario
//! directory. Runs strictly after the loop has returned; the pass itself
//! never touches the filesystem.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::world::PassResult;

#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: String,
    result: &'a PassResult,
}

pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(report_dir: impl AsRef<Path>) -> Self {
        Self {
            report_dir: report_dir.as_ref().to_path_buf(),
        }
    }

    /// Persist a result and return the path it landed at.
    pub fn write(&self, result: &PassResult) -> Result<PathBuf> {
        let dir = self.report_dir.join(&result.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report dir {}", dir.display()))?;
        let envelope = ReportEnvelope {
            generated_at: chrono::Utc::now().to_rfc3339(),
            result,
        };
        let path = dir.join("result.json");
        let json = serde_json::to_string_pretty(&envelope).context("Failed to encode report")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_pass;
    use crate::scenario::Scenario;
    use crate::variants::HeuristicProfile;

    #[test]
    fn reports_land_under_the_scenario_directory() {
        let mut scenario = Scenario::example();
        scenario.ticks = Some(50);
        let result = run_pass(&scenario, &HeuristicProfile::default());
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());
        let path = writer.write(&result).unwrap();
        assert!(path.ends_with("scouts_21/result.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["result"]["scenario"], "scouts_21");
        assert!(parsed["generated_at"].is_string());
    }
}
