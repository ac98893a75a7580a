use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::TestResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub success_rate: f64,
}

impl Summary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let tests_run = results.len();
        let tests_passed = results.iter().filter(|r| r.success).count();
        let success_rate = if tests_run == 0 {
            0.0
        } else {
            tests_passed as f64 / tests_run as f64 * 100.0
        };
        Self {
            tests_run,
            tests_passed,
            success_rate,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.summary.all_passed()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self).context("serialize run report")?;
        std::fs::write(path, body)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        Ok(())
    }
}

pub fn result_line(result: &TestResult) -> String {
    if result.success {
        format!("✅ {}", result.name)
    } else {
        format!("❌ {} - {}", result.name, result.details)
    }
}

pub fn summary_lines(summary: &Summary) -> Vec<String> {
    let mut lines = vec![
        "📊 Landing Page API Test Results:".to_string(),
        format!("   Tests Run: {}", summary.tests_run),
        format!("   Tests Passed: {}", summary.tests_passed),
        format!("   Success Rate: {:.1}%", summary.success_rate),
    ];
    if summary.all_passed() {
        lines.push("✅ All landing page API tests passed!".to_string());
    } else {
        lines.push("❌ Some landing page API tests failed!".to_string());
    }
    lines
}
