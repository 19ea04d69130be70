// [crates/windi-guard/src/report_builder.rs]
//! `ReportBuilder`: assembles a weekly [`GuardReport`], `verified` iff
//! `chain_breaks == 0 && all ISP scans valid && uptime_pct >= 95.0`.

use windi_common::now_epoch_ms;

use crate::models::GuardReport;

const VERIFIED_UPTIME_FLOOR: f64 = 95.0;
const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

pub struct ReportBuilder;

impl ReportBuilder {
    pub fn new() -> Self {
        ReportBuilder
    }

    pub fn build(&self, week_start_ms: i64, uptime_pct: f64, chain_breaks: u64, isp_all_valid: bool) -> GuardReport {
        let verified = chain_breaks == 0 && isp_all_valid && uptime_pct >= VERIFIED_UPTIME_FLOOR;

        GuardReport {
            week_start_ms,
            week_end_ms: week_start_ms + WEEK_MS,
            uptime_pct,
            chain_breaks,
            isp_all_valid,
            verified,
            generated_at_ms: now_epoch_ms(),
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_clean_week_is_verified() {
        let report = ReportBuilder::new().build(0, 99.5, 0, true);
        assert!(report.verified);
    }

    #[test]
    fn any_chain_break_fails_verification() {
        let report = ReportBuilder::new().build(0, 99.5, 1, true);
        assert!(!report.verified);
    }

    #[test]
    fn an_invalid_isp_scan_fails_verification() {
        let report = ReportBuilder::new().build(0, 99.5, 0, false);
        assert!(!report.verified);
    }

    #[test]
    fn uptime_below_95_fails_verification() {
        let report = ReportBuilder::new().build(0, 94.9, 0, true);
        assert!(!report.verified);
    }
}
