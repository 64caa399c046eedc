//! Console report rendering.

use std::fmt::Write;

use crate::config::BenchConfig;
use crate::results::RunResults;

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Compare `other` against `baseline` by mean latency.
///
/// A non-positive mean on either side has no meaningful ratio.
pub fn speed_ratio_line(baseline: &str, baseline_mean: f64, other: &str, other_mean: f64) -> String {
    if baseline_mean <= 0.0 || other_mean <= 0.0 {
        return format!("cannot compare {baseline} and {other}: zero mean latency");
    }

    let ratio = other_mean / baseline_mean;
    if ratio >= 1.0 {
        format!("{baseline} is {ratio:.1}x faster than {other}")
    } else {
        format!("{other} is {:.1}x faster than {baseline}", 1.0 / ratio)
    }
}

/// Render the full comparison report for every size in the run.
pub fn render(results: &RunResults, config: &BenchConfig) -> String {
    let mut out = String::new();
    let baseline = config.baseline.name();

    let _ = writeln!(out, "\n{}", "=".repeat(100));
    let _ = writeln!(out, "📊 {} BENCHMARK RESULTS", config.profile.as_str().to_uppercase());
    let _ = writeln!(out, "{}", "=".repeat(100));

    for (size, systems) in results.iter() {
        let _ = writeln!(out, "\n🔹 Dataset Size: {} vectors", format_count(size));
        let _ = writeln!(out, "{}", "-".repeat(100));

        let _ = writeln!(out, "\n📥 Load Performance:");
        let _ = writeln!(out, "{:<15} {:<15} {:<15}", "System", "Load Time", "Ops/Second");
        let _ = writeln!(out, "{}", "-".repeat(50));
        for (system, result) in systems.iter() {
            let _ = writeln!(
                out,
                "{:<15} {:<15.2} {:<15.0}",
                system,
                result.load_time,
                result.ops_per_second(size)
            );
        }

        let _ = writeln!(out, "\n🔍 Query Latency (ms):");
        let _ = writeln!(
            out,
            "{:<15} {:<12} {:<12} {:<12} {:<12} {:<12} {:<12}",
            "System", "Mean", "Median", "P95", "P99", "Min", "Max"
        );
        let _ = writeln!(out, "{}", "-".repeat(100));
        for (system, result) in systems.iter() {
            let s = &result.query_stats;
            let _ = writeln!(
                out,
                "{:<15} {:<12.2} {:<12.2} {:<12.2} {:<12.2} {:<12.2} {:<12.2}",
                system, s.mean, s.median, s.p95, s.p99, s.min, s.max
            );
        }

        let _ = writeln!(out, "\n⚡ Speed vs {baseline}:");
        let _ = writeln!(out, "{}", "-".repeat(50));
        if let Some(base) = systems.get(baseline) {
            for (system, result) in systems.iter().filter(|(name, _)| *name != baseline) {
                let _ = writeln!(
                    out,
                    "{}",
                    speed_ratio_line(baseline, base.query_stats.mean, system, result.query_stats.mean)
                );
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::SystemResult;
    use crate::stats::LatencyStats;

    fn result(load_time: f64, samples: &[f64]) -> SystemResult {
        SystemResult {
            load_time,
            query_stats: LatencyStats::from_samples(samples).unwrap(),
        }
    }

    #[test]
    fn test_speed_ratio_baseline_faster() {
        assert_eq!(speed_ratio_line("baseline", 2.0, "other", 8.0), "baseline is 4.0x faster than other");
    }

    #[test]
    fn test_speed_ratio_other_faster() {
        assert_eq!(speed_ratio_line("baseline", 8.0, "other", 2.0), "other is 4.0x faster than baseline");
    }

    #[test]
    fn test_speed_ratio_equal() {
        assert_eq!(speed_ratio_line("TMC", 3.0, "Qdrant", 3.0), "TMC is 1.0x faster than Qdrant");
    }

    #[test]
    fn test_speed_ratio_zero_mean() {
        assert!(speed_ratio_line("TMC", 0.0, "Qdrant", 3.0).starts_with("cannot compare"));
        assert_eq!(
            speed_ratio_line("TMC", 2.0, "Flat", 0.0),
            "cannot compare TMC and Flat: zero mean latency"
        );
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(100_000), "100,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_render_tables() {
        let mut results = RunResults::new();
        results.record(1000, "TMC", result(2.0, &[2.0, 2.0]));
        results.record(1000, "Qdrant", result(4.0, &[8.0, 8.0]));

        let report = render(&results, &BenchConfig::default());
        assert!(report.contains("Dataset Size: 1,000 vectors"));
        assert!(report.contains("Load Performance"));
        assert!(report.contains("Query Latency (ms)"));
        assert!(report.contains("TMC is 4.0x faster than Qdrant"));
        // 1000 entries in 4s
        assert!(report.contains("250"));
    }

    #[test]
    fn test_render_without_baseline_result() {
        let mut results = RunResults::new();
        results.record(1000, "Qdrant", result(1.0, &[1.0]));

        let report = render(&results, &BenchConfig::default());
        assert!(report.contains("Qdrant"));
        assert!(!report.contains("faster"));
    }
}
