//! Single-pass analysis driver.
//!
//! `Init -> Streaming -> Finalize -> Done`, or `Aborted` when the input cannot
//! be opened or read. An aborted run yields an error and no report.

use super::aggregates::Aggregates;
use super::failures::FailureRecorder;
use super::memory_mode::{MemoryModeSelector, ModeSelection};
use super::report::{
    HealthMetrics, MemoryOptimization, Report, Summary, TrackerStatsSet, TrafficAnalysis,
    format_percent, percentage, round_to,
};
use super::schedule::LineSchedule;
use crate::app::config::AnalyzerConfig;
use crate::domain::{AnalysisError, FailureReason};
use crate::parser::LineParser;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Streaming,
    Finalize,
    Done,
    Aborted,
}

/// Counters owned by one run, handed from streaming to finalization.
struct RunState {
    selection: ModeSelection,
    aggregates: Aggregates,
    failures: FailureRecorder,
    total_lines: u64,
    started: Instant,
}

pub struct AnalysisPipeline {
    config: AnalyzerConfig,
    parser: LineParser,
    progress: LineSchedule,
    pruning: LineSchedule,
    state: PipelineState,
}

impl AnalysisPipeline {
    /// Rejects a configuration that `AnalyzerConfig::validate` would refuse.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let parser = LineParser::new()?;
        Ok(Self {
            progress: LineSchedule::every(config.progress_every_n_lines),
            pruning: LineSchedule::every(config.prune_every_n_lines),
            config,
            parser,
            state: PipelineState::Init,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze_file(&mut self, path: impl AsRef<Path>) -> Result<Report, AnalysisError> {
        let path = path.as_ref();
        self.transition(PipelineState::Init);

        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                self.transition(PipelineState::Aborted);
                return Err(if e.kind() == ErrorKind::NotFound {
                    AnalysisError::FileNotFound {
                        path: path.to_path_buf(),
                    }
                } else {
                    AnalysisError::FileOpen {
                        path: path.to_path_buf(),
                        source: e,
                    }
                });
            }
        };

        let reader = BufReader::with_capacity(self.config.read_buffer_bytes, file);
        self.analyze_reader(reader, path, size_bytes)
    }

    /// Runs the pipeline over any line source. `size_bytes` drives mode selection.
    pub fn analyze_reader<R: BufRead>(
        &mut self,
        mut reader: R,
        source: &Path,
        size_bytes: u64,
    ) -> Result<Report, AnalysisError> {
        self.transition(PipelineState::Init);

        let selection = MemoryModeSelector::new(&self.config).select(size_bytes);
        info!(
            file = %source.display(),
            file_size_mb = round_to(selection.file_size_mb, 1),
            mode = %selection.mode,
            "Starting analysis"
        );

        let mut run = RunState {
            selection,
            aggregates: Aggregates::new(&selection.limits),
            failures: FailureRecorder::new(self.config.failure_sample_cap),
            total_lines: 0,
            started: Instant::now(),
        };

        self.transition(PipelineState::Streaming);
        if let Err(e) = self.stream(&mut reader, &mut run, source) {
            self.transition(PipelineState::Aborted);
            return Err(e);
        }

        self.transition(PipelineState::Finalize);
        let report = self.finalize(run, source);
        self.transition(PipelineState::Done);

        Ok(report)
    }

    fn stream<R: BufRead>(
        &self,
        reader: &mut R,
        run: &mut RunState,
        source: &Path,
    ) -> Result<(), AnalysisError> {
        let bounded = run.selection.mode.is_bounded();
        let prune_percent = run.selection.mode.prune_percent(&self.config);
        let mut buf = Vec::with_capacity(512);

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source_err| AnalysisError::Read {
                    path: source.to_path_buf(),
                    line: run.total_lines,
                    source: source_err,
                })?;
            if read == 0 {
                break;
            }

            run.total_lines += 1;
            let line_number = run.total_lines;

            if self.progress.is_due(line_number) {
                let elapsed = run.started.elapsed().as_secs_f64();
                let lines_per_sec = if elapsed > 0.0 {
                    line_number as f64 / elapsed
                } else {
                    0.0
                };
                info!(
                    lines = line_number,
                    lines_per_sec = lines_per_sec.round() as u64,
                    "Progress"
                );
            }

            if bounded && self.pruning.is_due(line_number) {
                let (ips, urls, minutes) = run.aggregates.prune(prune_percent);
                debug!(
                    line = line_number,
                    percent = prune_percent,
                    ips,
                    urls,
                    minutes,
                    "Pruned trackers"
                );
            }

            self.process_line(&buf, run);
        }

        Ok(())
    }

    fn process_line(&self, bytes: &[u8], run: &mut RunState) {
        let decoded = String::from_utf8_lossy(bytes);
        let valid_utf8 = matches!(decoded, Cow::Borrowed(_));
        let line = clean_line(&decoded);

        if line.is_empty() || line.starts_with('#') {
            return;
        }

        if !valid_utf8 {
            trace!(line = run.total_lines, "Line is not valid UTF-8");
            run.failures.record(line, FailureReason::UnexpectedError);
            return;
        }

        match self.parser.parse(line) {
            Ok(record) => run.aggregates.accept(&record),
            Err(e) => {
                trace!(line = run.total_lines, reason = %e.reason(), error = %e, "Rejected line");
                run.failures.record(line, e.reason());
            }
        }
    }

    fn finalize(&self, run: RunState, source: &Path) -> Report {
        let RunState {
            selection,
            aggregates,
            failures,
            total_lines,
            started,
        } = run;

        let elapsed = started.elapsed().as_secs_f64();
        let lines_per_second = if elapsed > 0.0 {
            total_lines as f64 / elapsed
        } else {
            0.0
        };
        let parsing_success_rate = if total_lines > 0 {
            format_percent(percentage(aggregates.total_requests, total_lines))
        } else {
            "0%".to_string()
        };

        let top_n = self.config.top_n_results;
        let sample_failures =
            (!failures.is_empty()).then(|| failures.sample(self.config.failure_report_sample));

        if failures.total_failures() > 0 {
            warn!(
                rejected = failures.total_failures(),
                distinct_sampled = failures.len(),
                regex_no_match = failures.count_for(FailureReason::RegexNoMatch),
                timestamp_error = failures.count_for(FailureReason::TimestampError),
                ip_error = failures.count_for(FailureReason::IpError),
                status_error = failures.count_for(FailureReason::StatusError),
                request_error = failures.count_for(FailureReason::RequestError),
                unexpected_error = failures.count_for(FailureReason::UnexpectedError),
                "Some lines were rejected"
            );
        }

        info!(
            total_lines,
            total_requests = aggregates.total_requests,
            elapsed_secs = round_to(elapsed, 2),
            "Analysis complete"
        );

        Report {
            summary: Summary {
                file: source.display().to_string(),
                file_size_mb: round_to(selection.file_size_mb, 1),
                memory_mode: selection.mode,
                total_lines,
                total_requests: aggregates.total_requests,
                analysis_time_seconds: round_to(elapsed, 2),
                lines_per_second: round_to(lines_per_second, 0),
                parsing_success_rate,
            },
            health_metrics: HealthMetrics::from_groups(
                aggregates.status_groups.clone(),
                aggregates.total_requests,
            ),
            traffic_analysis: TrafficAnalysis {
                top_ips: aggregates.ips.top(top_n),
                top_urls: aggregates.urls.top(top_n),
                top_minutes: aggregates.minutes.top(top_n),
                status_distribution: aggregates.statuses.clone(),
                methods: aggregates.methods.clone(),
            },
            size_analysis: aggregates.sizes.analysis(),
            memory_optimization: MemoryOptimization {
                mode: selection.mode,
                limits: selection.limits,
                tracker_stats: TrackerStatsSet {
                    ips: aggregates.ips.diagnostics(),
                    urls: aggregates.urls.diagnostics(),
                    minutes: aggregates.minutes.diagnostics(),
                },
                failed_attempts_count: failures.len(),
                sample_failures,
            },
        }
    }

    fn transition(&mut self, next: PipelineState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "Pipeline state");
        }
        self.state = next;
    }
}

/// Drops a leading byte-order mark and any trailing CR/LF run.
fn clean_line(raw: &str) -> &str {
    let line = raw.strip_prefix(BOM).unwrap_or(raw);
    line.trim_end_matches(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::{ConfigError, ModeOverride};
    use std::io::Cursor;

    fn run(input: &[u8]) -> (Report, AnalysisPipeline) {
        let mut pipeline = AnalysisPipeline::new(AnalyzerConfig::default()).unwrap();
        let report = pipeline
            .analyze_reader(Cursor::new(input.to_vec()), Path::new("memory.log"), 0)
            .unwrap();
        (report, pipeline)
    }

    #[test]
    fn test_clean_line() {
        assert_eq!(clean_line("\u{feff}abc\r\n"), "abc");
        assert_eq!(clean_line("abc\n"), "abc");
        assert_eq!(clean_line("abc\r\r\n"), "abc");
        assert_eq!(clean_line("  abc  \n"), "  abc  ");
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let input = b"\n# comment\n\r\n1.1.1.1 - - [10/Oct/2023:12:00:00 +0000] \"GET / HTTP/1.1\" 200 10\n";
        let (report, pipeline) = run(input);

        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(report.summary.total_lines, 4);
        assert_eq!(report.summary.total_requests, 1);
        assert_eq!(report.memory_optimization.failed_attempts_count, 0);
        assert!(report.memory_optimization.sample_failures.is_none());
    }

    #[test]
    fn test_invalid_utf8_is_unexpected_error() {
        let mut input = b"1.1.1.1 - - [10/Oct/2023:12:00:00 +0000] \"GET /".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b" HTTP/1.1\" 200 10\n");
        let (report, _) = run(&input);

        assert_eq!(report.summary.total_requests, 0);
        let sample = report.memory_optimization.sample_failures.unwrap();
        assert_eq!(sample.0[0].1.reason, FailureReason::UnexpectedError);
    }

    #[test]
    fn test_read_error_aborts() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("device unplugged"))
            }
        }

        let mut pipeline = AnalysisPipeline::new(AnalyzerConfig::default()).unwrap();
        let err = pipeline
            .analyze_reader(BufReader::new(Broken), Path::new("broken.log"), 0)
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Read { line: 0, .. }));
        assert_eq!(pipeline.state(), PipelineState::Aborted);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_streaming() {
        let config = AnalyzerConfig {
            mode: ModeOverride::Aggressive,
            max_unique_ips: 1,
            ..AnalyzerConfig::default()
        };

        let Err(err) = AnalysisPipeline::new(config) else {
            panic!("a cap that halves to zero must be refused");
        };
        assert!(matches!(
            err,
            AnalysisError::Config(ConfigError::InvalidConfig(ref msg)) if msg.contains("max_unique_ips")
        ));
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_missing_file_aborts() {
        let mut pipeline = AnalysisPipeline::new(AnalyzerConfig::default()).unwrap();
        let err = pipeline
            .analyze_file("/definitely/not/here.log")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::FileNotFound { .. }));
        assert_eq!(pipeline.state(), PipelineState::Aborted);
    }
}
