//! Helper process execution.
//!
//! Helpers are launched directly from an argument vector (no shell),
//! synchronously, without a timeout. Captured output is bounded.

use crate::error::{DistError, Result};
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default cap on captured bytes per stream.
pub const DEFAULT_MAX_OUTPUT: usize = 50_000;

const READ_CHUNK: usize = 8192;

/// Result of running a helper.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output, truncated to the configured bound.
    pub stdout: String,

    /// Standard error, truncated to the configured bound.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the helper succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Combined output for logging, stdout first.
    pub fn output(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// Options for running a helper.
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Maximum bytes kept per captured stream.
    pub max_output: usize,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            env: HashMap::new(),
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }
}

/// Run `program` with `args` and wait for it.
///
/// A launch failure is an error; a non-zero exit is a failed
/// [`CommandResult`].
pub fn run_program(
    program: &Path,
    args: &[String],
    options: &CommandOptions,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let command_line = describe(program, args);
    tracing::debug!("running {}", command_line);

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!("{} could not be started: {}", command_line, e);
        DistError::CommandFailed {
            command: command_line.clone(),
            code: None,
            message: e.to_string(),
        }
    })?;

    // Both pipes are drained concurrently so a chatty helper never blocks.
    let stdout_handle = child
        .stdout
        .take()
        .map(|stream| capture(stream, options.max_output));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stream| capture(stream, options.max_output));

    let status = child.wait()?;

    let stdout_bytes = collect(stdout_handle);
    let stderr_bytes = collect(stderr_handle);

    let duration = start.elapsed();
    let stdout = truncate_output(&stdout_bytes, options.max_output);
    let stderr = truncate_output(&stderr_bytes, options.max_output);

    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(status.code(), stdout, stderr, duration))
    }
}

/// Read `stream` to the end on its own thread, keeping the first `max` bytes.
fn capture<R>(mut stream: R, max: usize) -> JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut kept = Vec::with_capacity(max.min(READ_CHUNK));
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    let room = max.saturating_sub(kept.len());
                    kept.extend_from_slice(&chunk[..n.min(room)]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("stopped reading helper output: {}", e);
                    break;
                }
            }
        }
        kept
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

/// Decode captured bytes, keeping at most `max` bytes.
///
/// A multi-byte character split by the cut is dropped whole.
pub fn truncate_output(bytes: &[u8], max: usize) -> String {
    let kept = &bytes[..bytes.len().min(max)];
    let kept = &kept[..char_boundary(kept)];
    String::from_utf8_lossy(kept).into_owned()
}

/// Length of `bytes` without a trailing incomplete UTF-8 sequence.
fn char_boundary(bytes: &[u8]) -> usize {
    let len = bytes.len();
    let lead = (1..=len.min(4))
        .map(|back| len - back)
        .find(|&i| bytes[i] & 0xC0 != 0x80);
    let Some(lead) = lead else {
        return len;
    };
    let width = match bytes[lead] {
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        b if b >= 0xC0 => 2,
        _ => 1,
    };
    if lead + width > len {
        lead
    } else {
        len
    }
}

/// Render a command line for log records.
pub(crate) fn describe(program: &Path, args: &[String]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(program.display().to_string());
    words.extend(args.iter().cloned());
    shell_words::join(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn run_successful_program() {
        let result = run_program(&sh(), &args(&["-c", "echo hello"]), &CommandOptions::default())
            .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn run_failing_program() {
        let result = run_program(
            &sh(),
            &args(&["-c", "echo broken >&2; exit 3"]),
            &CommandOptions::default(),
        )
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stderr.contains("broken"));
        assert!(result.output().contains("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn run_with_env() {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = run_program(&sh(), &args(&["-c", "echo $MY_VAR"]), &options).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value"));
    }

    #[cfg(unix)]
    #[test]
    fn output_is_bounded() {
        let options = CommandOptions {
            max_output: 10,
            ..Default::default()
        };
        let result = run_program(
            &sh(),
            &args(&["-c", "printf '0123456789abcdefghij'"]),
            &options,
        )
        .unwrap();

        assert_eq!(result.stdout, "0123456789");
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let err = run_program(
            Path::new("/nonexistent/dk-util"),
            &args(&["fndb", "refresh"]),
            &CommandOptions::default(),
        )
        .unwrap_err();

        match err {
            DistError::CommandFailed {
                command,
                code,
                message,
            } => {
                assert!(command.contains("fndb refresh"));
                assert_eq!(code, None);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncate_handles_short_input() {
        assert_eq!(truncate_output(b"abc", 10), "abc");
        assert_eq!(truncate_output(b"abcdef", 3), "abc");
    }

    #[test]
    fn truncate_keeps_whole_characters() {
        // "h\u{e9}llo": the cut at 2 lands inside the two-byte "\u{e9}".
        assert_eq!(truncate_output("h\u{e9}llo".as_bytes(), 2), "h");
        assert_eq!(truncate_output("h\u{e9}llo".as_bytes(), 3), "h\u{e9}");
        assert_eq!(truncate_output("\u{1f600}!".as_bytes(), 3), "");
    }

    #[cfg(unix)]
    #[test]
    fn output_beyond_the_bound_is_drained() {
        let options = CommandOptions {
            max_output: 16,
            ..Default::default()
        };
        // Far more than a pipe buffer on both streams; the helper must not block.
        let result = run_program(
            &sh(),
            &args(&[
                "-c",
                "head -c 1000000 /dev/zero | tr '\\0' x; head -c 1000000 /dev/zero >&2; exit 4",
            ]),
            &options,
        )
        .unwrap();

        assert_eq!(result.exit_code, Some(4));
        assert_eq!(result.stdout, "x".repeat(16));
        assert_eq!(result.stderr.len(), 16);
    }

    #[cfg(target_os = "linux")]
    fn max_rss_kb() -> i64 {
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
        assert_eq!(rc, 0);
        usage.ru_maxrss
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn large_output_keeps_memory_bounded() {
        let options = CommandOptions {
            max_output: 1_000,
            ..Default::default()
        };
        let before = max_rss_kb();
        let result = run_program(
            Path::new("/bin/sh"),
            &args(&["-c", "head -c 400000000 /dev/zero"]),
            &options,
        )
        .unwrap();
        let after = max_rss_kb();

        assert!(result.success);
        assert_eq!(result.stdout.len(), 1_000);
        assert!(
            after - before < 50 * 1024,
            "max RSS grew from {before} KB to {after} KB"
        );
    }

    #[test]
    fn describe_quotes_arguments() {
        let line = describe(Path::new("/usr/bin/dk-util"), &args(&["formats", "build", "my fmt"]));
        assert_eq!(line, "/usr/bin/dk-util formats build 'my fmt'");
    }

    #[test]
    fn output_combines_streams() {
        let result = CommandResult::failure(
            Some(1),
            "out\n".to_string(),
            "err\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.output(), "out\nerr");
    }
}
