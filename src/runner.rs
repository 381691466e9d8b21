use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Instant;

use crate::command::CommandLine;
use crate::error::{FilterError, Result};

/// Result of one compressor round trip: raw output + metadata.
#[derive(Debug)]
pub struct RunResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitStatus,
    pub elapsed_ms: u128,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawn the command, feed `input` on stdin, capture stdout/stderr, measure time.
///
/// stdin is written and stderr drained on helper threads while stdout is read
/// here, so a child filling one pipe never blocks on another. The child is
/// always waited on, also when reading fails.
pub fn pipe(command: &CommandLine, input: &[u8], cwd: Option<&Path>) -> Result<RunResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        check_dir(dir)?;
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| FilterError::Launch {
        bin: command.program.clone(),
        source,
    })?;

    let captured = communicate(&mut child, input);
    let status = child.wait();

    let (stdout, stderr) = captured?;
    let status = status.map_err(|e| FilterError::io("waiting for compressor", e))?;
    let elapsed_ms = start.elapsed().as_millis();

    tracing::debug!(
        "`{}` exited with {} after {}ms ({} bytes in, {} bytes out)",
        command,
        status,
        elapsed_ms,
        input.len(),
        stdout.len()
    );

    Ok(RunResult {
        stdout,
        stderr,
        status,
        elapsed_ms,
    })
}

/// A missing working directory would otherwise surface as a spawn failure
/// blamed on the binary.
fn check_dir(dir: &Path) -> Result<()> {
    let context = || format!("working directory {}", dir.display());
    let meta = std::fs::metadata(dir).map_err(|e| FilterError::io(context(), e))?;
    if !meta.is_dir() {
        return Err(FilterError::io(context(), io::Error::other("not a directory")));
    }
    Ok(())
}

fn communicate(child: &mut Child, input: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| -> Result<(Vec<u8>, Vec<u8>)> {
        let writer = scope.spawn(move || write_stdin(stdin, input));
        let err_reader = scope.spawn(move || drain(stderr));

        let out = drain(stdout);
        // The stdout handle is closed by now; if reading it failed the child
        // may still be blocked writing, so stop it before joining.
        if out.is_err() {
            let _ = child.kill();
        }

        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
        let err = err_reader
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stderr reader panicked")));

        let out = out.map_err(|e| FilterError::io("reading compressor stdout", e))?;
        let err = err.map_err(|e| FilterError::io("reading compressor stderr", e))?;
        written.map_err(|e| FilterError::io("writing compressor stdin", e))?;
        Ok((out, err))
    })
}

fn write_stdin(stdin: Option<impl Write>, input: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input).and_then(|()| stdin.flush()) {
        // The child quit without reading everything; its exit status tells why.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
    // dropping `stdin` closes the pipe and signals end of input
}

fn drain(pipe: Option<impl Read>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandLine {
        CommandLine {
            program: "sh".into(),
            args: vec!["-c".into(), script.into(), "stub".into()],
        }
    }

    #[test]
    fn test_echo_roundtrip() {
        let result = pipe(&sh("cat"), b"var a = 1;", None).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, b"var a = 1;");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn test_failure_keeps_stderr() {
        let result = pipe(&sh("echo boom >&2; exit 3"), b"x", None).unwrap();
        assert!(!result.success());
        assert_eq!(result.status.code(), Some(3));
        assert_eq!(result.stderr_lossy().trim(), "boom");
    }

    #[test]
    fn test_child_ignoring_stdin() {
        let input = vec![b'x'; 1 << 20];
        let result = pipe(&sh("exit 0"), &input, None).unwrap();
        assert!(result.success());
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_large_stdout_and_stderr_do_not_deadlock() {
        // Both streams well past a pipe buffer before the child reads stdin.
        let script = "head -c 300000 /dev/zero >&2; head -c 300000 /dev/zero; cat >/dev/null";
        let input = vec![b'a'; 300_000];
        let result = pipe(&sh(script), &input, None).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.len(), 300_000);
        assert_eq!(result.stderr.len(), 300_000);
    }

    #[test]
    fn test_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let result = pipe(&sh("cat marker.txt"), b"", Some(dir.path())).unwrap();
        assert_eq!(result.stdout, b"here");
    }

    #[test]
    fn test_missing_cwd_is_not_launch_error() {
        let err = pipe(&sh("cat"), b"x", Some(Path::new("/nonexistent/dir"))).unwrap_err();
        match err {
            FilterError::Io { ref context, .. } => {
                assert!(context.contains("/nonexistent/dir"));
            }
            ref other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cwd_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = pipe(&sh("cat"), b"x", Some(file.path())).unwrap_err();
        assert!(matches!(err, FilterError::Io { .. }));
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_missing_binary() {
        let cmd = CommandLine {
            program: "/nonexistent/yui-compressor".into(),
            args: vec![],
        };
        let err = pipe(&cmd, b"", None).unwrap_err();
        assert!(
            matches!(err, FilterError::Launch { ref bin, .. } if bin == "/nonexistent/yui-compressor")
        );
    }
}
