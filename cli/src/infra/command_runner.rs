//! Production implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` drives each child on a current-thread tokio runtime,
//! so the synchronous callers get guaranteed timeout and kill without
//! juggling threads.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::application::ports::CommandRunner;

/// Default timeout for hook commands.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(120);

/// Production `CommandRunner`. Children are spawned with `kill_on_drop`, and
/// an expired timeout kills and reaps the child before reporting.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn block_on(
        &self,
        program: &str,
        args: &[&str],
        input: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<Output> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start process runtime")?;
        runtime.block_on(execute(program, args, input, timeout))
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout)
    }

    fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Output> {
        self.block_on(program, args, None, timeout)
    }

    fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        self.block_on(program, args, Some(input), self.timeout)
    }
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<&mut R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn execute(
    program: &str,
    args: &[&str],
    input: Option<&[u8]>,
    timeout: Duration,
) -> Result<Output> {
    tracing::debug!(program, ?args, "spawning");
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    let stdin = child.stdin.take();
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    // Dropping the pipe after the write closes the child's stdin.
    let feed = async move {
        if let (Some(mut pipe), Some(data)) = (stdin, input) {
            pipe.write_all(data)
                .await
                .with_context(|| format!("writing stdin of {program}"))?;
        }
        anyhow::Ok(())
    };
    let collect = async {
        let (fed, status, out, err) = tokio::join!(
            feed,
            child.wait(),
            read_all(stdout.as_mut()),
            read_all(stderr.as_mut()),
        );
        fed?;
        anyhow::Ok(Output {
            status: status.with_context(|| format!("waiting for {program}"))?,
            stdout: out.with_context(|| format!("reading stdout of {program}"))?,
            stderr: err.with_context(|| format!("reading stderr of {program}"))?,
        })
    };

    let outcome = tokio::time::timeout(timeout, collect).await;
    match outcome {
        Ok(result) => result,
        Err(_elapsed) => {
            child
                .kill()
                .await
                .with_context(|| format!("killing {program} after timeout"))?;
            anyhow::bail!("{program} timed out after {}s", timeout.as_secs_f32())
        }
    }
}
