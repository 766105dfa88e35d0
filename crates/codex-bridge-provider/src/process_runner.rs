use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};

use crate::cli_template::RenderedCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessOutput {
    pub(crate) exit_code: Option<i32>,
    pub(crate) success: bool,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

#[derive(Debug)]
pub(crate) enum ProcessRunError {
    Spawn(io::Error),
    Io(io::Error),
    TimedOut,
}

async fn spawn_with_text_file_busy_retry(command: &mut Command) -> io::Result<Child> {
    const MAX_TEXT_FILE_BUSY_RETRIES: u32 = 5;
    const TEXT_FILE_BUSY_ERRNO: i32 = 26;
    let mut attempt = 0;
    loop {
        match command.spawn() {
            Ok(child) => return Ok(child),
            Err(error)
                if error.raw_os_error() == Some(TEXT_FILE_BUSY_ERRNO)
                    && attempt < MAX_TEXT_FILE_BUSY_RETRIES =>
            {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Runs `rendered` to completion or until `timeout` elapses. On unix the
/// child runs in its own process group; a timed-out attempt kills the whole
/// group and reaps the child before this returns.
pub(crate) async fn run_rendered_command(
    rendered: &RenderedCommand,
    timeout: Duration,
) -> Result<ProcessOutput, ProcessRunError> {
    let mut command = Command::new(&rendered.program);
    command.kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);
    command.args(&rendered.args);
    command.stdin(if rendered.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = spawn_with_text_file_busy_retry(&mut command)
        .await
        .map_err(ProcessRunError::Spawn)?;
    // The child leads its own group, so the group id equals its pid.
    let process_group = child.id();

    let outcome = tokio::time::timeout(
        timeout,
        collect_child_output(&mut child, rendered.stdin.as_deref()),
    )
    .await;

    match outcome {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(error)) => {
            kill_process_group(process_group);
            let _ = child.kill().await;
            Err(ProcessRunError::Io(error))
        }
        Err(_) => {
            kill_process_group(process_group);
            if let Err(error) = child.kill().await {
                tracing::warn!(error = %error, "failed to kill timed out cli process");
            }
            Err(ProcessRunError::TimedOut)
        }
    }
}

#[cfg(unix)]
fn kill_process_group(process_group: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(raw) = process_group.and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(error) => {
            tracing::warn!(error = %error, pgid = raw, "failed to kill cli process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_process_group: Option<u32>) {}

async fn collect_child_output(
    child: &mut Child,
    stdin_payload: Option<&str>,
) -> io::Result<ProcessOutput> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (_, stdout, stderr, status) = tokio::try_join!(
        write_stdin(stdin, stdin_payload),
        read_pipe(stdout),
        read_pipe(stderr),
        child.wait(),
    )?;

    Ok(ProcessOutput {
        exit_code: status.code(),
        success: status.success(),
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
    })
}

async fn write_stdin(stdin: Option<ChildStdin>, payload: Option<&str>) -> io::Result<()> {
    let (Some(mut pipe), Some(payload)) = (stdin, payload) else {
        return Ok(());
    };
    match pipe.write_all(payload.as_bytes()).await {
        // The tool may exit without draining stdin; its exit status decides.
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(error) => Err(error),
        Ok(()) => pipe.shutdown().await.or_else(|error| {
            if error.kind() == io::ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(error)
            }
        }),
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buffer).await?;
    }
    Ok(buffer)
}
