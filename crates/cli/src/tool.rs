//! Process invocation of the `yandex-disk` executable.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::{Output, Stdio};

use ydi_status::{StatusSnapshot, parse_status};

use crate::CliError;
use crate::command::Subcommand;

/// Executable name looked up on `PATH`.
pub const TOOL_NAME: &str = "yandex-disk";

/// Locale forced on every invocation. The tool localizes its messages and
/// the status parser only understands the English report.
pub const LOCALE: &str = "C.UTF-8";

/// A boxed future returned by [`SyncTool::run`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<String, CliError>> + Send + 'a>>;

/// Something that can execute sync tool subcommands.
///
/// Implemented by [`YandexDisk`] for the real executable. The poll worker
/// and the action coordinator only depend on this trait.
pub trait SyncTool: Send + Sync + 'static {
    /// Runs `command` with `args` and returns its captured output.
    ///
    /// A nonzero exit is not an error: the tool's own message is returned
    /// as text. Errors are reserved for failing to run the process at all.
    fn run(&self, command: Subcommand, args: Vec<String>) -> ToolFuture<'_>;
}

/// Handle to a located `yandex-disk` executable.
#[derive(Debug, Clone)]
pub struct YandexDisk {
    program: PathBuf,
}

impl YandexDisk {
    /// Finds the executable on `PATH`.
    pub fn locate() -> Result<Self, CliError> {
        let program = which::which(TOOL_NAME).map_err(|_| CliError::ToolNotFound)?;
        tracing::info!(path = %program.display(), "located {TOOL_NAME}");
        Ok(Self { program })
    }

    /// Uses an explicit executable path instead of searching `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs a subcommand given by name.
    ///
    /// Unknown names fail with [`CliError::InvalidCommand`] before anything
    /// is spawned.
    pub async fn command(&self, name: &str, args: &[&str]) -> Result<String, CliError> {
        let command: Subcommand = name.parse()?;
        let args = args.iter().map(|a| a.to_string()).collect();
        self.invoke(command, args).await
    }

    /// Runs `status` and parses the report.
    pub async fn status(&self) -> Result<StatusSnapshot, CliError> {
        let raw = self.invoke(Subcommand::Status, Vec::new()).await?;
        Ok(parse_status(&raw))
    }

    async fn invoke(&self, command: Subcommand, args: Vec<String>) -> Result<String, CliError> {
        if command.is_interactive() {
            tracing::debug!(%command, "interactive command skipped");
            return Ok(String::new());
        }

        let output = tokio::process::Command::new(&self.program)
            .arg(command.as_arg())
            .args(&args)
            .env("LANG", LOCALE)
            .env("LC_ALL", LOCALE)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(captured_text(command, &output))
    }
}

impl SyncTool for YandexDisk {
    fn run(&self, command: Subcommand, args: Vec<String>) -> ToolFuture<'_> {
        Box::pin(self.invoke(command, args))
    }
}

/// Picks the text to hand back from a finished process.
///
/// On failure the tool usually explains itself on stdout, sometimes only
/// on stderr; whichever carries text is returned.
fn captured_text(command: Subcommand, output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() {
        return stdout.into_owned();
    }

    tracing::debug!(%command, status = %output.status, "{TOOL_NAME} exited with failure");
    if stdout.trim().is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        stdout.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn output(code: i32, stdout: &[u8], stderr: &[u8]) -> Output {
        use std::os::unix::process::ExitStatusExt;
        Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn success_returns_stdout() {
        let out = output(0, b"Synchronization core status: idle\n", b"");
        assert_eq!(
            captured_text(Subcommand::Status, &out),
            "Synchronization core status: idle\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failure_passes_stdout_through() {
        let out = output(1, b"Error: daemon not started\n", b"ignored");
        assert_eq!(
            captured_text(Subcommand::Status, &out),
            "Error: daemon not started\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failure_falls_back_to_stderr() {
        let out = output(1, b"", b"Error: option is not supported\n");
        assert_eq!(
            captured_text(Subcommand::Stop, &out),
            "Error: option is not supported\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn invalid_utf8_is_replaced() {
        let out = output(0, b"Used: 1 GB\xff\n", b"");
        assert!(captured_text(Subcommand::Status, &out).starts_with("Used: 1 GB"));
    }

    #[tokio::test]
    async fn unknown_command_is_rejected_before_spawning() {
        let disk = YandexDisk::with_program("/nonexistent/yandex-disk");
        let err = disk.command("reboot", &[]).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidCommand(_)));
    }

    #[tokio::test]
    async fn interactive_commands_are_not_spawned() {
        let disk = YandexDisk::with_program("/nonexistent/yandex-disk");
        assert_eq!(disk.command("setup", &[]).await.unwrap(), "");
        assert_eq!(disk.command("token", &[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_program_is_an_io_error() {
        let disk = YandexDisk::with_program("/nonexistent/yandex-disk");
        let err = disk.command("status", &[]).await.unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn program_path_is_kept() {
        let disk = YandexDisk::with_program("/opt/yd/yandex-disk");
        assert_eq!(disk.program(), Path::new("/opt/yd/yandex-disk"));
    }
}
