//! yt-dlp invocation builder.
//!
//! Audio-only requests extract to mp3 at the requested quality; everything
//! else downloads the selected streams and merges them into mp4. Output is
//! always written as `<output_dir>/<title>.<ext>`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use vidfetch_core::{DownloadRequest, MediaFormat};

/// yt-dlp output template, relative to the output directory.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

const AUDIO_FORMAT: &str = "mp3";
const MERGE_FORMAT: &str = "mp4";

/// Builder for a yt-dlp invocation.
///
/// # Example
///
/// ```rust,ignore
/// let invocation = YtDlpCommandBuilder::new(&ytdlp, &output_dir)
///     .flag("--no-playlist")
///     .build(&request);
/// ```
#[derive(Debug, Clone)]
pub struct YtDlpCommandBuilder {
    binary_path: PathBuf,
    output_dir: PathBuf,
    extra_args: Vec<OsString>,
}

impl YtDlpCommandBuilder {
    pub fn new(binary_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            output_dir: output_dir.into(),
            extra_args: Vec::new(),
        }
    }

    /// Add a flag placed before the URL.
    #[must_use]
    pub fn flag(mut self, flag: impl Into<OsString>) -> Self {
        self.extra_args.push(flag.into());
        self
    }

    /// Build the invocation for `request`.
    pub fn build(self, request: &DownloadRequest) -> YtDlpInvocation {
        let mut args: Vec<OsString> = vec!["--newline".into()];

        match &request.format {
            MediaFormat::AudioOnly => {
                args.push("-x".into());
                args.push("--audio-format".into());
                args.push(AUDIO_FORMAT.into());
                args.push("--audio-quality".into());
                args.push(request.audio_quality.clone().into());
            }
            MediaFormat::Video { selector } => {
                args.push("-f".into());
                args.push(selector.clone().into());
                args.push("--merge-output-format".into());
                args.push(MERGE_FORMAT.into());
            }
        }

        args.push("-o".into());
        args.push(self.output_dir.join(OUTPUT_TEMPLATE).into_os_string());
        args.extend(self.extra_args);

        // Everything after `--` is positional, so a URL can never be read as an option
        args.push("--".into());
        args.push(request.url.clone().into());

        YtDlpInvocation {
            program: self.binary_path,
            args,
            working_dir: self.output_dir,
        }
    }
}

/// A fully resolved yt-dlp command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
}

impl YtDlpInvocation {
    /// Build a tokio `Command` with piped output, ready to spawn.
    ///
    /// The child is killed if its handle is dropped before it exits.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Arguments rendered for logging.
    pub fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
