use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::{
    format_selector, DownloadProgress, DownloadRequest, Engine, MediaInfo, Quality,
};
use crate::error::{Error, Result};

const TOOL: &str = "yt-dlp";

/// Drives the `yt-dlp` executable as a child process.
pub struct YtDlp {
    binary: Option<PathBuf>,
    ffmpeg: bool,
}

impl YtDlp {
    /// Look up `yt-dlp` and `ffmpeg` on `PATH`. A missing `yt-dlp` only fails
    /// once it is actually needed; a missing `ffmpeg` limits format choices.
    pub fn new() -> Self {
        let binary = which::which(TOOL).ok();
        let ffmpeg = which::which("ffmpeg").is_ok();
        match &binary {
            Some(path) => debug!("Using {} at {}", TOOL, path.display()),
            None => debug!("{} not found on PATH", TOOL),
        }
        Self { binary, ffmpeg }
    }

    pub fn with_binary(binary: PathBuf, ffmpeg: bool) -> Self {
        Self {
            binary: Some(binary),
            ffmpeg,
        }
    }

    pub fn ffmpeg_available(&self) -> bool {
        self.ffmpeg
    }

    fn binary(&self) -> Result<&PathBuf> {
        self.binary.as_ref().ok_or_else(|| {
            Error::external(
                TOOL,
                "executable not found on PATH; install it from https://github.com/yt-dlp/yt-dlp",
            )
        })
    }

    pub fn probe_args(&self, url: &Url, cookies: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];
        if let Some(cookies) = cookies {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().into_owned());
        }
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    pub fn download_args(&self, url: &Url, request: &DownloadRequest) -> Vec<String> {
        let playlist = request.is_playlist(url);
        let audio = request.quality == Quality::Audio;

        let mut args: Vec<String> = [
            "--newline",
            "--progress",
            "--no-simulate",
            "--print",
            "after_move:%()j",
            "--format",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(format_selector(request.quality, self.ffmpeg));
        args.push("--output".to_string());
        args.push(request.output_template(playlist));

        if self.ffmpeg {
            if audio {
                args.extend(
                    ["--extract-audio", "--audio-format", "mp3", "--audio-quality", "192K"]
                        .map(String::from),
                );
            } else {
                args.push("--merge-output-format".to_string());
                args.push(request.container.ext().to_string());
            }
            if request.embed_metadata {
                args.push("--embed-metadata".to_string());
            }
        }

        if request.embed_thumbnail {
            args.push("--write-thumbnail".to_string());
            if self.ffmpeg {
                args.push("--embed-thumbnail".to_string());
            }
        }

        if let Some(langs) = &request.transcripts {
            args.extend(["--write-subs", "--write-auto-subs", "--sub-langs"].map(String::from));
            args.push(langs.join(","));
            args.push("--sub-format".to_string());
            args.push("vtt/srt/best".to_string());
        }

        if request.write_description {
            args.push("--write-description".to_string());
        }
        if request.write_info_json {
            args.push("--write-info-json".to_string());
        }
        if let Some(cookies) = &request.cookies_file {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().into_owned());
        }

        if playlist {
            // Keep going past individual failures inside a playlist.
            args.push("--yes-playlist".to_string());
            args.push("--ignore-errors".to_string());
        } else {
            args.push("--no-playlist".to_string());
        }

        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of `yt-dlp` output, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputLine {
    Finished(Box<MediaInfo>),
    Progress(DownloadProgress),
    Error(String),
    Warning(String),
    Other,
}

fn progress_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%(?:\s+of\s+~?\s*(\S+))?")
            .expect("progress pattern is valid")
    })
}

pub fn classify_line(line: &str) -> OutputLine {
    let line = line.trim();

    if line.starts_with('{') {
        return match serde_json::from_str::<MediaInfo>(line) {
            Ok(info) => OutputLine::Finished(Box::new(info)),
            Err(e) => {
                debug!("Ignoring unparseable JSON line from {}: {}", TOOL, e);
                OutputLine::Other
            }
        };
    }

    if let Some(caps) = progress_regex().captures(line) {
        let percent = caps[1].parse::<f32>().unwrap_or(0.0);
        return OutputLine::Progress(DownloadProgress {
            percent,
            total: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    if let Some(message) = line.strip_prefix("ERROR:") {
        return OutputLine::Error(message.trim().to_string());
    }
    if let Some(message) = line.strip_prefix("WARNING:") {
        return OutputLine::Warning(message.trim().to_string());
    }

    OutputLine::Other
}

fn take_line(buf: &mut Vec<u8>) -> String {
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    line
}

fn pipe_error(e: std::io::Error) -> Error {
    Error::external(TOOL, format!("lost contact with the process: {}", e))
}

#[async_trait]
impl Engine for YtDlp {
    fn name(&self) -> &'static str {
        TOOL
    }

    async fn probe(&self, url: &Url, cookies: Option<&Path>) -> Result<MediaInfo> {
        let binary = self.binary()?;
        let args = self.probe_args(url, cookies);
        debug!("Running {} {:?}", binary.display(), args);

        let output = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::external(TOOL, format!("failed to start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr
                .lines()
                .rev()
                .find_map(|l| l.trim().strip_prefix("ERROR:").map(|m| m.trim().to_string()))
                .unwrap_or_else(|| format!("exited with {}", output.status));
            return Err(Error::external(TOOL, message));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::external(TOOL, format!("unexpected metadata output: {}", e)))
    }

    async fn download(
        &self,
        url: &Url,
        request: &DownloadRequest,
        progress: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Vec<MediaInfo>> {
        let binary = self.binary()?;
        if !self.ffmpeg {
            warn!("ffmpeg not found; downloads are limited to single-file formats without embedding");
        }

        let args = self.download_args(url, request);
        debug!("Running {} {:?}", binary.display(), args);

        let mut child = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::external(TOOL, format!("failed to start: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::external(TOOL, "stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::external(TOOL, "stderr was not captured"))?;
        let mut out = BufReader::new(stdout);
        let mut err = BufReader::new(stderr);
        let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
        let (mut out_open, mut err_open) = (true, true);

        let mut finished = Vec::new();
        let mut last_error: Option<String> = None;

        // Progress may land on either stream depending on yt-dlp's quiet mode.
        // Lines are decoded lossily; titles and paths are not always UTF-8.
        while out_open || err_open {
            let line = tokio::select! {
                read = out.read_until(b'\n', &mut out_buf), if out_open => {
                    if read.map_err(pipe_error)? == 0 {
                        out_open = false;
                        continue;
                    }
                    take_line(&mut out_buf)
                }
                read = err.read_until(b'\n', &mut err_buf), if err_open => {
                    if read.map_err(pipe_error)? == 0 {
                        err_open = false;
                        continue;
                    }
                    take_line(&mut err_buf)
                }
            };

            match classify_line(&line) {
                OutputLine::Finished(info) => {
                    info!("Finished: {}", info.title.as_deref().unwrap_or(&info.id));
                    finished.push(*info);
                }
                OutputLine::Progress(p) => progress(p),
                OutputLine::Error(message) => {
                    warn!("{}: {}", TOOL, message);
                    last_error = Some(message);
                }
                OutputLine::Warning(message) => warn!("{}: {}", TOOL, message),
                OutputLine::Other => debug!("{}: {}", TOOL, line),
            }
        }

        let status = child.wait().await.map_err(pipe_error)?;
        if !status.success() {
            let message = last_error.unwrap_or_else(|| format!("exited with {}", status));
            if finished.is_empty() {
                return Err(Error::external(TOOL, message));
            }
            warn!(
                "{} reported errors but {} item(s) finished: {}",
                TOOL,
                finished.len(),
                message
            );
        }

        Ok(finished)
    }
}
