//! Translate media operations into engine command lines.

use toolbox_core::types::{OCTET_STREAM, extension_from_mime, mime_from_name, with_extension};
use toolbox_core::{AudioFormat, ConvertOptions, MediaOp, SelectedFile, ToolError, ToolboxConfig, VideoContainer};

use crate::engine::EngineCommand;

/// A ready-to-run engine command plus the name the user downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaJob {
    pub command: EngineCommand,
    pub display_name: String,
}

/// Time window applied to the input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Window {
    start: Option<f64>,
    duration: Option<f64>,
}

impl Window {
    fn from_options(options: &ConvertOptions) -> Result<Self, ToolError> {
        if let Some(start) = options.start
            && (!start.is_finite() || start < 0.0)
        {
            return Err(ToolError::InvalidInput(format!(
                "start must be a non-negative number of seconds, got {start}"
            )));
        }
        if let Some(duration) = options.duration
            && (!duration.is_finite() || duration <= 0.0)
        {
            return Err(ToolError::InvalidInput(format!(
                "duration must be a positive number of seconds, got {duration}"
            )));
        }
        Ok(Self {
            start: options.start,
            duration: options.duration,
        })
    }

    const fn is_empty(self) -> bool {
        self.start.is_none() && self.duration.is_none()
    }
}

fn seconds(s: f64) -> String {
    format!("{s:.3}")
}

/// Name the input is staged under: `input.<ext>`, keeping the source
/// extension so the engine can probe the container. Files without a usable
/// extension take the one registered for their MIME type.
fn staged_input_name(file: &SelectedFile) -> String {
    let ext = file
        .extension()
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .or_else(|| extension_from_mime(&file.mime_type).map(str::to_owned))
        .unwrap_or_else(|| "bin".to_owned());
    format!("input.{ext}")
}

fn audio_codec_args(format: AudioFormat) -> &'static [&'static str] {
    match format {
        AudioFormat::Mp3 => &["-c:a", "libmp3lame", "-q:a", "2"],
        AudioFormat::Wav => &["-c:a", "pcm_s16le"],
        AudioFormat::Aac => &["-c:a", "aac", "-b:a", "192k"],
        AudioFormat::Ogg => &["-c:a", "libvorbis", "-q:a", "5"],
    }
}

fn video_codec_args(container: VideoContainer) -> &'static [&'static str] {
    match container {
        VideoContainer::Mp4 => &[
            "-c:v", "libx264", "-preset", "veryfast", "-crf", "23", "-c:a", "aac", "-movflags",
            "+faststart",
        ],
        VideoContainer::Webm => &["-c:v", "libvpx-vp9", "-crf", "32", "-b:v", "0", "-c:a", "libopus"],
        VideoContainer::Mov => &["-c:v", "libx264", "-crf", "23", "-c:a", "aac"],
    }
}

/// Build the engine job for `op` over `file`.
///
/// # Errors
///
/// Returns [`ToolError::UnsupportedFormat`] if `file` is not media `op`
/// accepts, and [`ToolError::InvalidInput`] for bad times, a zero frame
/// rate or width, or a trim without a window.
pub fn build_job(
    op: MediaOp,
    file: &SelectedFile,
    options: &ConvertOptions,
    config: &ToolboxConfig,
) -> Result<MediaJob, ToolError> {
    if !op.accepts(file) {
        return Err(ToolError::UnsupportedFormat(format!(
            "{} ({}) is not a supported media file",
            file.name,
            if file.mime_type.is_empty() { OCTET_STREAM } else { file.mime_type.as_str() },
        )));
    }

    let window = Window::from_options(options)?;
    let input_name = staged_input_name(file);
    let source_ext = input_name
        .rsplit_once('.')
        .map_or("bin", |(_, ext)| ext)
        .to_owned();

    let (ext, mime, codec_args): (String, String, Vec<String>) = match op {
        MediaOp::ExtractAudio(format) => (
            format.extension().to_owned(),
            format.mime_type().to_owned(),
            std::iter::once("-vn")
                .chain(audio_codec_args(format).iter().copied())
                .map(str::to_owned)
                .collect(),
        ),
        MediaOp::Transcode(container) => (
            container.extension().to_owned(),
            container.mime_type().to_owned(),
            video_codec_args(container).iter().map(|s| (*s).to_owned()).collect(),
        ),
        MediaOp::Trim => {
            if window.is_empty() {
                return Err(ToolError::InvalidInput(
                    "trim needs a start or a duration".into(),
                ));
            }
            (
                source_ext.clone(),
                source_mime(file, &source_ext),
                vec!["-c".into(), "copy".into()],
            )
        }
        MediaOp::Mute => (
            source_ext.clone(),
            source_mime(file, &source_ext),
            vec!["-c:v".into(), "copy".into(), "-an".into()],
        ),
        MediaOp::Gif => {
            let fps = options.fps.unwrap_or(config.gif_fps);
            let width = options.width.unwrap_or(config.gif_width);
            if fps == 0 || width == 0 {
                return Err(ToolError::InvalidInput(
                    "gif frame rate and width must be positive".into(),
                ));
            }
            (
                "gif".to_owned(),
                "image/gif".to_owned(),
                vec![
                    "-vf".into(),
                    format!("fps={fps},scale={width}:-1:flags=lanczos"),
                    "-loop".into(),
                    "0".into(),
                ],
            )
        }
    };

    let output_name = format!("output.{ext}");
    let mut args = Vec::with_capacity(codec_args.len() + 7);
    if let Some(start) = window.start {
        args.extend(["-ss".to_owned(), seconds(start)]);
    }
    args.extend(["-i".to_owned(), input_name.clone()]);
    if let Some(duration) = window.duration {
        args.extend(["-t".to_owned(), seconds(duration)]);
    }
    args.extend(codec_args);
    args.push(output_name.clone());

    Ok(MediaJob {
        command: EngineCommand {
            input_name,
            args,
            output_name,
            output_mime: mime,
        },
        display_name: with_extension(&file.name, &ext),
    })
}

fn source_mime(file: &SelectedFile, ext: &str) -> String {
    if file.mime_type.is_empty() || file.mime_type == OCTET_STREAM {
        mime_from_name(&format!("x.{ext}")).to_owned()
    } else {
        file.mime_type.clone()
    }
}
