//! Where the command line writes a result when no output path is given.

use std::path::{Path, PathBuf};

use toolbox_core::types::{file_extension, file_stem};

/// Default output path for a run of `tool_id` over `input`: the result's
/// download name next to the input.
///
/// Tools that keep the source name (enhancements, mute, trim) would land
/// on `input` itself, so those results are named `<stem>-<tool_id>.<ext>`
/// instead. Names are compared ASCII case-insensitively, since `Photo.PNG`
/// and `Photo.png` are one file on case-insensitive filesystems.
#[must_use]
pub fn default_output_path(input: &Path, result_name: &str, tool_id: &str) -> PathBuf {
    let clashes = input
        .file_name()
        .is_some_and(|name| name.to_string_lossy().eq_ignore_ascii_case(result_name));
    if !clashes {
        return input.with_file_name(result_name);
    }

    let stem = file_stem(result_name);
    let renamed = match file_extension(result_name) {
        Some(ext) => format!("{stem}-{tool_id}.{ext}"),
        None => format!("{stem}-{tool_id}"),
    };
    input.with_file_name(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_results_go_next_to_the_input() {
        assert_eq!(
            default_output_path(Path::new("shots/photo.png"), "photo.jpg", "png-to-jpg"),
            Path::new("shots/photo.jpg")
        );
    }

    #[test]
    fn same_name_results_never_overwrite_the_input() {
        assert_eq!(
            default_output_path(Path::new("shots/photo.png"), "photo.png", "image-sharpener"),
            Path::new("shots/photo-image-sharpener.png")
        );
        assert_eq!(
            default_output_path(Path::new("Clip.MP4"), "Clip.mp4", "video-muter"),
            Path::new("Clip-video-muter.mp4")
        );
        assert_eq!(
            default_output_path(Path::new("/tmp/song.mp3"), "song.mp3", "audio-to-mp3"),
            Path::new("/tmp/song-audio-to-mp3.mp3")
        );
    }

    #[test]
    fn extensionless_names_get_a_suffix() {
        assert_eq!(
            default_output_path(Path::new("notes"), "notes", "uppercase"),
            Path::new("notes-uppercase")
        );
    }
}
