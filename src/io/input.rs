use std::path::Path;

use crate::error::{CallError, Result};
use crate::models::AudioAsset;

/// Infer a MIME type from the file extension alone
///
/// The file contents are never inspected, so a mislabeled file passes or
/// fails purely on its name.
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    let mime = match ext.as_str() {
        "mp3" | "mpga" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "flac" => "audio/flac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "aif" | "aiff" | "aifc" => "audio/x-aiff",
        "wma" => "audio/x-ms-wma",
        "webm" => "video/webm",
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => return None,
    };

    Some(mime)
}

/// Accept a path as an audio asset or reject it with `NotAudio`
pub fn load_audio_asset(path: &Path) -> Result<AudioAsset> {
    match guess_mime_type(path) {
        Some(mime_type) if mime_type.starts_with("audio/") => Ok(AudioAsset {
            path: path.to_path_buf(),
            mime_type,
        }),
        _ => Err(CallError::NotAudio {
            path: path.to_path_buf(),
        }),
    }
}
