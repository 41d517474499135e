use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) fn validate_audio_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "mp3" => matches!(mime, "audio/mpeg" | "audio/mp3"),
        "m4a" => matches!(mime, "audio/mp4" | "audio/x-m4a" | "audio/m4a"),
        "wav" => matches!(mime, "audio/wav" | "audio/x-wav" | "audio/wave"),
        "ogg" => matches!(mime, "audio/ogg" | "application/ogg"),
        "webm" => matches!(mime, "audio/webm" | "video/webm"),
        _ => false,
    }
}

pub(crate) fn sanitized_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_upload_accepts_known_extension_and_mime() {
        let allowed = vec!["mp3".to_string(), "wav".to_string()];
        assert!(validate_audio_upload("take-one.mp3", "audio/mpeg", &allowed).is_ok());
        assert!(validate_audio_upload("take.WAV", "audio/wav", &allowed).is_ok());
    }

    #[test]
    fn audio_upload_rejects_mismatched_mime() {
        let allowed = vec!["mp3".to_string()];
        assert!(validate_audio_upload("take.mp3", "image/png", &allowed).is_err());
    }

    #[test]
    fn audio_upload_rejects_unlisted_extension() {
        let allowed = vec!["mp3".to_string()];
        assert!(validate_audio_upload("take.flac", "audio/flac", &allowed).is_err());
        assert!(validate_audio_upload("no-extension", "audio/mpeg", &allowed).is_err());
    }

    #[test]
    fn sanitized_filename_replaces_unsafe_chars() {
        assert_eq!(sanitized_filename("my answer (1).mp3"), "my_answer__1_.mp3");
        assert_eq!(sanitized_filename("../../etc/passwd"), "______etc_passwd");
        assert_eq!(sanitized_filename(""), "file");
    }
}
