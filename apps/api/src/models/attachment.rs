use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A file carried inside a JSON payload (jobs, resources, rounds).
/// `filedata` is standard base64 without a `data:` prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Attachment {
    #[validate(length(min = 1, message = "File name is required"))]
    pub filename: String,
    #[validate(length(min = 1, message = "File type is required"))]
    pub filetype: String,
    #[validate(length(min = 1, message = "File content is required"))]
    pub filedata: String,
}

impl Attachment {
    /// Encodes raw bytes for JSON transport. No size or content-type limit is
    /// applied; the browser's `accept` hint is advisory only.
    pub fn encode(filename: impl Into<String>, filetype: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            filetype: filetype.into(),
            filedata: STANDARD.encode(bytes),
        }
    }
}

/// Single-file field (resume, vendor logo). Same content as [`Attachment`],
/// different key names on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValue {
    pub file_name: String,
    pub file_type: String,
    pub file_value: String,
}

impl From<Attachment> for FileValue {
    fn from(a: Attachment) -> Self {
        Self {
            file_name: a.filename,
            file_type: a.filetype,
            file_value: a.filedata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_binary_content() {
        let att = Attachment::encode("cv.pdf", "application/pdf", &[0x25, 0x50, 0x44, 0x46, 0x00, 0xff]);
        assert_eq!(att.filedata, "JVBERgD/");
        assert_eq!(
            STANDARD.decode(&att.filedata).unwrap(),
            vec![0x25, 0x50, 0x44, 0x46, 0x00, 0xff]
        );
    }

    #[test]
    fn test_file_value_wire_names() {
        let fv: FileValue = Attachment::encode("logo.png", "image/png", b"x").into();
        let json = serde_json::to_value(&fv).unwrap();
        assert_eq!(json["fileName"], "logo.png");
        assert_eq!(json["fileType"], "image/png");
        assert_eq!(json["fileValue"], "eA==");
    }
}
