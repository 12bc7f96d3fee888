// ABOUTME: Content-Type and Content-Encoding inference from file names.
// ABOUTME: Compression suffixes set the encoding; the remaining name decides the type.

use std::path::Path;

const ENCODINGS: &[(&str, &str)] = &[
    (".gz", "gzip"),
    (".br", "br"),
    (".bz2", "bzip2"),
    (".xz", "xz"),
    (".Z", "compress"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentHeaders {
    pub content_type: Option<String>,
    pub content_encoding: Option<&'static str>,
}

pub fn infer(path: &Path) -> ContentHeaders {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return ContentHeaders::default();
    };

    let (name, content_encoding) = ENCODINGS
        .iter()
        .find_map(|(suffix, encoding)| {
            name.strip_suffix(suffix)
                .filter(|stem| !stem.is_empty())
                .map(|stem| (stem, Some(*encoding)))
        })
        .unwrap_or((name, None));

    ContentHeaders {
        content_type: mime_guess::from_path(name).first().map(|m| m.to_string()),
        content_encoding,
    }
}
