use camino::Utf8Path;

/// Extensions the comparison service can read (Excel workbooks).
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Check whether a path has one of the supported tabular extensions.
///
/// The comparison is case-insensitive. Content is not inspected; the service
/// reports unreadable files through column discovery.
pub fn is_supported_table_file(path: &Utf8Path) -> bool {
    path.extension()
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Hint shown next to the file picker.
pub fn supported_extensions_hint() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(" or ")
}
