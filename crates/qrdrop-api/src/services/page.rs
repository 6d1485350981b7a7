//! Hand-off page markup.

use qrdrop_core::constants::UPLOAD_FILE_FIELD;
use qrdrop_core::UploadToken;

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Self-contained upload form posting a single file back to the token's path.
pub fn render_upload_form(token: &UploadToken) -> String {
    let action = escape_html(&token.upload_path());
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Upload Image</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        form {{ display: flex; flex-direction: column; gap: 1rem; max-width: 24rem; }}
    </style>
</head>
<body>
    <h1>Upload Image</h1>
    <form action="{action}" method="post" enctype="multipart/form-data">
        <input type="file" name="{field}" accept="image/*" required>
        <button type="submit">Upload</button>
    </form>
</body>
</html>
"#,
        action = action,
        field = UPLOAD_FILE_FIELD,
    )
}
