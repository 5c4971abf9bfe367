use crate::config::{ExportOptions, SendOptions};
use crate::error::{MailforgeError, MailforgeResult};
use crate::transpiler::transpile;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Compatibility rules prepended to every send body.
const SEND_STYLESHEET: &str = r#"<style type="text/css">
    table[align="center"] { margin-left: auto; margin-right: auto; }
    table[align="right"] { margin-left: auto; }
    td[align="center"] { text-align: center !important; }
    td[align="right"] { text-align: right !important; }
    td[align="left"] { text-align: left !important; }
    a { text-decoration: none; }
    a[href] { color: inherit; }
    img { border: 0; display: block; }
    .button { display: inline-block; padding: 12px 25px; text-decoration: none; border-radius: 5px; font-weight: bold; font-size: inherit; }
    a[data-type="button"] {
        display: inline-block !important;
        padding: 12px 25px !important;
        text-decoration: none !important;
        font-weight: bold !important;
        background-color: #3498db !important;
        color: white !important;
        border-radius: 5px !important;
        text-align: center !important;
        mso-padding-alt: 12px 25px !important;
        mso-line-height-rule: exactly !important;
    }
    hr { border: 0; border-top: 1px solid #ccc; margin: 20px 0; }
    .spacer { font-size: 1px; line-height: 1px; }
    * { -webkit-text-size-adjust: none; }
    a, span, p, div { font-size: inherit; }
</style>"#;

/// Wrap transpiled markup in a complete `<!DOCTYPE html>` document with a
/// single centered, width-constrained content table.
pub fn export_document(clean_html: &str, options: &ExportOptions) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
    body {{ margin: 0; padding: 0; background-color: {page_bg}; }}
    table {{ border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt; }}
    img {{ max-width: 100%; height: auto; display: block; }}
</style>
</head>
<body>
<table role="presentation" cellspacing="0" cellpadding="0" border="0" align="center" width="100%" style="max-width: {max_width}px;">
    <tr>
        <td style="padding: {padding}; background-color: {content_bg};">
            {content}
        </td>
    </tr>
</table>
</body>
</html>"#,
        title = encode_text(&options.title),
        page_bg = options.page_background,
        max_width = options.max_width,
        padding = encode_double_quoted_attribute(&options.content_padding),
        content_bg = encode_double_quoted_attribute(&options.content_background),
        content = clean_html,
    )
}

/// Wrap transpiled markup in the body handed to the mail composer.
///
/// `background` is the editor canvas color; `None`, blank or `transparent`
/// falls back to [`SendOptions::fallback_background`].
pub fn send_document(clean_html: &str, background: Option<&str>, options: &SendOptions) -> String {
    let background = background
        .map(str::trim)
        .filter(|bg| !bg.is_empty() && !bg.eq_ignore_ascii_case("transparent"))
        .unwrap_or(options.fallback_background.as_str());

    format!(
        "<div style=\"background-color: {}; padding: 1px;\">\n{}\n{}\n</div>",
        encode_double_quoted_attribute(background),
        SEND_STYLESHEET,
        clean_html
    )
}

/// Transpile `raw` editor markup and wrap it with [`export_document`].
pub fn export_html(raw: &str, options: &ExportOptions) -> MailforgeResult<String> {
    let clean = non_empty(transpile(raw)?)?;
    Ok(export_document(&clean, options))
}

/// Transpile `raw` editor markup and wrap it with [`send_document`].
pub fn send_preview_html(
    raw: &str,
    background: Option<&str>,
    options: &SendOptions,
) -> MailforgeResult<String> {
    let clean = non_empty(transpile(raw)?)?;
    Ok(send_document(&clean, background, options))
}

fn non_empty(clean: String) -> MailforgeResult<String> {
    if clean.trim().is_empty() {
        Err(MailforgeError::EmptyDocument)
    } else {
        Ok(clean)
    }
}
