//! HTML rendering
//!
//! Server-side rendering of the single demo page: title, sidebar toggles,
//! upload form, and the results of the last upload.

use base64::Engine;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::document::ACCEPTED_EXTENSIONS;
use crate::pipeline::{ProcessedUpload, RunOptions};

const STYLES: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", Helvetica, Arial, sans-serif; background-color: #f5f7fa; color: #2c3e50; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 260px; padding: 24px; background: #f0f2f6; box-sizing: border-box; }
.sidebar h2 { margin-top: 0; }
.sidebar label { display: block; margin: 12px 0; cursor: pointer; }
.main { flex: 1; max-width: 960px; margin: 0 auto; padding: 32px; }
.title { font-size: 40px; font-weight: 700; color: #2C3E50; text-align: center; }
.subtitle { font-size: 18px; color: #34495E; text-align: center; }
.card { background: white; padding: 25px; border-radius: 12px; box-shadow: 0px 4px 15px rgba(0,0,0,0.08); margin-bottom: 30px; }
.upload-box { background: #ffffff; padding: 30px; border-radius: 12px; box-shadow: 0px 4px 10px rgba(0,0,0,0.05); text-align: center; border: 2px dashed #3498db; margin-bottom: 30px; }
.upload-box button { margin-top: 16px; padding: 8px 24px; border: none; border-radius: 6px; background: #3498db; color: white; font-size: 16px; cursor: pointer; }
.text-box { background: #ecf0f1; padding: 20px; border-radius: 10px; font-size: 16px; color: #2c3e50; white-space: pre-wrap; }
.error { background: #fdecea; color: #b71c1c; padding: 16px 20px; border-radius: 10px; margin-bottom: 30px; white-space: pre-wrap; }
.caption { text-align: center; color: #7f8c8d; font-size: 14px; }
figure { margin: 0; }
figure img { width: 100%; height: auto; }
"#;

/// What the page shows
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Toggle state for the sidebar
    pub options: RunOptions,
    pub result: Option<&'a ProcessedUpload>,
    pub error: Option<String>,
}

/// Render the full page
pub fn render_page(view: &PageView<'_>) -> String {
    let mut body = String::new();

    body.push_str(
        "<h1 class='title'>OCR++: Intelligent Scene Text Recognition</h1>\n\
         <p class='subtitle'>Extract text from images &amp; PDFs instantly</p>\n",
    );

    body.push_str(&upload_box());

    if let Some(error) = &view.error {
        body.push_str(&format!(
            "<div class='error'><strong>Error:</strong> {}</div>\n",
            encode_text(error)
        ));
    }

    if let Some(result) = view.result {
        body.push_str(&results(result));
    }

    format!(
        "<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n\
         <meta name='viewport' content='width=device-width, initial-scale=1'>\n\
         <title>OCR++</title>\n<style>{styles}</style>\n</head>\n<body>\n\
         <form method='post' action='/' enctype='multipart/form-data'>\n\
         <div class='layout'>\n{sidebar}<main class='main'>\n{body}</main>\n</div>\n\
         </form>\n</body>\n</html>\n",
        styles = STYLES,
        sidebar = sidebar(&view.options),
        body = body,
    )
}

fn sidebar(options: &RunOptions) -> String {
    format!(
        "<aside class='sidebar'>\n<h2>&#9881;&#65039;</h2>\n{}{}</aside>\n",
        checkbox("assume_straight_pages", "Assume Straight Pages", options.assume_straight_pages),
        checkbox("show_boxes", "Show Bounding Boxes", options.show_boxes),
    )
}

/// A checkbox preceded by a hidden `false`, so an unchecked box still submits
fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<input type='hidden' name='{name}' value='false'>\
         <label><input type='checkbox' name='{name}' value='true'{checked}> {label}</label>\n",
        name = name,
        label = encode_text(label),
        checked = if checked { " checked" } else { "" },
    )
}

fn upload_box() -> String {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "<div class='upload-box'>\n<p>Upload Image or PDF</p>\n\
         <input type='file' name='file' accept='{accept}' required>\n\
         <p class='caption'>{types}</p>\n\
         <button type='submit'>Extract Text</button>\n</div>\n",
        accept = encode_double_quoted_attribute(&accept),
        types = ACCEPTED_EXTENSIONS
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn results(result: &ProcessedUpload) -> String {
    let mut out = String::new();

    if let Some(preview) = &result.preview {
        out.push_str(&format!(
            "<div class='card'><figure><img src='{}' alt='Uploaded Image'>\
             <figcaption class='caption'>Uploaded Image</figcaption></figure></div>\n",
            data_uri(&preview.mime, &preview.data)
        ));
    }

    out.push_str(&format!(
        "<div class='card'>\n<h2>Extracted Text</h2>\n<div class='text-box'>{}</div>\n</div>\n",
        encode_text(&result.text)
    ));

    if let Some(png) = &result.overlay_png {
        out.push_str(&format!(
            "<div class='card'>\n<h2>Text Detection Boxes</h2>\n\
             <figure><img src='{}' alt='Text Detection Boxes'></figure>\n</div>\n",
            data_uri("image/png", png)
        ));
    }

    out
}

/// Inline `data:` URI for binary content
pub fn data_uri(mime: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}
