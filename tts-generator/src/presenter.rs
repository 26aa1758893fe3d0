//! HTML rendering for the web UI.
//!
//! Every function returns a self-contained fragment so results can be
//! streamed to the browser one chunk at a time.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::fmt::Write as _;
use std::time::Duration;
use tts_client::voice::{
    MAX_PITCH, MAX_SPEAKING_RATE, MIN_PITCH, MIN_SPEAKING_RATE, PRESET_VOICES,
};
use tts_client::VoiceConfig;

use crate::audio::format_duration;
use crate::generator::SynthesisResult;

/// Characters of the uploaded text shown before generation starts.
pub const PREVIEW_CHARS: usize = 500;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
details{margin:1rem 0 .25rem}summary{cursor:pointer;font-weight:bold}\
.warning{background:#fff4d6;padding:.75rem;border-left:4px solid #e0a800}\
.error{background:#fde2e1;padding:.75rem;border-left:4px solid #d93025}\
.cost{color:red}audio{width:100%}label{display:block;margin-top:.75rem}";

/// Document head and page title.
pub fn page_start() -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Text to Speech</title>\n<style>{}</style>\n</head>\n<body>\n<h1>Text to Speech</h1>\n",
        STYLE
    )
}

/// Cost notice, setup notes, and closing tags.
pub fn page_end() -> String {
    concat!(
        "<p class=\"cost\"><strong>Important:</strong> Using the Text-to-Speech API incurs costs. ",
        "See <a href=\"https://cloud.google.com/text-to-speech/pricing\">pricing</a>.</p>\n",
        "<hr>\n<h2>Important Notes</h2>\n<ul>\n",
        "<li><strong>Google Cloud Project:</strong> the Text-to-Speech API must be enabled ",
        "on a project with billing.</li>\n",
        "<li><strong>Authentication:</strong> set <code>GOOGLE_API_KEY</code> or ",
        "<code>GOOGLE_OAUTH_ACCESS_TOKEN</code>, or run ",
        "<code>gcloud auth application-default login</code>.</li>\n",
        "<li><strong>Service Account Key (for deployment):</strong> point ",
        "<code>GOOGLE_APPLICATION_CREDENTIALS</code> at the JSON key supplied by your ",
        "hosting platform's secret storage.</li>\n",
        "<li><strong>Large Files:</strong> long documents are split into chunks and can be ",
        "slow and expensive to generate.</li>\n",
        "<li><strong>Encoding:</strong> files are read as UTF-8; invalid bytes are replaced.</li>\n",
        "</ul>\n</body>\n</html>\n"
    )
    .to_string()
}

/// Upload form with voice, speaking rate and pitch controls.
pub fn upload_form(defaults: &VoiceConfig) -> String {
    let mut options = String::new();
    for voice in PRESET_VOICES {
        let selected = if *voice == defaults.voice { " selected" } else { "" };
        let _ = writeln!(options, "<option value=\"{0}\"{1}>{0}</option>", voice, selected);
    }

    format!(
        "<form action=\"/generate\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <label>Choose a text file <input type=\"file\" name=\"file\" accept=\".txt,text/plain\"></label>\n\
         <details>\n<summary>Advanced Options</summary>\n\
         <label>Voice <select name=\"voice\">\n{options}</select></label>\n\
         <label>Speaking Rate <input type=\"number\" name=\"speaking_rate\" min=\"{rate_min}\" max=\"{rate_max}\" step=\"0.05\" value=\"{rate}\"></label>\n\
         <label>Pitch <input type=\"number\" name=\"pitch\" min=\"{pitch_min}\" max=\"{pitch_max}\" step=\"0.5\" value=\"{pitch}\"></label>\n\
         </details>\n\
         <p><button type=\"submit\">Generate Audio</button></p>\n</form>\n",
        options = options,
        rate_min = MIN_SPEAKING_RATE,
        rate_max = MAX_SPEAKING_RATE,
        rate = defaults.speaking_rate,
        pitch_min = MIN_PITCH,
        pitch_max = MAX_PITCH,
        pitch = defaults.pitch,
    )
}

/// The whole landing page.
pub fn index_page(defaults: &VoiceConfig) -> String {
    let mut page = page_start();
    page.push_str(&upload_form(defaults));
    page.push_str(&page_end());
    page
}

/// The first characters of the uploaded text.
pub fn preview(text: &str) -> String {
    let mut shown: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().nth(PREVIEW_CHARS).is_some() {
        shown.push_str("...");
    }
    format!(
        "<h2>Original Text (First {} Characters):</h2>\n<pre style=\"white-space:pre-wrap\">{}</pre>\n",
        PREVIEW_CHARS,
        escape_html(&shown)
    )
}

/// Expander with the chunk text, file name heading, player and download link.
pub fn chunk(result: &SynthesisResult) -> String {
    let filename = escape_html(&result.filename);
    let uri = data_uri(&result.audio);
    let duration = result
        .duration
        .map(|d| format!(" <small>({})</small>", format_duration(d)))
        .unwrap_or_default();

    format!(
        "<details>\n<summary>Processed chunk {index} of {total}</summary>\n<p>{text}</p>\n</details>\n\
         <h3>{filename}{duration}</h3>\n\
         <audio controls src=\"{uri}\"></audio>\n\
         <p><a download=\"{filename}\" href=\"{uri}\">Download {filename}</a></p>\n",
        index = result.index,
        total = result.total,
        text = escape_html(&result.text),
        filename = filename,
        duration = duration,
        uri = uri,
    )
}

/// Closing line after every chunk succeeded.
pub fn summary(results: &[SynthesisResult]) -> String {
    let total: Duration = results.iter().filter_map(|r| r.duration).sum();
    format!(
        "<p><strong>Done:</strong> {} chunk(s), {} of audio.</p>\n<p><a href=\"/\">Convert another file</a></p>\n",
        results.len(),
        format_duration(total)
    )
}

/// A user-facing warning (not an error).
pub fn warning(message: &str) -> String {
    format!("<p class=\"warning\">{}</p>\n<p><a href=\"/\">Back</a></p>\n", escape_html(message))
}

/// The single error message for a failed run.
pub fn error(message: &str) -> String {
    format!(
        "<p class=\"error\">Text-to-Speech Error: {}</p>\n<p class=\"error\">Audio generation failed.</p>\n<p><a href=\"/\">Back</a></p>\n",
        escape_html(message)
    )
}

/// `data:` URI carrying the WAV bytes.
pub fn data_uri(audio: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", BASE64.encode(audio))
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
