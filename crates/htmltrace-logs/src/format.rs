//! HTML rendering of the page header and of single entries

use chrono::{DateTime, Local};
use htmltrace_core::{ENTRY_TIMESTAMP_FORMAT, ROTATION_STAMP_FORMAT};
use std::borrow::Cow;
use std::fmt;

/// Page preamble written once at the top of every active file.
///
/// Pressing `L` in the browser prompts for a regular expression and keeps
/// only the matching lines.
pub const PAGE_HEADER: &str = r#"<!DOCTYPE html>
<meta content="text/html;charset=utf-8" http-equiv="Content-Type">
<script>
var original_html = null;
var filter = '';
function filter_log()
{
    document.body.style.cursor = 'wait';
    if (original_html == null) {
        original_html = document.body.innerHTML;
    }
    if (filter == '') {
        document.body.innerHTML = original_html;
    } else {
        l = original_html.split("<br>");
        var pattern = new RegExp(".*" + filter.replace('"', '\\"') + ".*", "i");
        final_html = '';
        for(var i=0; i<l.length; i++){
            if (pattern.test(l[i]))
                final_html += l[i] + '<br>';
        }
        document.body.innerHTML = final_html;
    }
    document.body.style.cursor = 'default';
}

document.onkeydown = function(event) {
    if (event.keyCode == 76) {
        var ret = prompt("Enter the filter regular expression. Examples:\n\nCheckFirmwareUpdate\n\nID=1 |ID=2 \n\nID=2 .*Got message\n\n2012-08-31 16:.*(ID=1 |ID=2 )\n\n", filter);
        if (ret != null) {
            filter = ret;
            filter_log();
        }
        return false;
    }
}
</script>
<STYLE TYPE="text/css">
<!--
BODY
{
  color:white;
  background-color:black;
  font-family:monospace, sans-serif;
}
-->
</STYLE>
<body bgcolor="black" text="white">
<font color="white">"#;

/// An HTML color name used to tag an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(Cow<'static, str>);

impl Color {
    pub const WHITE: Color = Color(Cow::Borrowed("white"));
    pub const RED: Color = Color(Cow::Borrowed("red"));
    pub const LIGHT_SALMON: Color = Color(Cow::Borrowed("LightSalmon"));
    pub const LIGHT_GREEN: Color = Color(Cow::Borrowed("lightgreen"));
    pub const LIGHT_BLUE: Color = Color(Cow::Borrowed("lightblue"));
    pub const YELLOW: Color = Color(Cow::Borrowed("yellow"));
    pub const CYAN: Color = Color(Cow::Borrowed("cyan"));

    /// Any name a browser understands (`"orchid"`, `"#ff8800"`, ...)
    pub fn named(name: impl Into<String>) -> Self {
        Color(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Self {
        Color::named(name)
    }
}

impl From<String> for Color {
    fn from(name: String) -> Self {
        Color::named(name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed preamble of a new active file
pub fn render_header() -> &'static str {
    PAGE_HEADER
}

/// Render one entry: `<br>` marker, then `timestamp - [user_tag - ]message`
/// inside a font tag of the given color.
pub fn render_entry(
    timestamp: &DateTime<Local>,
    user_tag: &str,
    color: &Color,
    message: &str,
) -> String {
    let tag = if user_tag.is_empty() {
        String::new()
    } else {
        format!("{} - ", user_tag)
    };
    format!(
        "\n<br></font><font color=\"{}\">{} - {}{}",
        color,
        timestamp.format(ENTRY_TIMESTAMP_FORMAT),
        tag,
        message
    )
}

/// Escape `<` and `>` so text renders literally inside the page.
/// Nothing else is escaped.
pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Join positional values with single spaces
pub fn join_args(args: &[&dyn fmt::Display]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prefix given to a file rotated at `now`
pub fn rotation_stamp(now: &DateTime<Local>) -> String {
    now.format(ROTATION_STAMP_FORMAT).to_string()
}
