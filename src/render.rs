//! HTML rendering for the version page

use crate::handler::VersionAge;

/// Escapes text for use inside HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the page answering "how old is Minecraft <id>?"
pub fn version_page(view: &VersionAge) -> String {
    let id = escape_html(&view.id);
    let anniversary = if view.is_anniversary {
        format!(
            "\n    <p class=\"anniversary\">Happy birthday, Minecraft {}!</p>",
            id
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>How old is Minecraft {id}?</title>
</head>
<body>
    <h1>How old is Minecraft {id}?</h1>
    <p class="age">Minecraft {id} is {age} old.</p>{anniversary}
    <p class="released">Released <time datetime="{released}">{released}</time></p>
</body>
</html>
"#,
        id = id,
        age = escape_html(&view.age),
        anniversary = anniversary,
        released = escape_html(&view.release_time),
    )
}
