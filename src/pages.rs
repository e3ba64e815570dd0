//! The two HTML views the service renders itself: the not-found page for
//! unmatched routes and the fallback shown when a handler panics.

use std::fmt::Write;

const SHORTCUTS: &[(&str, &str)] = &[
    ("/apply", "Join our Waitlist"),
    ("/interest", "Join Waitlist"),
];

fn open(output: &mut String, title: &str) {
    let _ = writeln!(output, "<!doctype html>");
    let _ = writeln!(output, "<html lang=\"en\">");
    let _ = writeln!(
        output,
        "<head><meta charset=\"utf-8\"><title>{title} | Concordia House</title></head>"
    );
    let _ = writeln!(output, "<body>");
    let _ = writeln!(output, "<main>");
}

fn close(output: &mut String) {
    let _ = writeln!(output, "</main>");
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");
}

pub fn not_found() -> String {
    let mut output = String::new();

    open(&mut output, "Page Not Found");
    let _ = writeln!(output, "<h1>404</h1>");
    let _ = writeln!(output, "<h2>Page Not Found</h2>");
    let _ = writeln!(
        output,
        "<p>The page you're looking for doesn't exist or has been moved.</p>"
    );
    let _ = writeln!(output, "<nav>");
    let _ = writeln!(output, "<a href=\"/\">Go Home</a>");
    for (href, label) in SHORTCUTS {
        let _ = writeln!(output, "<a href=\"{href}\">{label}</a>");
    }
    let _ = writeln!(output, "</nav>");
    close(&mut output);

    output
}

/// `detail` is only passed in development.
pub fn fallback(detail: Option<&str>) -> String {
    let mut output = String::new();

    open(&mut output, "Something went wrong");
    let _ = writeln!(output, "<h1>Oops!</h1>");
    let _ = writeln!(output, "<p>Something went wrong. Don't worry, we're on it!</p>");
    let _ = writeln!(output, "<nav>");
    let _ = writeln!(output, "<a href=\"javascript:location.reload()\">Try Again</a>");
    let _ = writeln!(output, "<a href=\"/\">Go Home</a>");
    let _ = writeln!(output, "</nav>");

    if let Some(detail) = detail {
        let _ = writeln!(output, "<pre>{}</pre>", escape(detail));
    }

    close(&mut output);

    output
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
