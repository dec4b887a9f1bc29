//! Minimal HTML rendering for the agreement flow.
//!
//! The module's single seam to presentation: handlers pass data in,
//! self-contained HTML comes out. Swapping this for a real template
//! engine does not touch the handlers. All interpolated values are
//! escaped; the terms text is rendered inside `<pre>` verbatim.

use terms_core::{AgreementChallenge, Terms};

/// Escape a string for interpolation into HTML text or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Render the agreement form: the latest terms text plus the hidden
/// challenge fields, with an optional error from a rejected submission.
pub fn agree_page(
    terms: &Terms,
    challenge: &AgreementChallenge,
    next: &str,
    error: Option<&str>,
) -> String {
    let error_block = match error {
        Some(message) => format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>Terms of Service, version {version}</title></head>\n\
         <body>\n\
         <h1>Terms of Service, version {version}</h1>\n\
         {error_block}\
         <pre>{text}</pre>\n\
         <form method=\"post\" action=\"\">\n\
         <input type=\"hidden\" name=\"identity_ref\" value=\"{identity_ref}\">\n\
         <input type=\"hidden\" name=\"terms_ref\" value=\"{terms_ref}\">\n\
         <input type=\"hidden\" name=\"timestamp\" value=\"{timestamp}\">\n\
         <input type=\"hidden\" name=\"integrity_tag\" value=\"{integrity_tag}\">\n\
         <input type=\"hidden\" name=\"next\" value=\"{next}\">\n\
         <label><input type=\"checkbox\" name=\"accept\"> I accept the terms</label>\n\
         <button type=\"submit\">Agree</button>\n\
         </form>\n\
         </body>\n\
         </html>\n",
        version = terms.version,
        error_block = error_block,
        text = escape_html(&terms.text),
        identity_ref = escape_html(challenge.identity_ref.as_str()),
        terms_ref = challenge.terms_ref,
        timestamp = challenge.timestamp,
        integrity_tag = escape_html(&challenge.integrity_tag),
        next = escape_html(next),
    )
}

/// Render a read-only view of a terms version.
pub fn show_page(terms: &Terms) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>Terms of Service, version {version}</title></head>\n\
         <body>\n\
         <h1>Terms of Service, version {version}</h1>\n\
         <p>Published {created_at}</p>\n\
         <pre>{text}</pre>\n\
         </body>\n\
         </html>\n",
        version = terms.version,
        created_at = terms.created_at.format("%Y-%m-%d %H:%M UTC"),
        text = escape_html(&terms.text),
    )
}
