/// `mailto:` URL with the subject and body run through `encodeURIComponent`.
pub fn mailto(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{recipient}?subject={}&body={}",
        encode_component(subject),
        encode_component(body)
    )
}

fn encode_component(value: &str) -> String {
    js_sys::encode_uri_component(value)
        .as_string()
        .unwrap_or_else(|| value.to_owned())
}
