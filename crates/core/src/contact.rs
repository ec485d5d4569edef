use folio_protocol::Effect;

use crate::config::ContactConfig;

/// Raw values read from the contact form. Missing fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Cleaned-up contact request, ready to be turned into a `mailto:` link.
#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Inquiry {
    pub fn from_fields(fields: &ContactFields, config: &ContactConfig) -> Self {
        Self {
            name: clean(fields.name.as_deref(), config.max_name),
            email: clean(fields.email.as_deref(), config.max_email),
            message: clean(fields.message.as_deref(), config.max_message),
        }
    }

    pub fn subject(&self, config: &ContactConfig) -> String {
        let who = if self.name.is_empty() {
            config.anonymous_name.as_str()
        } else {
            self.name.as_str()
        };
        format!("{}{}", config.subject_prefix, who)
    }

    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
            self.name, self.email, self.message
        )
    }

    /// The draft the bridge should open.
    pub fn draft(&self, config: &ContactConfig) -> Effect {
        Effect::ComposeMail {
            recipient: config.recipient.clone(),
            subject: self.subject(config),
            body: self.body(),
        }
    }
}

/// Form submission: no request is sent, the page opens a prefilled mail
/// draft instead.
pub fn submit(fields: &ContactFields, config: &ContactConfig) -> Vec<Effect> {
    let inquiry = Inquiry::from_fields(fields, config);
    log::debug!(
        "contact: {} chars of message from {:?}",
        inquiry.message.chars().count(),
        inquiry.name
    );
    vec![inquiry.draft(config)]
}

/// Trim, unify line endings, then keep at most `max` characters.
fn clean(raw: Option<&str>, max: usize) -> String {
    // browsers also trim a byte order mark
    let trimmed = raw
        .unwrap_or_default()
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let normalized = trimmed.replace("\r\n", "\n").replace('\r', "\n");
    normalized.chars().take(max).collect()
}
