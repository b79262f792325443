//! Short text fields.

use serde_json::{json, Value};

builder! {
    /// A short comment of 1 to 5000 characters.
    comment => json!({
        "title": "Comment",
        "description": "A short comment.",
        "type": "string",
        "minLength": 1,
        "maxLength": 5000,
        "errors": {
            "invalid": "The comment contains invalid characters or is more than 5000 characters in length.",
            "missing": "Please enter a comment."
        }
    })
}

builder! {
    /// A description of up to 5000 characters; may be empty.
    description => json!({
        "title": "Description",
        "description": "A description.",
        "type": "string",
        "minLength": 0,
        "maxLength": 5000,
        "errors": {
            "invalid": "The description contains invalid characters or is more than 5000 characters in length.",
            "missing": "Please enter a description."
        }
    })
}

builder! {
    label => json!({
        "title": "Label",
        "description": "A short, descriptive label.",
        "type": "string",
        "pattern": PRINTABLE,
        "minLength": 1,
        "maxLength": 200,
        "errors": {
            "invalid": "The label contains invalid characters or is not between 1 and 200 characters in length.",
            "missing": "Please enter a label."
        }
    })
}

builder! {
    title => json!({
        "title": "Title",
        "description": "A descriptive title.",
        "type": "string",
        "pattern": PRINTABLE,
        "minLength": 1,
        "maxLength": 200,
        "errors": {
            "invalid": "The title contains invalid characters or is not between 1 and 200 characters in length.",
            "missing": "Please enter a title."
        }
    })
}

builder! {
    /// A single use secure unique string of 8 to 64 characters.
    nonce => json!({
        "title": "Nonce",
        "description": "A single use secure unique string.",
        "type": "string",
        "pattern": r"^[-a-zA-Z0-9~!$%^&*\(\)_=+\. ]*$",
        "minLength": 8,
        "maxLength": 64,
        "errors": {
            "invalid": "The nonce contains invalid characters or is not between 8 and 64 characters in length.",
            "missing": "Please enter a nonce."
        }
    })
}

builder! {
    person_name => json!({
        "title": "Person Name",
        "description": "The name of a person.",
        "type": "string",
        "pattern": r"^\S$|^\S.*\S$",
        "minLength": 1,
        "maxLength": 100,
        "errors": {
            "invalid": "The name must not start or end with whitespace and must be between 1 and 100 characters in length.",
            "missing": "Please enter a name."
        }
    })
}

builder! {
    /// A short identifier within a URL.
    slug => json!({
        "required": true,
        "title": "Slug",
        "description": "A short identifier within a URL.",
        "type": "string",
        "pattern": r"^[a-z0-9][-a-z0-9~_\.]*$",
        "minLength": 3,
        "maxLength": 40,
        "errors": {
            "invalid": "The slug must start with a letter or number, contain only lowercase letters, numbers, hyphens, periods, underscores, and tildes. It must between 3 and 40 characters in length.",
            "missing": "Please enter a slug."
        }
    })
}

builder! {
    url => json!({
        "required": true,
        "title": "URL",
        "description": "A universal resource location.",
        "type": "string",
        "minLength": 1,
        "errors": {
            "invalid": "Please enter a valid URL.",
            "missing": "Please enter a URL."
        }
    })
}

builder! {
    /// A W3C date/time such as `1997-07-16T19:20:30Z`; the zone is optional.
    w3c_date_time => json!({
        "title": "W3C Date/Time",
        "description": "A W3C-formatted date and time combination.",
        "type": "string",
        "pattern": r"^[1-9][0-9]{3}-(0[1-9]|1[0-2])-([0-2][0-9]|3[0-1])T([0-1][0-9]|2[0-3]):([0-5][0-9]):(([0-5][0-9])|60)(\.[0-9]+)?(Z|((\+|-)([0-1][0-9]|2[0-3]):([0-5][0-9])))?$",
        "errors": {
            "invalid": "The date/time must be of the W3C date/time format \"YYYY-MM-DD( |T)HH:MM:SS.s(Z|(+|-)TZOFFSET)\".",
            "missing": "Please enter a date/time."
        }
    })
}

const PRINTABLE: &str = r#"^[-a-zA-Z0-9~`!@#$%^&*\(\)\[\]{}<>_=+\\|:;'"\.,/? ]*$"#;

const EMAIL: &str = r"^[-a-zA-Z0-9~!$%^&*_=+}{'?]+(\.[-a-zA-Z0-9~!$%^&*_=+}{'?]+)*@(((([a-zA-Z0-9]{1}[a-zA-Z0-9\-]{0,62}[a-zA-Z0-9]{1})|[a-zA-Z])\.)+[a-zA-Z]{2,6})$";

const EMAIL_LOWER_CASE: &str = r"^[-a-z0-9~!$%^&*_=+}{'?]+(\.[-a-z0-9~!$%^&*_=+}{'?]+)*@(((([a-z0-9]{1}[a-z0-9\-]{0,62}[a-z0-9]{1})|[a-z])\.)+[a-z]{2,6})$";

/// Options for [`email`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailOptions {
    /// Reject addresses with uppercase characters, unless the extension
    /// data brings its own `pattern`.
    pub lower_case_only: bool,
}

/// An email address of up to 100 characters.
pub fn email(ext: Option<&Value>, options: EmailOptions) -> Value {
    static BASE: std::sync::OnceLock<Value> = std::sync::OnceLock::new();
    let base = BASE.get_or_init(|| {
        json!({
            "required": true,
            "title": "Email",
            "description": "An email address.",
            "type": "string",
            "pattern": EMAIL,
            "minLength": 1,
            "maxLength": 100,
            "errors": {
                "invalid": "The email address is invalid.",
                "missing": "Please enter an email address."
            }
        })
    });

    if !options.lower_case_only {
        return crate::build(base, ext);
    }
    let mut ext = match ext {
        Some(Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    };
    ext.entry("pattern").or_insert_with(|| json!(EMAIL_LOWER_CASE));
    crate::build(base, Some(&Value::Object(ext)))
}
