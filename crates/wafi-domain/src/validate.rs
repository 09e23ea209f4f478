//! Form field rules shared by the service and the client.

const ACCENTED_NAME_CHARS: &str = "ÀàÂâÄäÈèÉéÊêËëÎîÏïÔôÖöÙùÛûÜüÇç'-";

/// Letters (including French accented letters), whitespace, apostrophe and hyphen.
pub fn is_person_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphabetic() || c.is_whitespace() || ACCENTED_NAME_CHARS.contains(c)
        })
}

pub fn is_phone_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// `local@domain.tld` with no whitespace.
pub fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}
