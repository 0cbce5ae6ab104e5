use heck::{ToSnakeCase, ToUpperCamelCase};

// Words Go style keeps fully upper-cased inside identifiers.
const INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// Exported Go identifier for a proto field name: `user_id` → `UserID`.
pub fn camel_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in snake_name(name).split('_').filter(|w| !w.is_empty()) {
        out.push_str(&go_word(word));
    }
    if out.is_empty() {
        // Field named only with underscores.
        out.push('_');
    }
    out
}

/// JSON key for a proto field name: `userId` → `user_id`, `userIDs` →
/// `user_ids`.
pub fn snake_name(name: &str) -> String {
    fold_initialisms(name).to_snake_case()
}

fn go_word(word: &str) -> String {
    let upper = word.to_ascii_uppercase();
    if INITIALISMS.contains(&upper.as_str()) {
        return upper;
    }
    // Plural initialism: `ids` → `IDs`.
    if let Some(singular) = upper.strip_suffix('S') {
        if INITIALISMS.contains(&singular) {
            return format!("{singular}s");
        }
    }
    word.to_upper_camel_case()
}

// Rewrites upper-case initialisms inside camel case as one capitalised word
// (`userIDs` → `userIds`) so heck doesn't split them per letter.
fn fold_initialisms(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    let mut prev_upper = false;

    while let Some(c) = rest.chars().next() {
        let matched = if c.is_ascii_uppercase() && !prev_upper {
            initialism_at(rest)
        } else {
            None
        };
        match matched {
            Some(len) => {
                let (word, tail) = rest.split_at(len);
                out.push(c);
                out.push_str(&word[1..].to_ascii_lowercase());
                rest = tail;
                prev_upper = false;
            }
            None => {
                out.push(c);
                prev_upper = c.is_ascii_uppercase();
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

// Byte length of the longest initialism (optionally plural) starting `s`,
// when it ends on a word boundary.
fn initialism_at(s: &str) -> Option<usize> {
    let boundary = |tail: &str| !tail.starts_with(|c: char| c.is_ascii_lowercase());
    INITIALISMS
        .iter()
        .filter(|i| s.starts_with(*i))
        .filter_map(|i| {
            let tail = &s[i.len()..];
            match tail.strip_prefix('s') {
                Some(after) if boundary(after) => Some(i.len() + 1),
                _ if boundary(tail) => Some(i.len()),
                _ => None,
            }
        })
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_identifier_capitalises_words() {
        assert_eq!(camel_identifier("msg"), "Msg");
        assert_eq!(camel_identifier("shipping_address"), "ShippingAddress");
        assert_eq!(camel_identifier("createdAt"), "CreatedAt");
        assert_eq!(camel_identifier("_private"), "Private");
    }

    #[test]
    fn camel_identifier_upper_cases_initialisms() {
        assert_eq!(camel_identifier("id"), "ID");
        assert_eq!(camel_identifier("user_id"), "UserID");
        assert_eq!(camel_identifier("avatar_url"), "AvatarURL");
        assert_eq!(camel_identifier("http_status"), "HTTPStatus");
    }

    #[test]
    fn snake_name_splits_camel_case() {
        assert_eq!(snake_name("user_id"), "user_id");
        assert_eq!(snake_name("userId"), "user_id");
        assert_eq!(snake_name("CreatedAt"), "created_at");
        assert_eq!(snake_name("msg"), "msg");
    }

    #[test]
    fn upper_case_initialisms_stay_one_word() {
        assert_eq!(snake_name("userIDs"), "user_ids");
        assert_eq!(snake_name("userID"), "user_id");
        assert_eq!(snake_name("HTTPStatus"), "http_status");
        assert_eq!(snake_name("avatarURLs"), "avatar_urls");
        assert_eq!(snake_name("Identity"), "identity");
        assert_eq!(camel_identifier("userIDs"), "UserIDs");
        assert_eq!(camel_identifier("user_ids"), "UserIDs");
        assert_eq!(camel_identifier("avatarURL"), "AvatarURL");
    }
}
