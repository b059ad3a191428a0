//! 名称处理：Terraform 标识符与 Route 53 记录名

/// Turn a domain name into a Terraform identifier.
///
/// `.` and `-` become `_`, as does any other character that is not a letter,
/// digit or `_`; a leading `_` is added when the name does not start with a
/// letter or `_`.
pub fn sanitize_module_name(domain: &str) -> String {
    let name = domain.replace(['.', '-'], "_");
    let needs_prefix = name
        .chars()
        .next()
        .is_none_or(|c| !(c.is_alphabetic() || c == '_'));

    let mut sanitized = String::with_capacity(name.len() + 1);
    if needs_prefix {
        sanitized.push('_');
    }
    sanitized.extend(
        name.chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' }),
    );
    sanitized
}

/// Decode Route 53 `\DDD` octal escapes (`\052` is `*`, `\100` is `@`).
///
/// Escapes that do not decode to ASCII are left as they are.
pub fn decode_escapes(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\'
            && let Some(digits) = bytes.get(i + 1..i + 4)
            && digits.iter().all(|d| (b'0'..=b'7').contains(d))
        {
            let value = digits
                .iter()
                .fold(0_u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            if let Some(c) = char::from_u32(value).filter(char::is_ascii) {
                out.push(c);
                i += 4;
                continue;
            }
        }
        // Copy one whole UTF-8 character.
        let ch_len = name[i..].chars().next().map_or(1, char::len_utf8);
        out.push_str(&name[i..i + ch_len]);
        i += ch_len;
    }

    out
}

/// Name of a record relative to its zone, as used in configuration.
///
/// The apex is `""`. Escapes are decoded, a label of `@` means the apex
/// and a trailing `.@` is dropped. Names outside the zone are returned
/// decoded but otherwise unchanged.
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let relative = if fqdn.eq_ignore_ascii_case(zone) {
        ""
    } else {
        strip_zone_suffix(fqdn, zone).unwrap_or(fqdn)
    };

    let decoded = decode_escapes(relative);
    if decoded == "@" {
        String::new()
    } else if let Some(stripped) = decoded.strip_suffix(".@") {
        stripped.to_string()
    } else {
        decoded
    }
}

/// `fqdn` without `.<zone>`, when it lies strictly below `zone`.
pub(crate) fn strip_zone_suffix<'a>(fqdn: &'a str, zone: &str) -> Option<&'a str> {
    let split = fqdn.len().checked_sub(zone.len() + 1)?;
    if split == 0 || !fqdn.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = fqdn.split_at(split);
    tail.strip_prefix('.')
        .filter(|rest| rest.eq_ignore_ascii_case(zone))
        .map(|_| head)
}

// ============ Module names ============

/// Module names used for one zone, shared by configuration and import addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    /// Sanitized zone name.
    pub base: String,
    pub zone: String,
    pub records: String,
    /// Only for delegated zones.
    pub delegation_set: Option<String>,
    /// Only for delegated zones: the parent-side NS record.
    pub delegation_records: Option<String>,
}

impl ModuleNames {
    /// Every identifier the zone claims in the shared zones configuration.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids = vec![self.base.as_str(), self.zone.as_str(), self.records.as_str()];
        ids.extend(self.delegation_set.as_deref());
        ids.extend(self.delegation_records.as_deref());
        ids.dedup();
        ids
    }

    pub fn for_zone(zone_name: &str, delegated: bool) -> Self {
        let base = sanitize_module_name(zone_name);
        if delegated {
            Self {
                zone: format!("{base}_subdomain_zone"),
                records: format!("{base}_subdomain_zone_records"),
                delegation_set: Some(format!("{base}_delegation_set")),
                delegation_records: Some(format!("{base}_delegation_records")),
                base,
            }
        } else {
            Self {
                zone: base.clone(),
                records: format!("{base}_records"),
                delegation_set: None,
                delegation_records: None,
                base,
            }
        }
    }
}
