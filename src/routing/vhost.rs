use crate::resource::VirtualHost;

/// How a domain pattern can match the data-plane authority.
/// Lower is better; selection picks the numerically smallest class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PatternClass {
    /// `api.example.com`
    Exact,
    /// `*.example.com`
    Suffix,
    /// `api.*`
    Prefix,
    /// `*`
    Universe,
    /// Empty pattern or any other use of `*`. Never matches.
    Invalid,
}

fn classify(pattern: &str) -> PatternClass {
    if pattern.is_empty() {
        return PatternClass::Invalid;
    }
    match pattern.matches('*').count() {
        0 => PatternClass::Exact,
        1 if pattern == "*" => PatternClass::Universe,
        1 if pattern.starts_with('*') => PatternClass::Suffix,
        1 if pattern.ends_with('*') => PatternClass::Prefix,
        _ => PatternClass::Invalid,
    }
}

/// Match an already lower-cased authority against a pattern of a known class.
fn pattern_matches(pattern: &str, class: PatternClass, authority: &str) -> bool {
    match class {
        PatternClass::Exact => authority.eq_ignore_ascii_case(pattern),
        PatternClass::Suffix => {
            let suffix = pattern[1..].to_ascii_lowercase();
            authority.len() >= suffix.len() && authority.ends_with(suffix.as_str())
        }
        PatternClass::Prefix => {
            let prefix = pattern[..pattern.len() - 1].to_ascii_lowercase();
            authority.len() >= prefix.len() && authority.starts_with(prefix.as_str())
        }
        PatternClass::Universe => true,
        PatternClass::Invalid => false,
    }
}

/// Select the virtual host whose domain patterns best match the data-plane
/// authority.
///
/// Among matching patterns the best (smallest) class wins; ties break to the
/// longest pattern, then to the earliest appearance in the input. An exact
/// match short-circuits the scan. Comparison is ASCII case-insensitive.
pub fn find_virtual_host<'a>(
    virtual_hosts: &'a [VirtualHost],
    authority: &str,
) -> Option<&'a VirtualHost> {
    let authority = authority.to_ascii_lowercase();
    let mut best: Option<(&VirtualHost, PatternClass, usize)> = None;

    for vhost in virtual_hosts {
        for pattern in &vhost.domains {
            let class = classify(pattern);
            if class == PatternClass::Invalid || !pattern_matches(pattern, class, &authority) {
                continue;
            }
            if class == PatternClass::Exact {
                return Some(vhost);
            }
            let better = match best {
                None => true,
                Some((_, best_class, best_len)) => {
                    class < best_class || (class == best_class && pattern.len() > best_len)
                }
            };
            if better {
                best = Some((vhost, class, pattern.len()));
            }
        }
    }

    best.map(|(vhost, _, _)| vhost)
}
