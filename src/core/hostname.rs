/// Lower-cased domain without surrounding whitespace or dots.
pub fn clean_domain(domain: &str) -> String {
    domain.trim().trim_matches('.').to_lowercase()
}

fn in_domain(relative: &str, domain: &str) -> bool {
    relative == domain || relative.ends_with(&format!(".{domain}"))
}

/// Qualifies `hostname` with `domain` when needed and returns the absolute
/// (`foo.example.com.`) or relative (`foo.example.com`) form.
pub fn normalize(hostname: &str, domain: &str, absolute: bool) -> String {
    let domain = clean_domain(domain);
    let lowered = hostname.trim().to_lowercase();
    let mut relative = lowered.trim_end_matches('.').to_string();

    if !in_domain(&relative, &domain) {
        relative = format!("{relative}.{domain}");
    }

    if absolute {
        format!("{relative}.")
    } else {
        relative
    }
}

/// Shorthand for the relative form used as map keys.
pub fn relative(hostname: &str, domain: &str) -> String {
    normalize(hostname, domain, false)
}

/// Removes the domain suffix and any surrounding dots, leaving the subdomain
/// fragment the console's "Subdomain" field expects.
pub fn strip_domain(hostname: &str, domain: &str) -> String {
    let domain = clean_domain(domain);
    let lowered = hostname.trim().to_lowercase();
    let relative = lowered.trim_end_matches('.');
    match relative.strip_suffix(domain.as_str()) {
        Some(prefix) => prefix.trim_matches('.').to_string(),
        None => relative.trim_matches('.').to_string(),
    }
}
