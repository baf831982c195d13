//! The ordered line transformations applied to each spec file.
//!
//! All matching here is whole-line and prefix-based; nothing understands
//! YAML structure. Order matters: the title annotation must see the line
//! sequence as left by the auth edits, and each step mutates in place.

use crate::Result;
use crate::amend::rules::{AmendRules, UrlPlaceholder};
use anyhow::{Context, bail};
use regex::Regex;

/// Apply every transformation in order, mutating `lines` in place.
///
/// Running this twice over the same file is a no-op the second time: the
/// URL step skips already-templated lines, the auth append checks for its
/// block, and the title step skips an existing version marker.
pub fn amend(lines: &mut Vec<String>, rules: &AmendRules) -> Result<()> {
    add_variable_to_base_url(lines, rules)?;
    remove_request_auth(lines, rules);
    ensure_collection_auth(lines, rules);
    annotate_title_with_version(lines, rules)?;
    Ok(())
}

/// Insert an environment placeholder into the base-URL line.
///
/// Returns `false` when no line starts with the URL prefix; webhook and
/// notification specs carry no server URL and that is not an error.
fn add_variable_to_base_url(lines: &mut [String], rules: &AmendRules) -> Result<bool> {
    let Some(idx) = lines.iter().position(|l| l.starts_with(&rules.url_prefix)) else {
        tracing::debug!("no base-URL line; skipping placeholder substitution");
        return Ok(false);
    };

    if lines[idx].contains("{{env") {
        // already templated by a previous run
        return Ok(false);
    }

    let updated = match rules.url_placeholder {
        UrlPlaceholder::EnvToken => lines[idx].replace(&rules.env_token, "{{env}}"),
        UrlPlaceholder::TitledBaseUrl => {
            let Some(name) = lines
                .iter()
                .find(|l| l.starts_with(&rules.title_line_prefix))
                .map(|l| variable_name_from_title(l, rules))
                .filter(|n| !n.is_empty())
            else {
                return Ok(false);
            };

            // host sits between the scheme and the first path segment
            let re = Regex::new(r"(https://)[^/\s]+(/)")?;
            let replacement = format!("${{1}}{{{{env.baseUrl.{name}}}}}${{2}}");
            re.replace(&lines[idx], replacement.as_str()).into_owned()
        }
    };

    lines[idx] = updated;
    Ok(true)
}

/// Derive a compact variable name from a quoted title line: drop the vendor
/// word and the word `API`, capitalize what remains, strip whitespace.
/// `  title: 'Adyen Checkout API'` becomes `Checkout`.
fn variable_name_from_title(line: &str, rules: &AmendRules) -> String {
    let raw = line[rules.title_line_prefix.len()..].trim().trim_matches('\'');
    raw.split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case(&rules.vendor) && !w.eq_ignore_ascii_case("API"))
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Delete every verbatim occurrence of the request-level auth block so each
/// request inherits the collection default instead of overriding it.
fn remove_request_auth(lines: &mut Vec<String>, rules: &AmendRules) {
    let block = &rules.request_auth;
    if block.is_empty() {
        return;
    }

    let mut i = 0;
    while i + block.len() <= lines.len() {
        if &lines[i..i + block.len()] == block.as_slice() {
            lines.drain(i..i + block.len());
        } else {
            i += 1;
        }
    }
}

/// Append the collection-level default auth block unless already present.
fn ensure_collection_auth(lines: &mut Vec<String>, rules: &AmendRules) {
    let block = &rules.collection_auth;
    if block.is_empty() || contains_block(lines, block) {
        return;
    }
    lines.extend(block.iter().cloned());
}

fn contains_block(lines: &[String], block: &[String]) -> bool {
    block.len() <= lines.len() && lines.windows(block.len()).any(|w| w == block)
}

/// Append the version ordinal to the quoted title, ` [vN]` inside the
/// closing quote. Missing or malformed version/title lines are fatal for
/// this file. A title already carrying the marker is left alone.
fn annotate_title_with_version(lines: &mut [String], rules: &AmendRules) -> Result<()> {
    let version_line = lines
        .iter()
        .find(|l| l.starts_with(&rules.version_prefix))
        .with_context(|| format!("no line starts with {:?}", rules.version_prefix))?;
    let version = parse_quoted_version(version_line)?;

    let idx = lines
        .iter()
        .position(|l| l.starts_with(&rules.title_line_prefix))
        .with_context(|| format!("no line starts with {:?}", rules.title_line_prefix))?;

    let marker = format!("[v{version}]");
    if lines[idx].contains(&marker) {
        return Ok(());
    }

    let mut title = lines[idx].clone();
    if let Some(prefix) = &rules.title_prefix {
        title = rewrite_title(&title, prefix, rules);
    }

    let Some(stripped) = title.strip_suffix('\'') else {
        bail!("title line is not single-quoted: {title:?}");
    };
    lines[idx] = format!("{stripped} {marker}'");
    Ok(())
}

/// Parse the integer between the first pair of single quotes.
fn parse_quoted_version(line: &str) -> Result<u32> {
    let value = line
        .split('\'')
        .nth(1)
        .with_context(|| format!("version line has no quoted value: {line:?}"))?;
    value
        .parse()
        .with_context(|| format!("version is not numeric: {value:?}"))
}

/// Variant title rewrite: drop the vendor word and `API` from the quoted
/// text and prepend the product prefix.
fn rewrite_title(line: &str, product_prefix: &str, rules: &AmendRules) -> String {
    let (Some(start), Some(end)) = (line.find('\''), line.rfind('\'')) else {
        return line.to_string();
    };
    if end <= start {
        return line.to_string();
    }

    let kept: Vec<&str> = line[start + 1..end]
        .split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case(&rules.vendor) && !w.eq_ignore_ascii_case("API"))
        .collect();
    let rewritten = format!("{product_prefix} {}", kept.join(" "));
    format!("{}'{}'", &line[..start], rewritten.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> Vec<String> {
        [
            "openapi: 3.1.0",
            "info:",
            "  title: 'Adyen Checkout API'",
            "  version: '68'",
            "servers:",
            "- url: https://checkout-test.adyen.com/v68",
            "paths:",
            "  /payments:",
            "    post:",
            "      security:",
            "      - BasicAuth: []",
            "      - ApiKeyAuth: []",
            "      responses: {}",
            "  /payments/details:",
            "    post:",
            "      security:",
            "      - BasicAuth: []",
            "      - ApiKeyAuth: []",
            "      responses: {}",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn removes_every_request_auth_block() {
        let mut lines = fixture();
        amend(&mut lines, &AmendRules::default()).unwrap();

        assert!(!lines.iter().any(|l| l == "      security:"));
        assert!(!lines.iter().any(|l| l == "      - BasicAuth: []"));
    }

    #[test]
    fn appends_collection_auth_exactly_once() {
        let rules = AmendRules::default();
        let mut lines = fixture();
        amend(&mut lines, &rules).unwrap();

        let count = lines
            .windows(rules.collection_auth.len())
            .filter(|w| *w == rules.collection_auth.as_slice())
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn collection_auth_not_duplicated_when_already_present() {
        let rules = AmendRules::default();
        let mut lines = fixture();
        lines.extend(rules.collection_auth.iter().cloned());
        amend(&mut lines, &rules).unwrap();

        let count = lines
            .windows(rules.collection_auth.len())
            .filter(|w| *w == rules.collection_auth.as_slice())
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn title_gains_version_marker() {
        let mut lines = fixture();
        amend(&mut lines, &AmendRules::default()).unwrap();

        assert_eq!(lines[2], "  title: 'Adyen Checkout API [v68]'");
    }

    #[test]
    fn env_token_replaced_in_url() {
        let mut lines = fixture();
        amend(&mut lines, &AmendRules::default()).unwrap();

        assert_eq!(lines[5], "- url: https://checkout-{{env}}.adyen.com/v68");
    }

    #[test]
    fn second_amendment_changes_nothing() {
        let rules = AmendRules::default();
        let mut once = fixture();
        amend(&mut once, &rules).unwrap();

        let mut twice = once.clone();
        amend(&mut twice, &rules).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_url_line_is_not_an_error() {
        let mut lines = fixture();
        lines.remove(5);
        amend(&mut lines, &AmendRules::default()).unwrap();

        assert_eq!(lines[2], "  title: 'Adyen Checkout API [v68]'");
        assert!(!lines.iter().any(|l| l.contains("{{env}}")));
    }

    #[test]
    fn missing_version_line_is_fatal() {
        let mut lines = fixture();
        lines.remove(3);
        let err = amend(&mut lines, &AmendRules::default()).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn non_numeric_version_is_fatal() {
        let mut lines = fixture();
        lines[3] = "  version: 'sixty-eight'".to_string();
        let err = amend(&mut lines, &AmendRules::default()).unwrap_err();
        assert!(format!("{err:#}").contains("not numeric"));
    }

    #[test]
    fn missing_title_line_is_fatal() {
        let mut lines = fixture();
        lines.remove(2);
        let err = amend(&mut lines, &AmendRules::default()).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn titled_base_url_mode_replaces_host() {
        let rules = AmendRules {
            url_placeholder: UrlPlaceholder::TitledBaseUrl,
            ..AmendRules::default()
        };
        let mut lines = fixture();
        amend(&mut lines, &rules).unwrap();

        assert_eq!(lines[5], "- url: https://{{env.baseUrl.Checkout}}/v68");
    }

    #[test]
    fn titled_base_url_mode_is_idempotent() {
        let rules = AmendRules {
            url_placeholder: UrlPlaceholder::TitledBaseUrl,
            ..AmendRules::default()
        };
        let mut once = fixture();
        amend(&mut once, &rules).unwrap();
        let mut twice = once.clone();
        amend(&mut twice, &rules).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn title_rewrite_variant_strips_vendor_and_adds_prefix() {
        let rules = AmendRules {
            title_prefix: Some("Payments Platform".to_string()),
            ..AmendRules::default()
        };
        let mut lines = fixture();
        amend(&mut lines, &rules).unwrap();

        assert_eq!(lines[2], "  title: 'Payments Platform Checkout [v68]'");
    }

    #[test]
    fn variable_name_derivation() {
        let rules = AmendRules::default();
        assert_eq!(
            variable_name_from_title("  title: 'Adyen Checkout API'", &rules),
            "Checkout"
        );
        assert_eq!(
            variable_name_from_title("  title: 'Adyen Balance Platform API'", &rules),
            "BalancePlatform"
        );
    }
}
