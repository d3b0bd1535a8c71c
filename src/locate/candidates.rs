// src/locate/candidates.rs

//! Candidate list construction for the helper locator.
//!
//! The order produced here *is* the lookup contract:
//! 1. development-tree relative paths
//! 2. the build-output path
//! 3. the install bindir (both name-case variants)
//! 4. conventional system dirs (both name-case variants each)

use std::env::consts::EXE_SUFFIX;
use std::path::PathBuf;

use crate::config::LocatorSection;

/// Build the ordered candidate list for `name`.
pub fn build_candidates(settings: &LocatorSection, name: &str) -> Vec<PathBuf> {
    let mut out = Vec::new();

    for template in &settings.dev_tree {
        push_unique(&mut out, expand_template(template, name));
    }

    if let Some(template) = &settings.build_output {
        push_unique(&mut out, expand_template(template, name));
    }

    let variants = case_variants(name);

    if let Some(bindir) = &settings.install_bindir {
        for variant in &variants {
            push_unique(&mut out, bindir.join(executable_file_name(variant)));
        }
    }

    for dir in &settings.system_dirs {
        for variant in &variants {
            push_unique(&mut out, dir.join(executable_file_name(variant)));
        }
    }

    out
}

/// The name as given, then with its first character upper-cased.
///
/// Deduplicated, so a name that already starts with an upper-case letter (or
/// with a non-letter) yields a single variant.
pub fn case_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.to_string()];

    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        let capitalized: String = first.to_uppercase().chain(chars).collect();
        if capitalized != name {
            variants.push(capitalized);
        }
    }

    variants
}

/// Substitute `{name}` in a path template and append the platform suffix.
pub fn expand_template(template: &str, name: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", template.replace("{name}", name), EXE_SUFFIX))
}

fn executable_file_name(name: &str) -> String {
    format!("{}{}", name, EXE_SUFFIX)
}

fn push_unique(out: &mut Vec<PathBuf>, path: PathBuf) {
    if !out.contains(&path) {
        out.push(path);
    }
}
