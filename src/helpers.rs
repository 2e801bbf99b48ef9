use std::collections::{HashMap, HashSet};

/// Parses a strict `-flag value` argument list: tokens must alternate
/// between a flag and its value, every flag in `flags` is required, and
/// nothing else is accepted. Returns None when the input does not fit.
pub fn parse_required_flags(input: &[String], flags: &[&str]) -> Option<HashMap<String, String>> {
    if input.len() < 2 || flags.is_empty() {
        return None;
    }

    let mut required: HashSet<&str> = flags.iter().copied().collect();
    let mut results = HashMap::new();

    let mut should_be_flag = true;
    let mut last_flag = "";

    for token in input {
        if should_be_flag {
            if !required.contains(token.as_str()) {
                return None;
            }
            last_flag = token.as_str();
        } else {
            results.insert(last_flag.to_string(), token.clone());
            required.remove(last_flag);
        }

        should_be_flag = !should_be_flag;
    }

    // Leftover required flags mean the caller forgot one
    if required.is_empty() {
        Some(results)
    } else {
        None
    }
}
