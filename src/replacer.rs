use crate::error::ComposeError;
use crate::rules::RuleSet;
use anyhow::{Result, Context};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Apply JSON rules to the aggregate file and write the parsed result
///
/// # Arguments
/// * `aggregate_file` - Aggregate file to read
/// * `rules_file` - JSON object mapping tokens to replacements
/// * `output_file` - Destination; derived from `aggregate_file` when `None`
///
/// # Returns
/// * `Result<PathBuf>` - Path the parsed aggregate was written to
pub fn parse_aggregate(aggregate_file: &Path, rules_file: &Path, output_file: Option<&Path>) -> Result<PathBuf> {
    if !aggregate_file.is_file() {
        return Err(ComposeError::AggregateNotFound(aggregate_file.to_path_buf()).into());
    }
    let rules = RuleSet::load(rules_file)?;

    let output_path = match output_file {
        Some(path) => path.to_path_buf(),
        None => derive_output_path(aggregate_file),
    };
    if output_path == aggregate_file {
        warn!("Parsed output will overwrite the aggregate file: {}", output_path.display());
    }

    apply_rules_to_file(aggregate_file, &rules, &output_path)?;
    info!("Parsed aggregate written to: {}", output_path.display());
    Ok(output_path)
}

/// Rewrite `input` line by line into `output` with every rule applied
pub fn apply_rules_to_file(input: &Path, rules: &RuleSet, output: &Path) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read file: {}", input.display()))?;

    let replaced = replace_content(&content, rules);

    fs::write(output, replaced)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;
    Ok(())
}

/// Replace tokens in every line of `content`, keeping line endings
pub fn replace_content(content: &str, rules: &RuleSet) -> String {
    content
        .split_inclusive('\n')
        .map(|line| replace_line(line, rules))
        .collect()
}

/// Apply all rules to one line, in rule order.
///
/// A later rule sees the output of earlier ones.
pub fn replace_line(line: &str, rules: &RuleSet) -> String {
    let mut result = line.to_string();
    for rule in &rules.rules {
        result = result.replace(&rule.from, &rule.to);
    }
    result
}

/// Default output path: `.txt` becomes `_parsed.txt` in the file name
pub fn derive_output_path(aggregate_file: &Path) -> PathBuf {
    match aggregate_file.file_name() {
        Some(name) => {
            let parsed = name.to_string_lossy().replace(".txt", "_parsed.txt");
            aggregate_file.with_file_name(parsed)
        },
        None => aggregate_file.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ReplacementRule, DATE_TOKEN, TIME_TOKEN};
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap().and_hms_opt(23, 59, 58).unwrap()
    }

    fn rule_set(pairs: &[(&str, &str)]) -> RuleSet {
        RuleSet {
            rules: pairs.iter()
                .map(|(from, to)| ReplacementRule { from: from.to_string(), to: to.to_string() })
                .collect(),
        }
    }

    #[test]
    fn test_replace_line_with_reserved_tokens() {
        let rules = RuleSet::from_json_str(r#"{"{{AUTHOR}}": "Alice"}"#, fixed_now()).unwrap();
        assert_eq!(
            replace_line("Built on {{DATE}} by {{AUTHOR}}", &rules),
            "Built on 2025-12-31 by Alice"
        );
        assert_eq!(replace_line("at {{TIME}}", &rules), "at 23:59:58");
    }

    #[test]
    fn test_replacements_compose_in_order() {
        let rules = rule_set(&[("{{A}}", "{{B}}"), ("{{B}}", "done")]);
        assert_eq!(replace_line("{{A}} {{B}}", &rules), "done done");

        let reversed = rule_set(&[("{{B}}", "done"), ("{{A}}", "{{B}}")]);
        assert_eq!(replace_line("{{A}} {{B}}", &reversed), "{{B}} done");
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let rules = rule_set(&[("ab", "x")]);
        assert_eq!(replace_line("ab ab aab abab", &rules), "x x ax xx");
    }

    #[test]
    fn test_untouched_lines_stay_unchanged() {
        let rules = RuleSet::from_json_str("{}", fixed_now()).unwrap();
        let content = "no tokens here\n{not a token}\nlast";
        assert_eq!(replace_content(content, &rules), content);
    }

    #[test]
    fn test_replace_content_keeps_line_endings() {
        let rules = rule_set(&[("x", "y")]);
        assert_eq!(replace_content("x\r\nx\n\nx", &rules), "y\r\ny\n\ny");
    }

    #[test]
    fn test_derive_output_path() {
        assert_eq!(derive_output_path(Path::new("cache/aggregate.txt")), PathBuf::from("cache/aggregate_parsed.txt"));
        assert_eq!(derive_output_path(Path::new("dir.txt/agg")), PathBuf::from("dir.txt/agg"));
    }

    #[test]
    fn test_parse_aggregate_writes_derived_output() {
        let dir = TempDir::new().unwrap();
        let aggregate = dir.path().join("aggregate.txt");
        let rules = dir.path().join("rules.json");
        fs::write(&aggregate, "Built on {{DATE}} by {{AUTHOR}}\nplain").unwrap();
        fs::write(&rules, r#"{"{{AUTHOR}}": "Alice"}"#).unwrap();

        let output = parse_aggregate(&aggregate, &rules, None).unwrap();

        assert_eq!(output, dir.path().join("aggregate_parsed.txt"));
        let parsed = fs::read_to_string(&output).unwrap();
        let date = parsed
            .strip_prefix("Built on ")
            .and_then(|rest| rest.strip_suffix(" by Alice\nplain"))
            .unwrap();
        assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
        assert!(!parsed.contains(DATE_TOKEN) && !parsed.contains(TIME_TOKEN));
    }

    #[test]
    fn test_parse_aggregate_explicit_output() {
        let dir = TempDir::new().unwrap();
        let aggregate = dir.path().join("aggregate.txt");
        let rules = dir.path().join("rules.json");
        let output = dir.path().join("out/result.py");
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(&aggregate, "print('{{GREETING}}')").unwrap();
        fs::write(&rules, r#"{"{{GREETING}}": "hi"}"#).unwrap();

        let written = parse_aggregate(&aggregate, &rules, Some(&output)).unwrap();

        assert_eq!(written, output);
        assert_eq!(fs::read_to_string(&output).unwrap(), "print('hi')");
        assert!(!dir.path().join("aggregate_parsed.txt").exists());
    }

    #[test]
    fn test_parse_aggregate_preconditions() {
        let dir = TempDir::new().unwrap();
        let aggregate = dir.path().join("aggregate.txt");
        let rules = dir.path().join("rules.json");

        let err = parse_aggregate(&aggregate, &rules, None).unwrap_err();
        assert!(matches!(err.downcast_ref::<ComposeError>(), Some(ComposeError::AggregateNotFound(_))));

        fs::write(&aggregate, "line").unwrap();
        let err = parse_aggregate(&aggregate, &rules, None).unwrap_err();
        assert!(matches!(err.downcast_ref::<ComposeError>(), Some(ComposeError::RulesNotFound(_))));

        fs::write(&rules, "{broken").unwrap();
        let err = parse_aggregate(&aggregate, &rules, None).unwrap_err();
        assert!(matches!(err.downcast_ref::<ComposeError>(), Some(ComposeError::InvalidRules(_))));

        assert!(!dir.path().join("aggregate_parsed.txt").exists());
    }
}
