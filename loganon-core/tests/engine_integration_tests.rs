// loganon-core/tests/engine_integration_tests.rs
//! End-to-end checks of the anonymization engine: consistency of
//! replacements within a run, the structure of generated values, and the
//! ordering of the literal and pattern passes.

use anyhow::Result;
use std::collections::HashSet;
use std::io;
use test_log::test;

use loganon_core::generators::GREEK_LETTERS;
use loganon_core::{
    AnonymizationEngine, AnonymizerError, LineProcessor, RegexEngine, RuleSet,
};

fn engine(pairs: &[(&str, &str)]) -> Result<RegexEngine> {
    let rules = RuleSet::from_pairs(pairs.iter().copied())?;
    Ok(RegexEngine::new(&rules)?)
}

#[test]
fn test_literal_rule_example() -> Result<()> {
    let engine = engine(&[("SECRET_KEY", "REDACTED")])?;
    assert_eq!(engine.anonymize_line("key is SECRET_KEY here")?, "key is REDACTED here");
    assert_eq!(
        engine.anonymize_line("SECRET_KEY and SECRET_KEY")?,
        "REDACTED and REDACTED"
    );
    Ok(())
}

#[test]
fn test_pattern_rule_example_reuses_cached_value() -> Result<()> {
    let engine = engine(&[(r"password=\S+", "password=$randstr")])?;
    let first = engine.anonymize_line("password=abc123")?;
    let second = engine.anonymize_line("password=abc123 extra")?;

    let token = first.strip_prefix("password=").expect("prefix kept");
    assert_eq!(token.len(), 6);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(second, format!("{} extra", first));
    Ok(())
}

#[test]
fn test_consistency_across_parallel_lines() -> Result<()> {
    let engine = engine(&[(r"user=\w+", "user=$randstr")])?;
    let lines: Vec<String> = (0..5_000)
        .map(|i| format!("req {} by user=u{}", i, i % 10))
        .collect();
    let out = engine.anonymize_lines(&lines)?;

    // Ten distinct users, ten distinct replacements, each used consistently.
    let mut by_user: Vec<Option<String>> = vec![None; 10];
    for (i, line) in out.iter().enumerate() {
        assert!(line.starts_with(&format!("req {} by user=", i)), "order broken at {}", i);
        let replacement = line.rsplit(' ').next().unwrap_or_default().to_string();
        let slot = &mut by_user[i % 10];
        match slot {
            Some(existing) => assert_eq!(existing, &replacement),
            None => *slot = Some(replacement),
        }
    }
    let distinct: HashSet<String> = by_user.into_iter().flatten().collect();
    assert_eq!(distinct.len(), 10);
    assert_eq!(engine.stats().distinct_values, 10);
    Ok(())
}

#[test]
fn test_distinct_inputs_get_distinct_values() -> Result<()> {
    let engine = engine(&[(r"ip=\d+\.\d+\.\d+\.\d+", "ip=$randip/$randnum")])?;
    let mut seen = HashSet::new();
    for i in 0..200 {
        let out = engine.anonymize_line(&format!("ip=10.0.{}.{}", i / 256, i % 256))?;
        assert!(seen.insert(out));
    }
    Ok(())
}

#[test]
fn test_generated_structure() -> Result<()> {
    let engine = engine(&[
        (r"ip=\S+", "$randip"),
        (r"host=\S+", "$randhost"),
        (r"mail=\S+", "$randemail"),
    ])?;

    let ip = engine.anonymize_line("ip=1.2.3.4")?;
    let octets: Vec<&str> = ip.split('.').collect();
    assert_eq!(octets.len(), 4);
    assert!(octets.iter().all(|o| o.parse::<u8>().is_ok()));

    let host = engine.anonymize_line("host=db01.corp")?;
    let labels: Vec<&str> = host.split('.').collect();
    assert_eq!(labels.len(), 3);
    assert!(GREEK_LETTERS.contains(&labels[0]) && GREEK_LETTERS.contains(&labels[1]));
    assert_eq!(labels[2], "com");

    let mail = engine.anonymize_line("mail=jane@corp.example")?;
    let (local, domain) = mail.split_once('@').expect("email has @");
    assert!((5..=10).contains(&local.len()));
    let labels: Vec<&str> = domain.split('.').collect();
    assert_eq!(labels.len(), 3);
    assert!(GREEK_LETTERS.contains(&labels[0]) && GREEK_LETTERS.contains(&labels[1]));
    assert_eq!(labels[2], "net");
    Ok(())
}

#[test]
fn test_unknown_variable_is_rejected_before_processing() {
    let rules = RuleSet::from_pairs([(r"id=\d+", "id=$bogus")]).unwrap();
    match RegexEngine::new(&rules) {
        Err(AnonymizerError::UnknownVariable(token)) => assert_eq!(token, "$bogus"),
        other => panic!("expected UnknownVariable, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_pattern_pass_sees_literal_output() -> Result<()> {
    // Without the literal pass first, `ACME` would never look like an email.
    let engine = engine(&[("ACME", "ceo@acme.test"), (r"\w+@\w+\.test", "$randemail")])?;
    let out = engine.anonymize_line("contact ACME")?;
    assert!(!out.contains("ceo@acme.test"));
    assert!(out.starts_with("contact ") && out.ends_with(".net"));
    Ok(())
}

#[test]
fn test_capture_references_keep_context() -> Result<()> {
    let engine = engine(&[(r"(user|admin)=(\w+)", "${1}=$randstr")])?;
    let out = engine.anonymize_line("admin=root user=bob")?;
    let parts: Vec<&str> = out.split(' ').collect();
    assert!(parts[0].starts_with("admin=") && parts[0] != "admin=root");
    assert!(parts[1].starts_with("user=") && parts[1] != "user=bob");
    Ok(())
}

#[test]
fn test_processor_output_matches_engine_output() -> Result<()> {
    let engine = engine(&[("SECRET_KEY", "REDACTED"), (r"token=\w+", "token=$randstr")])?;
    let input = ["token=a SECRET_KEY", "nothing", "token=a"];
    let mut out: Vec<u8> = Vec::new();
    let summary = LineProcessor::new(&engine)
        .run(input.iter().map(|l| Ok::<_, io::Error>(l.as_bytes().to_vec())), &mut out)?;

    let text = String::from_utf8(out)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    let replaced = lines[0].strip_suffix(" REDACTED").expect("literal replaced");
    assert_eq!(lines[1], "nothing");
    assert_eq!(lines[2], replaced);
    assert_eq!(summary.literal_replacements, 1);
    assert_eq!(summary.pattern_replacements, 2);
    assert_eq!(summary.distinct_values, 1);
    Ok(())
}
