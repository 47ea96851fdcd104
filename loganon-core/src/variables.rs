//! The `$variable` mini-language used inside replacement templates.
//!
//! A token is `$` followed by one or more ASCII letters and is matched
//! case-insensitively against the known variables. `$$` is an escaped dollar
//! sign: the expander leaves it in place so the replacement stage can turn it
//! into a literal `$`.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::AnonymizerError;
use crate::generators;

/// Length of the value produced by `$randstr`.
pub const RANDSTR_LEN: usize = 6;
/// Length of the value produced by `$randnum`.
pub const RANDNUM_LEN: usize = 5;

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$|\$[A-Za-z]+").expect("token regex is valid"));

/// A synthetic value generator addressable from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    RandStr,
    RandNum,
    RandIp,
    RandHost,
    RandEmail,
}

impl Variable {
    pub const ALL: [Variable; 5] = [
        Variable::RandStr,
        Variable::RandNum,
        Variable::RandIp,
        Variable::RandHost,
        Variable::RandEmail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variable::RandStr => "randstr",
            Variable::RandNum => "randnum",
            Variable::RandIp => "randip",
            Variable::RandHost => "randhost",
            Variable::RandEmail => "randemail",
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            Variable::RandStr => generators::random_string(rng, RANDSTR_LEN),
            Variable::RandNum => generators::random_number(rng, RANDNUM_LEN),
            Variable::RandIp => generators::random_ipv4(rng),
            Variable::RandHost => generators::random_hostname(rng, generators::HOST_TLD),
            Variable::RandEmail => generators::random_email(rng),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

impl FromStr for Variable {
    type Err = AnonymizerError;

    /// Accepts the token with or without its leading `$`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let name = token.strip_prefix('$').unwrap_or(token);
        Variable::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| AnonymizerError::UnknownVariable(token.to_string()))
    }
}

/// Walks the tokens of `template`, copying everything else through.
fn substitute<F>(template: &str, mut on_variable: F) -> Result<String, AnonymizerError>
where
    F: FnMut(Variable) -> String,
{
    let mut out = String::with_capacity(template.len() + 16);
    let mut last_end = 0;
    for token in TOKEN_REGEX.find_iter(template) {
        out.push_str(&template[last_end..token.start()]);
        if token.as_str() == "$$" {
            out.push_str("$$");
        } else {
            let variable: Variable = token.as_str().parse()?;
            out.push_str(&on_variable(variable));
        }
        last_end = token.end();
    }
    out.push_str(&template[last_end..]);
    Ok(out)
}

/// Expands every variable token of `template` using the thread-local RNG.
pub fn expand(template: &str) -> Result<String, AnonymizerError> {
    expand_with(template, &mut rand::rng())
}

/// Expands every variable token of `template`, drawing from `rng`. Tokens are
/// resolved left to right and each one gets a fresh value.
pub fn expand_with<R: Rng + ?Sized>(template: &str, rng: &mut R) -> Result<String, AnonymizerError> {
    if !template.contains('$') {
        return Ok(template.to_string());
    }
    substitute(template, |variable| variable.generate(rng))
}

/// Fails with `UnknownVariable` for the first unsupported token.
pub fn validate_template(template: &str) -> Result<(), AnonymizerError> {
    substitute(template, |_| String::new()).map(|_| ())
}

/// Lists the variables used by `template`, in order of appearance.
pub fn variables_in(template: &str) -> Result<Vec<Variable>, AnonymizerError> {
    let mut found = Vec::new();
    substitute(template, |variable| {
        found.push(variable);
        String::new()
    })?;
    Ok(found)
}
