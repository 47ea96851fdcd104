//! Synthetic value generators used by the `$variable` tokens.
//!
//! Every generator takes the RNG as a parameter so callers decide where the
//! randomness comes from: the variable expander uses the thread-local RNG,
//! tests use seeded ones.
//!
//! License: MIT OR APACHE 2.0

use rand::distr::Alphanumeric;
use rand::Rng;
use std::net::Ipv4Addr;

/// The 24 classical Greek letter names used as hostname labels.
pub const GREEK_LETTERS: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

/// TLD appended by `$randhost`.
pub const HOST_TLD: &str = "com";
/// TLD used for the domain part of `$randemail`.
pub const EMAIL_TLD: &str = "net";

/// Random string over `[A-Za-z0-9]`.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Random string of decimal digits. Leading zeros are kept.
pub fn random_number<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Random dotted-quad IPv4 address, every octet uniform over 0-255.
pub fn random_ipv4<R: Rng + ?Sized>(rng: &mut R) -> String {
    Ipv4Addr::new(rng.random(), rng.random(), rng.random(), rng.random()).to_string()
}

pub fn greek_letter<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    GREEK_LETTERS[rng.random_range(0..GREEK_LETTERS.len())]
}

/// Two Greek-letter labels followed by `tld`, e.g. `sigma.beta.com`.
pub fn random_hostname<R: Rng + ?Sized>(rng: &mut R, tld: &str) -> String {
    let first = greek_letter(rng);
    let second = greek_letter(rng);
    format!("{}.{}.{}", first, second, tld)
}

/// Alphanumeric local part of 5 to 10 characters at a random `.net` host.
pub fn random_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let local_len = rng.random_range(5..=10);
    let local = random_string(rng, local_len);
    format!("{}@{}", local, random_hostname(rng, EMAIL_TLD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x10_6A_40)
    }

    #[test]
    fn test_random_string_shape() {
        let mut rng = rng();
        for _ in 0..100 {
            let s = random_string(&mut rng, 6);
            assert_eq!(s.len(), 6);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_random_number_shape() {
        let mut rng = rng();
        for _ in 0..100 {
            let n = random_number(&mut rng, 5);
            assert_eq!(n.len(), 5);
            assert!(n.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_random_ipv4_octets_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let ip = random_ipv4(&mut rng);
            let octets: Vec<&str> = ip.split('.').collect();
            assert_eq!(octets.len(), 4, "bad ip {}", ip);
            for o in octets {
                assert!(o.parse::<u8>().is_ok(), "octet {} out of range in {}", o, ip);
            }
        }
    }

    #[test]
    fn test_random_hostname_labels() {
        let mut rng = rng();
        for _ in 0..100 {
            let host = random_hostname(&mut rng, HOST_TLD);
            let labels: Vec<&str> = host.split('.').collect();
            assert_eq!(labels.len(), 3);
            assert!(GREEK_LETTERS.contains(&labels[0]));
            assert!(GREEK_LETTERS.contains(&labels[1]));
            assert_eq!(labels[2], "com");
        }
    }

    #[test]
    fn test_random_email_shape() {
        let mut rng = rng();
        for _ in 0..100 {
            let email = random_email(&mut rng);
            let (local, host) = email.split_once('@').unwrap();
            assert!((5..=10).contains(&local.len()), "local part {}", local);
            assert!(local.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(host.ends_with(".net"));
            assert_eq!(host.split('.').count(), 3);
        }
    }
}
