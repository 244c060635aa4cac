use rand::{
    distributions::{Alphanumeric, DistString},
    Rng,
};

const ALLOWED_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz\
0123456789";

const TOKEN_LEN: usize = 25;

/// One-shot email-confirmation token handed out at signup.
#[derive(Debug, Clone)]
pub struct SignupToken(String);

impl SignupToken {
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty = s.trim().is_empty();
        let is_not_ascii = !s.is_ascii();
        let is_wrong_sized = s.chars().count() != TOKEN_LEN;
        let contains_forbidden_chars = !s.chars().all(|c| ALLOWED_CHARS.contains(c));

        if is_empty || is_not_ascii || is_wrong_sized || contains_forbidden_chars {
            Err(format!("{} is not a valid signup token.", s))
        } else {
            Ok(Self(s))
        }
    }

    /// Generate a random 25-characters-long case-sensitive signup token.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut rand::thread_rng())
    }

    fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let raw = Alphanumeric.sample_string(rng, TOKEN_LEN);
        SignupToken(raw)
    }
}

impl AsRef<str> for SignupToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
