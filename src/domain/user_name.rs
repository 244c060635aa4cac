use std::convert::AsRef;
use unicode_segmentation::UnicodeSegmentation;

const FORBIDDEN_CHARS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

#[derive(Debug)]
pub struct UserName(String);

impl UserName {
    pub fn inner(self) -> String {
        self.0
    }

    pub fn parse(s: &str) -> Result<UserName, String> {
        let is_empty = s.trim().is_empty();

        let is_too_long = s.graphemes(true).count() > 256;

        let contains_forbidden_chars = s.chars().any(|c| FORBIDDEN_CHARS.contains(&c));

        if is_empty || is_too_long || contains_forbidden_chars {
            Err(format!("{} is not a valid username.", s))
        } else {
            Ok(Self(s.to_string()))
        }
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
