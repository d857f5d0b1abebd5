//! Placeholder password cipher.
//!
//! Reverses the characters and joins them with `.`. This offers no
//! security whatsoever and stands in for a real password hashing library.

/// Produce the stored form of a clear-text password.
pub fn encrypt(clear_text: &str) -> String {
    let reversed: Vec<String> = clear_text.chars().rev().map(String::from).collect();
    reversed.join(".")
}

/// Whether `clear_text` encrypts to `cipher_text`.
pub fn validate(clear_text: &str, cipher_text: &str) -> bool {
    encrypt(clear_text) == cipher_text
}
