use rand::Rng;

/// Alphabet for generated passwords. Visually ambiguous characters
/// (`0`, `O`, `I`, `i`, `l`, `o`) are excluded so a password read off a
/// terminal can be retyped reliably.
const PASSWORD_ALPHABET: &[u8] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz~!@#$%^&*()-_+?.,";

/// Length of generated passwords.
pub const GENERATED_PASSWORD_LENGTH: usize = 32;

/// Generate a random password for `--generate-password` and the
/// blank-prompt fallback during account creation.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}
