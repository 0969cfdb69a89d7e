//! Short code generation for rooms and players.

use rand::Rng;

/// Characters codes are drawn from. `0`, `O`, `1` and `I` are left out so
/// a code read aloud or off a screen is unambiguous.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every generated code.
pub const CODE_LEN: usize = 4;

/// Draws a random code. Not unique on its own; see [`unique_code`].
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Draws codes until one is not `taken`.
pub(crate) fn unique_code(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let code = generate_code();
        if !taken(&code) {
            return code;
        }
    }
}
