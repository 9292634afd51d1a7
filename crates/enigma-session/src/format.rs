// Output grouping for converted messages.

/// Symbols per group in converted output.
pub const GROUP_SIZE: usize = 5;

/// Split `text` into groups of `size` symbols separated by single spaces.
/// The last group may be shorter. A `size` of 0 is treated as 1.
pub fn group(text: &str, size: usize) -> String {
    let symbols: Vec<char> = text.chars().collect();
    symbols
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
