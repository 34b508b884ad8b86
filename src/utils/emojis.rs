use std::sync::LazyLock;

pub const DONATED: &str = "📤";
pub const RECEIVED: &str = "📥";
pub const ONLINE: &str = "🟢";
pub const OFFLINE: &str = "🔴";
pub const NUMBER: &str = "#️⃣";
pub const IDLE: &str = "⚪";
pub const LEGEND_CUP: &str = "🏆";

/// Highest rank that has its own emoji. Anything above falls back to [`IDLE`].
pub const MAX_NUMBER_EMOJI: u64 = 100;

fn keycap(digit: char) -> String {
    format!("{digit}\u{fe0f}\u{20e3}")
}

static NUMBER_EMOJIS: LazyLock<Vec<String>> = LazyLock::new(|| {
    (0..=MAX_NUMBER_EMOJI)
        .map(|n| match n {
            10 => "🔟".to_string(),
            100 => "💯".to_string(),
            n => n.to_string().chars().map(keycap).collect(),
        })
        .collect()
});

/// Emoji for `n` in `1..=100`.
pub fn number(n: u64) -> Option<&'static str> {
    if n == 0 || n > MAX_NUMBER_EMOJI {
        return None;
    }
    NUMBER_EMOJIS.get(n as usize).map(String::as_str)
}

/// Rank indicator for a 1-based position.
pub fn rank(position: u64) -> &'static str {
    number(position).unwrap_or(IDLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_bounds() {
        assert_eq!(number(0), None);
        assert_eq!(number(101), None);
        assert_eq!(number(1), Some("1\u{fe0f}\u{20e3}"));
        assert_eq!(number(10), Some("🔟"));
        assert_eq!(number(100), Some("💯"));
    }

    #[test]
    fn test_multi_digit_number() {
        assert_eq!(number(42), Some("4\u{fe0f}\u{20e3}2\u{fe0f}\u{20e3}"));
    }

    #[test]
    fn test_rank_falls_back_to_idle() {
        assert_eq!(rank(3), "3\u{fe0f}\u{20e3}");
        assert_eq!(rank(250), IDLE);
    }
}
