pub const DEFAULT_SUBTITLE_MAX_CHARS: usize = 28;
pub const DEFAULT_BREAK_SEARCH_RADIUS: usize = 12;

const BREAK_CHARS: &[char] = &['、', '。', '！', '？', ' ', ',', '.'];

/// Splits a subtitle line in two when it is wider than `max_chars`.
///
/// The break goes right after the punctuation or space closest to the middle,
/// looking at most `search_radius` characters either way (right side first). With
/// no such character in range the text is cut exactly at the middle. Only one
/// newline is ever inserted.
#[must_use]
pub fn wrap_subtitle(text: &str, max_chars: usize, search_radius: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len <= max_chars {
        return text.to_string();
    }

    let mid = len / 2;
    let split_after = (0..mid.min(search_radius))
        .flat_map(|offset| [mid + offset, mid - offset])
        .find(|&pos| pos > 0 && pos < len && BREAK_CHARS.contains(&chars[pos]))
        .map_or(mid, |pos| pos + 1);

    let mut wrapped: String = chars[..split_after].iter().collect();
    wrapped.push('\n');
    wrapped.extend(&chars[split_after..]);
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        let text = "え、そんなに大事なのだ？";
        assert_eq!(wrap_subtitle(text, 28, 12), text);
    }

    #[test]
    fn breaks_after_punctuation_near_middle() {
        let text = "食べ物じゃないですわ！ でも、知らないとエンジニアとしては致命的ですわよ。";
        let wrapped = wrap_subtitle(text, 28, 12);
        assert_eq!(wrapped.matches('\n').count(), 1);
        assert_eq!(wrapped.replace('\n', ""), text);
        let (head, _) = wrapped.split_once('\n').expect("line break expected");
        assert!(head.ends_with(['、', '！', ' ']));
    }

    #[test]
    fn prefers_right_of_middle_on_equal_distance() {
        // middle is index 5; spaces at 4 and 6
        let wrapped = wrap_subtitle("abcd f hijk", 8, 12);
        assert_eq!(wrapped, "abcd f \nhijk");
    }

    #[test]
    fn forces_middle_split_without_breaks() {
        let text = "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほ";
        let wrapped = wrap_subtitle(text, 28, 12);
        assert_eq!(wrapped, "あいうえおかきくけこさしすせそ\nたちつてとなにぬねのはひふへほ");
    }

    #[test]
    fn search_radius_limits_break_lookup() {
        // only break sits 7 characters left of the middle
        assert_eq!(
            wrap_subtitle("a bcdefghijklmnop", 10, 3),
            "a bcdefg\nhijklmnop"
        );
        assert_eq!(
            wrap_subtitle("a bcdefghijklmnop", 10, 12),
            "a \nbcdefghijklmnop"
        );
    }
}
