/// Tolerance so a line that fits exactly is not pushed to the next line by
/// floating point noise.
const EPSILON: f32 = 0.01;

/// Greedy word wrap.
///
/// `measure` returns the advance width of a fragment. Words are measured
/// on their own and joined with the width of a space; shaping never kerns
/// across a space, so each candidate line is measured incrementally rather
/// than re-measured from scratch.
///
/// Words are never split: a word wider than `max_width` is emitted alone on
/// its own line. Explicit `\n` breaks start a new line; an empty paragraph
/// between two breaks yields an empty line.
pub fn break_lines<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let space_width = measure(" ");
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        let mut current_width = measure(first);

        for word in words {
            let word_width = measure(word);
            if current_width + space_width + word_width <= max_width + EPSILON {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }
        lines.push(current);
    }
    lines
}
